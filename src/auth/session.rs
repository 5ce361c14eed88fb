use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::ApiError;

/// Session key holding the signed-in user's id.
pub const SESSION_USER_ID_KEY: &str = "user_id";

/// Extracts the signed-in user's id from the session; rejects with 401
/// when there is no established identity.
pub struct AuthUser(pub Uuid);

/// Like [`AuthUser`] but for routes that also serve visitors.
pub struct MaybeAuthUser(pub Option<Uuid>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| ApiError::Internal(anyhow::anyhow!("session layer: {msg}")))?;
        let user_id = session
            .get::<Uuid>(SESSION_USER_ID_KEY)
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;
        Ok(MaybeAuthUser(user_id))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let MaybeAuthUser(user_id) = MaybeAuthUser::from_request_parts(parts, state).await?;
        user_id.map(AuthUser).ok_or(ApiError::Unauthenticated)
    }
}
