use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use time::{Duration, OffsetDateTime};
use tower_sessions::{Expiry, Session};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginForm, RegisterForm},
        password::{hash_password, verify_password},
        session::{AuthUser, MaybeAuthUser, SESSION_USER_ID_KEY},
    },
    error::ApiError,
    state::AppState,
    users::repo::User,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_page).post(register))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Already signed-in visitors are sent back home, as the form page has
/// nothing for them.
async fn register_page(MaybeAuthUser(user): MaybeAuthUser) -> Response {
    match user {
        Some(_) => Redirect::to("/").into_response(),
        None => StatusCode::OK.into_response(),
    }
}

async fn login_page(MaybeAuthUser(user): MaybeAuthUser) -> Response {
    match user {
        Some(_) => Redirect::to("/").into_response(),
        None => StatusCode::OK.into_response(),
    }
}

#[instrument(skip(state, form))]
async fn register(
    State(state): State<AppState>,
    Form(mut form): Form<RegisterForm>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    form.email = form.email.trim().to_lowercase();
    form.username = form.username.trim().to_string();

    if form.password != form.confirm_password {
        return Err(ApiError::validation("Passwords do not match!"));
    }
    if !is_valid_email(&form.email) {
        warn!(email = %form.email, "invalid email");
        return Err(ApiError::validation("Invalid email"));
    }
    if User::find_by_username(&state.db, &form.username).await?.is_some() {
        warn!(username = %form.username, "username already exists");
        return Err(ApiError::validation("Username already exists!"));
    }
    if User::find_by_email(&state.db, &form.email).await?.is_some() {
        warn!(email = %form.email, "email already registered");
        return Err(ApiError::validation("Email already registered!"));
    }

    let hash = hash_password(&form.password)?;
    let user = User::create(&state.db, &form.username, &form.email, &hash).await?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Account created successfully! Please log in.".into(),
            user: user.into_public(),
        }),
    ))
}

#[instrument(skip(state, session, form))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(mut form): Form<LoginForm>,
) -> Result<Json<AuthResponse>, ApiError> {
    form.email = form.email.trim().to_lowercase();

    let user = match User::find_by_email(&state.db, &form.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %form.email, "login unknown email");
            return Err(ApiError::BadCredentials);
        }
    };

    if !verify_password(&form.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::BadCredentials);
    }

    session
        .insert(SESSION_USER_ID_KEY, user.id)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    if form.remember.is_some() {
        let expiry = OffsetDateTime::now_utc() + Duration::days(state.config.remember_ttl_days);
        session.set_expiry(Some(Expiry::AtDateTime(expiry)));
    }

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(AuthResponse {
        message: format!("Welcome back, {}!", user.username),
        user: user.into_public(),
    }))
}

#[instrument(skip_all)]
async fn logout(AuthUser(user_id): AuthUser, session: Session) -> Result<Redirect, ApiError> {
    session
        .flush()
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    info!(user_id = %user_id, "user logged out");
    Ok(Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("spaces in@x.com"));
        assert!(!is_valid_email("missing@tld"));
    }
}
