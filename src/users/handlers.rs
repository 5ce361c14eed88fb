use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use tracing::{info, instrument, warn};

use crate::{
    auth::session::AuthUser,
    error::ApiError,
    images,
    posts,
    social,
    state::AppState,
    users::{
        dto::{ProfilePrefill, ProfileResponse, PublicProfile, UpdateProfileResponse},
        repo::User,
    },
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(my_profile))
        .route("/profile/update", get(update_profile_page).post(update_profile))
        .route("/profile/:username", get(user_profile))
        .layer(DefaultBodyLimit::max(images::MAX_UPLOAD_BYTES))
}

#[instrument(skip(state))]
async fn my_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    let posts = posts::repo::list_by_user(&state.db, user.id).await?;
    let (followers_count, following_count) =
        social::repo::follow_counts(&state.db, user.id).await?;

    Ok(Json(ProfileResponse {
        user: PublicProfile::from(user),
        posts,
        followers_count,
        following_count,
        is_following: None,
    }))
}

#[instrument(skip(state))]
async fn user_profile(
    State(state): State<AppState>,
    AuthUser(viewer_id): AuthUser,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = User::find_by_username(&state.db, &username)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    let posts = posts::repo::list_by_user(&state.db, user.id).await?;
    let (followers_count, following_count) =
        social::repo::follow_counts(&state.db, user.id).await?;
    let is_following = if user.id == viewer_id {
        None
    } else {
        Some(social::repo::is_following(&state.db, viewer_id, user.id).await?)
    };

    Ok(Json(ProfileResponse {
        user: PublicProfile::from(user),
        posts,
        followers_count,
        following_count,
        is_following,
    }))
}

#[instrument(skip(state))]
async fn update_profile_page(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfilePrefill>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(ProfilePrefill {
        username: user.username,
        bio: user.bio,
        location: user.location,
        profile_image: user.profile_image,
    }))
}

#[instrument(skip(state, multipart))]
async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<UpdateProfileResponse>, ApiError> {
    let current = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    let mut username = current.username.clone();
    let mut bio = current.bio.clone();
    let mut location = current.location.clone();
    let mut picture: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "username" => {
                username = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(e.to_string()))?
                    .trim()
                    .to_string();
            }
            "bio" => {
                bio = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(e.to_string()))?;
            }
            "location" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(e.to_string()))?;
                location = if value.is_empty() { None } else { Some(value) };
            }
            "profile_image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(e.to_string()))?;
                // Files with disallowed extensions are silently ignored.
                if !file_name.is_empty() && !data.is_empty() && images::allowed_file(&file_name) {
                    picture = Some((file_name, data));
                }
            }
            _ => {}
        }
    }

    if username != current.username
        && User::find_by_username(&state.db, &username).await?.is_some()
    {
        warn!(user_id = %user_id, username = %username, "username already taken");
        return Err(ApiError::validation("Username already exists!"));
    }

    let stored = match picture {
        Some((file_name, data)) => {
            Some(images::save_picture(state.images.as_ref(), &file_name, data).await?)
        }
        None => None,
    };

    let user = User::update_profile(
        &state.db,
        user_id,
        &username,
        &bio,
        location.as_deref(),
        stored.as_deref(),
    )
    .await?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(UpdateProfileResponse {
        message: "Profile updated successfully!".into(),
        user: PublicProfile::from(user),
    }))
}
