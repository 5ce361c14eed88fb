use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::session::AuthUser,
    dates, images,
    error::ApiError,
    posts,
    social::{
        dto::{CommentBody, CommentResponse, FollowResponse, LikeResponse, RenderedComment},
        repo,
    },
    state::AppState,
    users::repo::User,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/post/:id/like", post(toggle_like))
        .route("/api/post/:id/comment", post(add_comment))
        .route("/follow/:username", get(follow_user))
        .route("/unfollow/:username", get(unfollow_user))
}

/// One endpoint for like and unlike: removes the viewer's like when it
/// exists, creates it otherwise.
#[instrument(skip(state))]
async fn toggle_like(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<LikeResponse>, ApiError> {
    let post = posts::repo::find_by_id(&state.db, post_id)
        .await?
        .ok_or(ApiError::NotFound("post"))?;

    let removed = repo::unlike(&state.db, user_id, post.id).await?;
    let liked = if removed {
        false
    } else {
        repo::like(&state.db, user_id, post.id).await?;
        true
    };
    let like_count = repo::like_count(&state.db, post.id).await?;

    info!(user_id = %user_id, post_id = %post.id, liked, "like toggled");
    Ok(Json(LikeResponse { liked, like_count }))
}

#[instrument(skip(state, body))]
async fn add_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(post_id): Path<Uuid>,
    Json(body): Json<CommentBody>,
) -> Result<Json<CommentResponse>, ApiError> {
    let post = posts::repo::find_by_id(&state.db, post_id)
        .await?
        .ok_or(ApiError::NotFound("post"))?;

    let content = body.content.unwrap_or_default();
    if content.is_empty() {
        return Err(ApiError::validation("Comment cannot be empty"));
    }

    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    let comment = repo::insert_comment(&state.db, user_id, post.id, &content).await?;
    let comment_count = repo::comment_count(&state.db, post.id).await?;

    info!(user_id = %user_id, post_id = %post.id, "comment added");
    Ok(Json(CommentResponse {
        success: true,
        comment: RenderedComment {
            content: comment.content,
            author: user.username,
            author_image: images::public_image_url(&user.profile_image),
            created_at: dates::short_date(comment.created_at),
        },
        comment_count,
    }))
}

#[instrument(skip(state))]
async fn follow_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(username): Path<String>,
) -> Result<Json<FollowResponse>, ApiError> {
    let target = User::find_by_username(&state.db, &username)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    if target.id == user_id {
        warn!(user_id = %user_id, "self-follow rejected");
        return Err(ApiError::validation("You cannot follow yourself!"));
    }

    let created = repo::follow(&state.db, user_id, target.id).await?;
    let message = if created {
        info!(follower = %user_id, followed = %target.id, "follow edge created");
        format!("You are now following {}!", target.username)
    } else {
        format!("You are already following {}!", target.username)
    };

    Ok(Json(FollowResponse {
        message: Some(message),
        following: true,
    }))
}

#[instrument(skip(state))]
async fn unfollow_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(username): Path<String>,
) -> Result<Json<FollowResponse>, ApiError> {
    let target = User::find_by_username(&state.db, &username)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    let removed = repo::unfollow(&state.db, user_id, target.id).await?;
    let message = if removed {
        info!(follower = %user_id, followed = %target.id, "follow edge removed");
        Some(format!("You have unfollowed {}!", target.username))
    } else {
        // Absent edge is a quiet no-op.
        None
    };

    Ok(Json(FollowResponse {
        message,
        following: false,
    }))
}
