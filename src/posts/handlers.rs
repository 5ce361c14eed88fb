use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::session::AuthUser,
    error::ApiError,
    images,
    posts::{
        dto::{CreatePostResponse, DeletePostResponse, PostAuthor, PostCard, PostDetail},
        repo,
    },
    social,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/post/new", get(new_post_page).post(create_post))
        .route("/post/:id", get(view_post))
        .route("/post/:id/delete", get(delete_post))
        .layer(DefaultBodyLimit::max(images::MAX_UPLOAD_BYTES))
}

async fn new_post_page(AuthUser(_): AuthUser) -> StatusCode {
    StatusCode::OK
}

#[instrument(skip(state, multipart))]
async fn create_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreatePostResponse>), ApiError> {
    let mut title: Option<String> = None;
    let mut content = String::new();
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(e.to_string()))?;
                title = if value.is_empty() { None } else { Some(value) };
            }
            "content" => {
                content = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(e.to_string()))?;
            }
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(e.to_string()))?;
                // Files with disallowed extensions are silently ignored.
                if !file_name.is_empty() && !data.is_empty() && images::allowed_file(&file_name) {
                    upload = Some((file_name, data));
                }
            }
            _ => {}
        }
    }

    if content.is_empty() {
        return Err(ApiError::validation("Post content cannot be empty!"));
    }

    let image = match upload {
        Some((file_name, data)) => {
            Some(images::save_picture(state.images.as_ref(), &file_name, data).await?)
        }
        None => None,
    };

    let post = repo::create(&state.db, user_id, title.as_deref(), &content, image.as_deref())
        .await?;

    info!(user_id = %user_id, post_id = %post.id, "post created");
    Ok((
        StatusCode::CREATED,
        Json(CreatePostResponse {
            message: "Your post has been created!".into(),
            post: PostCard {
                id: post.id,
                title: post.title,
                content: post.content,
                image: post.image,
                created_at: post.created_at,
                like_count: 0,
                comment_count: 0,
            },
        }),
    ))
}

#[instrument(skip(state))]
async fn view_post(
    State(state): State<AppState>,
    AuthUser(viewer_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PostDetail>, ApiError> {
    let row = repo::detail(&state.db, viewer_id, id)
        .await?
        .ok_or(ApiError::NotFound("post"))?;
    let comments = social::repo::comments_for_post(&state.db, id).await?;

    Ok(Json(PostDetail {
        id: row.id,
        title: row.title,
        content: row.content,
        image: row.image,
        created_at: row.created_at,
        author: PostAuthor {
            username: row.username,
            profile_image: row.profile_image,
        },
        like_count: row.like_count,
        comment_count: row.comment_count,
        liked: row.liked,
        comments,
    }))
}

#[instrument(skip(state))]
async fn delete_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletePostResponse>, ApiError> {
    let post = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("post"))?;

    if post.user_id != user_id {
        warn!(user_id = %user_id, post_id = %id, "non-owner delete rejected");
        return Err(ApiError::Forbidden("You cannot delete this post!".into()));
    }

    repo::delete(&state.db, id).await?;

    // Rows are the source of truth; a leftover file is only logged.
    if let Some(image) = &post.image {
        if let Err(e) = state.images.remove(image).await {
            warn!(error = %e, post_id = %id, "failed to remove post image");
        }
    }

    info!(user_id = %user_id, post_id = %id, "post deleted");
    Ok(Json(DeletePostResponse {
        message: "Post deleted!".into(),
    }))
}
