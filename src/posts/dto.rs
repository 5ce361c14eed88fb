use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::social::dto::RenderedComment;

/// Post as shown in profile lists and search results.
#[derive(Debug, Serialize, FromRow)]
pub struct PostCard {
    pub id: Uuid,
    pub title: Option<String>,
    pub content: String,
    pub image: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub like_count: i64,
    pub comment_count: i64,
}

#[derive(Debug, Serialize)]
pub struct PostAuthor {
    pub username: String,
    pub profile_image: String,
}

/// Single-post view: the post, its author, the viewer's liked flag and
/// the rendered comment thread.
#[derive(Debug, Serialize)]
pub struct PostDetail {
    pub id: Uuid,
    pub title: Option<String>,
    pub content: String,
    pub image: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub author: PostAuthor,
    pub like_count: i64,
    pub comment_count: i64,
    pub liked: bool,
    pub comments: Vec<RenderedComment>,
}

#[derive(Debug, Serialize)]
pub struct CreatePostResponse {
    pub message: String,
    pub post: PostCard,
}

#[derive(Debug, Serialize)]
pub struct DeletePostResponse {
    pub message: String,
}
