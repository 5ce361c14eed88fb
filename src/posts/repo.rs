use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::posts::dto::PostCard;

#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub content: String,
    pub image: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Post joined with author and viewer-dependent fields for the detail view.
#[derive(Debug, FromRow)]
pub struct PostDetailRow {
    pub id: Uuid,
    pub title: Option<String>,
    pub content: String,
    pub image: Option<String>,
    pub created_at: OffsetDateTime,
    pub username: String,
    pub profile_image: String,
    pub like_count: i64,
    pub comment_count: i64,
    pub liked: bool,
}

pub async fn create(
    db: &PgPool,
    user_id: Uuid,
    title: Option<&str>,
    content: &str,
    image: Option<&str>,
) -> anyhow::Result<Post> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (user_id, title, content, image)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, title, content, image, created_at
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(content)
    .bind(image)
    .fetch_one(db)
    .await?;
    Ok(post)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Post>> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, user_id, title, content, image, created_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(post)
}

/// A user's posts, newest first, with interaction counts.
pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<PostCard>> {
    let rows = sqlx::query_as::<_, PostCard>(
        r#"
        SELECT p.id, p.title, p.content, p.image, p.created_at,
               (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
               (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count
        FROM posts p
        WHERE p.user_id = $1
        ORDER BY p.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn detail(
    db: &PgPool,
    viewer_id: Uuid,
    post_id: Uuid,
) -> anyhow::Result<Option<PostDetailRow>> {
    let row = sqlx::query_as::<_, PostDetailRow>(
        r#"
        SELECT p.id, p.title, p.content, p.image, p.created_at,
               u.username, u.profile_image,
               (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
               (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count,
               EXISTS(
                   SELECT 1 FROM likes l WHERE l.post_id = p.id AND l.user_id = $1
               ) AS liked
        FROM posts p
        JOIN users u ON u.id = p.user_id
        WHERE p.id = $2
        "#,
    )
    .bind(viewer_id)
    .bind(post_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Likes and comments go with the row via FK cascade.
pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

/// Substring search over title and content.
pub async fn search(db: &PgPool, query: &str) -> anyhow::Result<Vec<PostCard>> {
    let pattern = format!("%{query}%");
    let rows = sqlx::query_as::<_, PostCard>(
        r#"
        SELECT p.id, p.title, p.content, p.image, p.created_at,
               (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
               (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count
        FROM posts p
        WHERE p.content LIKE $1 OR p.title LIKE $1
        ORDER BY p.created_at DESC
        "#,
    )
    .bind(pattern)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
