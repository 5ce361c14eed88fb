use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Raw feed row: a post by the user or someone they follow, joined with
/// the author and the viewer's liked flag.
#[derive(Debug, FromRow)]
pub struct FeedItem {
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

pub async fn feed_page(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<FeedItem>> {
    let rows = sqlx::query_as::<_, FeedItem>(
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
        WHERE p.user_id = $1
           OR p.user_id IN (SELECT followed_id FROM follows WHERE follower_id = $1)
        ORDER BY p.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Unpaginated variant backing the home view.
pub async fn feed_all(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<FeedItem>> {
    let rows = sqlx::query_as::<_, FeedItem>(
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
        WHERE p.user_id = $1
           OR p.user_id IN (SELECT followed_id FROM follows WHERE follower_id = $1)
        ORDER BY p.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn feed_total(db: &PgPool, user_id: Uuid) -> anyhow::Result<i64> {
    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM posts p
        WHERE p.user_id = $1
           OR p.user_id IN (SELECT followed_id FROM follows WHERE follower_id = $1)
        "#,
    )
    .bind(user_id)
    .fetch_one(db)
    .await?;
    Ok(total)
}
