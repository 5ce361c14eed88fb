use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub created_at: OffsetDateTime,
}

/// Comment joined with its author for rendering.
#[derive(Debug, FromRow)]
pub struct CommentWithAuthor {
    pub content: String,
    pub created_at: OffsetDateTime,
    pub username: String,
    pub profile_image: String,
}

// ---- likes ----

/// Remove the viewer's like if present. Returns whether a row was removed.
pub async fn unlike(db: &PgPool, user_id: Uuid, post_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND post_id = $2")
        .bind(user_id)
        .bind(post_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Insert a like. A concurrent duplicate collapses into a no-op via the
/// composite uniqueness constraint.
pub async fn like(db: &PgPool, user_id: Uuid, post_id: Uuid) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO likes (user_id, post_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, post_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn like_count(db: &PgPool, post_id: Uuid) -> anyhow::Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(db)
        .await?;
    Ok(count)
}

// ---- comments ----

pub async fn insert_comment(
    db: &PgPool,
    user_id: Uuid,
    post_id: Uuid,
    content: &str,
) -> anyhow::Result<Comment> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (content, user_id, post_id)
        VALUES ($1, $2, $3)
        RETURNING id, content, user_id, post_id, created_at
        "#,
    )
    .bind(content)
    .bind(user_id)
    .bind(post_id)
    .fetch_one(db)
    .await?;
    Ok(comment)
}

pub async fn comment_count(db: &PgPool, post_id: Uuid) -> anyhow::Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(db)
        .await?;
    Ok(count)
}

/// A post's comments with their authors, oldest first.
pub async fn comments_with_authors(
    db: &PgPool,
    post_id: Uuid,
) -> anyhow::Result<Vec<CommentWithAuthor>> {
    let rows = sqlx::query_as::<_, CommentWithAuthor>(
        r#"
        SELECT c.content, c.created_at, u.username, u.profile_image
        FROM comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.post_id = $1
        ORDER BY c.created_at ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Rendered variant used by the post detail view.
pub async fn comments_for_post(
    db: &PgPool,
    post_id: Uuid,
) -> anyhow::Result<Vec<crate::social::dto::RenderedComment>> {
    let rows = comments_with_authors(db, post_id).await?;
    Ok(rows
        .into_iter()
        .map(|c| crate::social::dto::RenderedComment {
            content: c.content,
            author: c.username,
            author_image: crate::images::public_image_url(&c.profile_image),
            created_at: crate::dates::short_date(c.created_at),
        })
        .collect())
}

// ---- follow graph ----

/// Create a follow edge. Returns false when the edge already existed
/// (including the concurrent-duplicate case).
pub async fn follow(db: &PgPool, follower_id: Uuid, followed_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO follows (follower_id, followed_id)
        VALUES ($1, $2)
        ON CONFLICT (follower_id, followed_id) DO NOTHING
        "#,
    )
    .bind(follower_id)
    .bind(followed_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Remove a follow edge. Returns whether an edge was removed.
pub async fn unfollow(db: &PgPool, follower_id: Uuid, followed_id: Uuid) -> anyhow::Result<bool> {
    let result =
        sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followed_id = $2")
            .bind(follower_id)
            .bind(followed_id)
            .execute(db)
            .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn is_following(
    db: &PgPool,
    follower_id: Uuid,
    followed_id: Uuid,
) -> anyhow::Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND followed_id = $2)",
    )
    .bind(follower_id)
    .bind(followed_id)
    .fetch_one(db)
    .await?;
    Ok(exists)
}

/// (followers, following) for a user.
pub async fn follow_counts(db: &PgPool, user_id: Uuid) -> anyhow::Result<(i64, i64)> {
    let followers =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE followed_id = $1")
            .bind(user_id)
            .fetch_one(db)
            .await?;
    let following =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
            .bind(user_id)
            .fetch_one(db)
            .await?;
    Ok((followers, following))
}
