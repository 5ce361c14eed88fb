use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::dto::PublicUser;

/// User record in the database. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub profile_image: String,
    pub bio: String,
    pub location: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn into_public(self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username,
            email: self.email,
            profile_image: self.profile_image,
        }
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, profile_image, bio, location, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_username(db: &PgPool, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, profile_image, bio, location, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, profile_image, bio, location, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password.
    pub async fn create(
        db: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, profile_image, bio, location, created_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Update profile fields. A `None` image keeps the current one.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        username: &str,
        bio: &str,
        location: Option<&str>,
        profile_image: Option<&str>,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $2,
                bio = $3,
                location = $4,
                profile_image = COALESCE($5, profile_image)
            WHERE id = $1
            RETURNING id, username, email, password_hash, profile_image, bio, location, created_at
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(bio)
        .bind(location)
        .bind(profile_image)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Substring search over username and bio.
    pub async fn search(db: &PgPool, query: &str) -> anyhow::Result<Vec<User>> {
        let pattern = format!("%{query}%");
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, profile_image, bio, location, created_at
            FROM users
            WHERE username LIKE $1 OR bio LIKE $1
            "#,
        )
        .bind(pattern)
        .fetch_all(db)
        .await?;
        Ok(users)
    }

    /// First N users the given user does not already follow, self excluded.
    /// Deliberately unranked.
    pub async fn suggested(db: &PgPool, for_user: Uuid, limit: i64) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, profile_image, bio, location, created_at
            FROM users
            WHERE id <> $1
              AND id NOT IN (SELECT followed_id FROM follows WHERE follower_id = $1)
            LIMIT $2
            "#,
        )
        .bind(for_user)
        .bind(limit)
        .fetch_all(db)
        .await?;
        Ok(users)
    }
}
