use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::posts::dto::PostCard;
use crate::users::repo::User;

/// Profile fields safe to show to any signed-in user.
#[derive(Debug, Serialize)]
pub struct PublicProfile {
    pub id: Uuid,
    pub username: String,
    pub profile_image: String,
    pub bio: String,
    pub location: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            profile_image: user.profile_image,
            bio: user.bio,
            location: user.location,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: PublicProfile,
    pub posts: Vec<PostCard>,
    pub followers_count: i64,
    pub following_count: i64,
    /// Null when viewing one's own profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
}

/// Prefill data for the profile-update form.
#[derive(Debug, Serialize)]
pub struct ProfilePrefill {
    pub username: String,
    pub bio: String,
    pub location: Option<String>,
    pub profile_image: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub message: String,
    pub user: PublicProfile,
}
