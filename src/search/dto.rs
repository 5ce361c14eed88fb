use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::posts::dto::PostCard;
use crate::users::repo::User;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct UserHit {
    pub id: Uuid,
    pub username: String,
    pub profile_image: String,
    pub bio: String,
    pub location: Option<String>,
}

impl From<User> for UserHit {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            profile_image: user.profile_image,
            bio: user.bio,
            location: user.location,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub users: Vec<UserHit>,
    pub posts: Vec<PostCard>,
}
