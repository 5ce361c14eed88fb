use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates;
use crate::feed::repo::FeedItem;
use crate::posts::dto::PostAuthor;
use crate::users::repo::User;

pub const FEED_PAGE_SIZE: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

/// Feed entry as served to clients, with a display-formatted timestamp.
#[derive(Debug, Serialize)]
pub struct FeedPost {
    pub id: Uuid,
    pub title: Option<String>,
    pub content: String,
    pub image: Option<String>,
    pub created_at: String,
    pub author: PostAuthor,
    pub like_count: i64,
    pub comment_count: i64,
    pub liked: bool,
}

impl From<FeedItem> for FeedPost {
    fn from(item: FeedItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            content: item.content,
            image: item.image,
            created_at: dates::post_timestamp(item.created_at),
            author: PostAuthor {
                username: item.username,
                profile_image: item.profile_image,
            },
            like_count: item.like_count,
            comment_count: item.comment_count,
            liked: item.liked,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub posts: Vec<FeedPost>,
    pub has_next: bool,
    pub has_prev: bool,
    pub page: i64,
    pub pages: i64,
}

#[derive(Debug, Serialize)]
pub struct SuggestedUser {
    pub id: Uuid,
    pub username: String,
    pub profile_image: String,
    pub bio: String,
}

impl From<User> for SuggestedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            profile_image: user.profile_image,
            bio: user.bio,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub authenticated: bool,
    pub posts: Vec<FeedPost>,
    pub suggested_users: Vec<SuggestedUser>,
}

/// Page arithmetic for the fixed-size feed pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: i64,
    pub pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageInfo {
    pub fn compute(total: i64, requested_page: i64, per_page: i64) -> Self {
        let page = requested_page.max(1);
        let pages = if total == 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };
        Self {
            page,
            pages,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }

    pub fn offset(&self, per_page: i64) -> i64 {
        (self.page - 1) * per_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_feed_has_zero_pages() {
        let info = PageInfo::compute(0, 1, 10);
        assert_eq!(info.pages, 0);
        assert!(!info.has_next);
        assert!(!info.has_prev);
    }

    #[test]
    fn exact_multiple_fills_pages() {
        let info = PageInfo::compute(20, 1, 10);
        assert_eq!(info.pages, 2);
        assert!(info.has_next);
        assert!(!info.has_prev);
    }

    #[test]
    fn remainder_adds_a_page() {
        let info = PageInfo::compute(21, 3, 10);
        assert_eq!(info.pages, 3);
        assert!(!info.has_next);
        assert!(info.has_prev);
    }

    #[test]
    fn middle_page_has_both_neighbours() {
        let info = PageInfo::compute(25, 2, 10);
        assert!(info.has_next);
        assert!(info.has_prev);
        assert_eq!(info.offset(10), 10);
    }

    #[test]
    fn page_below_one_is_clamped() {
        let info = PageInfo::compute(25, 0, 10);
        assert_eq!(info.page, 1);
        assert_eq!(info.offset(10), 0);
    }
}
