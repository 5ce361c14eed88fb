use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub liked: bool,
    pub like_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    #[serde(default)]
    pub content: Option<String>,
}

/// Comment as rendered for clients: author name, author image URL and a
/// short formatted date.
#[derive(Debug, Serialize)]
pub struct RenderedComment {
    pub content: String,
    pub author: String,
    pub author_image: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub success: bool,
    pub comment: RenderedComment,
    pub comment_count: i64,
}

#[derive(Debug, Serialize)]
pub struct FollowResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub following: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_response_shape() {
        let json = serde_json::to_string(&LikeResponse {
            liked: true,
            like_count: 1,
        })
        .unwrap();
        assert_eq!(json, r#"{"liked":true,"like_count":1}"#);
    }

    #[test]
    fn comment_response_shape() {
        let json = serde_json::to_value(CommentResponse {
            success: true,
            comment: RenderedComment {
                content: "nice".into(),
                author: "bob".into(),
                author_image: "/static/uploads/default.jpg".into(),
                created_at: "Aug 07, 2026".into(),
            },
            comment_count: 1,
        })
        .unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["comment"]["author"], "bob");
        assert_eq!(json["comment_count"], 1);
    }

    #[test]
    fn silent_follow_response_omits_message() {
        let json = serde_json::to_string(&FollowResponse {
            message: None,
            following: false,
        })
        .unwrap();
        assert_eq!(json, r#"{"following":false}"#);
    }
}
