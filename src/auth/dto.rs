use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Form body for /register.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Form body for /login. `remember` is an HTML checkbox: any value means
/// checked, absence means unchecked.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember: Option<String>,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub profile_image: String,
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: PublicUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_serializes_without_secrets() {
        let user = PublicUser {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "a@x.com".into(),
            profile_image: "default.jpg".into(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("alice"));
        assert!(json.contains("a@x.com"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn remember_checkbox_is_optional() {
        let form: LoginForm =
            serde_json::from_str(r#"{"email":"a@x.com","password":"pw1"}"#).unwrap();
        assert!(form.remember.is_none());

        let form: LoginForm = serde_json::from_str(
            r#"{"email":"a@x.com","password":"pw1","remember":"on"}"#,
        )
        .unwrap();
        assert_eq!(form.remember.as_deref(), Some("on"));
    }
}
