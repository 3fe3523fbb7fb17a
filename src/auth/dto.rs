use serde::{Deserialize, Serialize};

/// Form body of `POST /auth/jwt/login`.
#[derive(Debug, Serialize)]
pub struct LoginForm<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response returned after login.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

pub(crate) fn default_token_type() -> String {
    "bearer".into()
}
