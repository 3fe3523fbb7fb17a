use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use super::session::Session;
use crate::api::ApiClient;
use crate::error::AuthError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Exchanges credentials for a session. Input is checked locally first so an
/// obviously bad email never reaches the server.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<Session, AuthError> {
    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AuthError::InvalidEmail);
    }
    if password.is_empty() {
        return Err(AuthError::EmptyPassword);
    }

    let token = client.login(&email, password).await?;
    let session = Session::from_token(token.access_token, token.token_type);
    info!(email = %email, subject = ?session.subject, "logged in");
    Ok(session)
}
