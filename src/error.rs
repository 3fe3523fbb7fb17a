use thiserror::Error;

/// Failure of a call against the meals/auth API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401 on an authenticated call: the token is missing, invalid or expired.
    #[error("session expired or not authenticated")]
    Unauthorized,

    #[error("Error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("could not reach the server: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("session file {path} is corrupted: {source}")]
    Corrupted {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("not logged in")]
    Missing,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email address")]
    InvalidEmail,

    #[error("password is required")]
    EmptyPassword,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Rejection of the meal-entry form before anything is sent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("All macro fields and the meal type are required.")]
    MissingFields,

    #[error("{field} must be a number, got {value:?}")]
    NotANumber { field: &'static str, value: String },

    #[error("unknown meal type {0:?}")]
    UnknownMealType(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message_carries_code_and_body() {
        let err = ApiError::Status {
            status: 422,
            message: "calories: field required".into(),
        };
        assert_eq!(err.to_string(), "Error 422: calories: field required");
        assert!(!err.is_session_expired());
        assert!(ApiError::Unauthorized.is_session_expired());
    }
}
