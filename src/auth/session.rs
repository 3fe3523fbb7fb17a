use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use super::claims::read_unverified;
use super::dto::default_token_type;
use crate::error::SessionError;

/// An authenticated session. Passed explicitly to every API call.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
}

impl Session {
    /// Builds a session from a freshly issued token. Tokens whose payload
    /// cannot be read are kept as-is with an unknown expiry.
    pub fn from_token(access_token: String, token_type: String) -> Self {
        let (subject, expires_at) = match read_unverified(&access_token) {
            Ok(claims) => (Some(claims.sub.clone()), claims.expires_at()),
            Err(e) => {
                debug!(error = %e, "access token payload not readable");
                (None, None)
            }
        };
        Self {
            access_token,
            token_type,
            subject,
            expires_at,
        }
    }

    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("subject", &self.subject)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// File-backed session persistence: loaded on start, cleared on logout.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored session, if any. A session whose token is known to
    /// have expired is removed and reported as absent.
    pub fn load(&self, now: OffsetDateTime) -> Result<Option<Session>, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };
        let session: Session =
            serde_json::from_str(&raw).map_err(|source| SessionError::Corrupted {
                path: self.path.display().to_string(),
                source,
            })?;
        if session.is_expired_at(now) {
            warn!(path = %self.path.display(), "stored session has expired");
            self.clear()?;
            return Ok(None);
        }
        Ok(Some(session))
    }

    /// Like `load`, but a missing session is an error.
    pub fn require(&self, now: OffsetDateTime) -> Result<Session, SessionError> {
        self.load(now)?.ok_or(SessionError::Missing)
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }
        let body = serde_json::to_string_pretty(session).map_err(|source| {
            SessionError::Corrupted {
                path: self.path.display().to_string(),
                source,
            }
        })?;
        fs::write(&self.path, body).map_err(|e| self.io_error(e))?;
        info!(path = %self.path.display(), subject = ?session.subject, "session saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "session cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}
