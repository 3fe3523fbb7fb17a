use std::sync::Arc;

use time::OffsetDateTime;

use crate::api::ApiClient;
use crate::auth::{Session, SessionStore};
use crate::config::AppConfig;
use crate::error::SessionError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub api: ApiClient,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let api = ApiClient::new(config.api.clone())?;
        let sessions = SessionStore::new(config.session_file.clone());
        Ok(Self {
            config,
            api,
            sessions,
        })
    }

    pub fn from_parts(config: Arc<AppConfig>, api: ApiClient, sessions: SessionStore) -> Self {
        Self {
            config,
            api,
            sessions,
        }
    }

    /// The stored session, or `SessionError::Missing` when logged out.
    pub fn session(&self) -> Result<Session, SessionError> {
        self.sessions.require(OffsetDateTime::now_utc())
    }
}
