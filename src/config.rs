use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// "/api" behind the web proxy, "" when talking to the API host directly.
    pub prefix: String,
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Absolute URL for an API path such as `/meals/`.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.base_url.trim_end_matches('/'),
            self.prefix.trim_end_matches('/'),
            path
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub session_file: PathBuf,
    /// Show the session-expired prompt; otherwise only an error line is printed.
    pub expiry_prompt: bool,
    pub dashboard_days: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let api = ApiConfig {
            base_url: std::env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".into()),
            prefix: std::env::var("API_PREFIX").unwrap_or_else(|_| "/api".into()),
            timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        };
        let session_file = match std::env::var("SESSION_FILE") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_session_file(),
        };
        let expiry_prompt = std::env::var("SESSION_EXPIRY_PROMPT")
            .map(|v| !matches!(v.as_str(), "0" | "false" | "no"))
            .unwrap_or(true);
        let dashboard_days = std::env::var("DASHBOARD_DAYS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|d| *d > 0)
            .unwrap_or(30);
        Ok(Self {
            api,
            session_file,
            expiry_prompt,
            dashboard_days,
        })
    }
}

fn default_session_file() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".macrotrack").join("session.json"),
        None => PathBuf::from(".macrotrack-session.json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base_url: &str, prefix: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.into(),
            prefix: prefix.into(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn url_joins_base_prefix_and_path() {
        assert_eq!(
            api("http://localhost:8000/", "/api").url("/meals/"),
            "http://localhost:8000/api/meals/"
        );
        assert_eq!(
            api("https://api.example.org", "").url("/auth/jwt/login"),
            "https://api.example.org/auth/jwt/login"
        );
    }
}
