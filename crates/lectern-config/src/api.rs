//! Backend REST API configuration.

use serde::{Deserialize, Serialize};

const fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    String::from("lectern/0.1")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the LMS backend (e.g. `https://lms.example.edu/api`).
    #[serde(default)]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    /// Check if a backend URL has been provided.
    pub fn is_configured(&self) -> bool {
        !self.base_url.trim().is_empty()
    }

    /// Base URL without a trailing slash, ready for path joining.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = ApiConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.user_agent, "lectern/0.1");
    }

    #[test]
    fn whitespace_url_is_not_configured() {
        let config = ApiConfig {
            base_url: "   ".into(),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = ApiConfig {
            base_url: "https://lms.example.edu/api/".into(),
            ..Default::default()
        };
        assert_eq!(config.normalized_base_url(), "https://lms.example.edu/api");
    }
}
