//! Client configuration from the environment.

use crate::client::RecordsClient;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Where the records API lives and which session token to present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
        }
    }
}

impl ClientConfig {
    /// Read `HEALTH_API_URL` and `HEALTH_API_TOKEN`, falling back to the
    /// local mock server and no token.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("HEALTH_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let token = lookup("HEALTH_API_TOKEN").filter(|v| !v.trim().is_empty());
        Self { base_url, token }
    }

    pub fn client(&self) -> RecordsClient {
        let client = RecordsClient::new(&self.base_url);
        match &self.token {
            Some(token) => client.with_token(token.clone()),
            None => client,
        }
    }
}
