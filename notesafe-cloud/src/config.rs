//! Cloud escrow configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the escrow API client.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Base URL for the NoteSafe API (e.g., "https://api.notesafe.app").
    pub api_base_url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.notesafe.app".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl CloudConfig {
    /// Creates a config pointing at a local API server.
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            api_base_url: "http://localhost:3002".to_string(),
            request_timeout_secs: 5,
        }
    }

    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trims_trailing_slash() {
        let config = CloudConfig {
            api_base_url: "http://localhost:3002/".to_string(),
            ..CloudConfig::test()
        };
        assert_eq!(config.base_url(), "http://localhost:3002");
    }
}
