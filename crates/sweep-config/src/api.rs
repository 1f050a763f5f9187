//! Inventory API configuration.

use serde::{Deserialize, Serialize};

/// Default API host (North American cloud).
fn default_base_url() -> String {
    "https://api.amp.cisco.com".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// API host, without a trailing slash (e.g., `https://api.amp.cisco.com`
    /// or `https://api.eu.amp.cisco.com` for the EU cloud).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API client id (the credential username).
    #[serde(default)]
    pub client_id: String,

    /// API key (the credential password).
    #[serde(default)]
    pub api_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            client_id: String::new(),
            api_key: String::new(),
        }
    }
}

impl ApiConfig {
    /// Check if the credential pair is present. The base URL always has a
    /// default, so only the credentials gate readiness.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = ApiConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.base_url, "https://api.amp.cisco.com");
    }

    #[test]
    fn configured_when_both_credentials_set() {
        let config = ApiConfig {
            client_id: "deadbeef".into(),
            api_key: "secret".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
    }

    #[test]
    fn one_credential_is_not_enough() {
        let config = ApiConfig {
            client_id: "deadbeef".into(),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }
}
