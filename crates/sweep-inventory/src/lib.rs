//! # sweep-inventory
//!
//! Secure-endpoint inventory HTTP client for MacSweep.
//!
//! Talks to the `/v1/computers` surface of the endpoint-security API:
//! - paginated device enumeration, normalized into
//!   [`sweep_core::records::DeviceRecord`]
//! - delete-by-guid for identities the retention pass marks stale

pub mod computers;
pub mod delete;

mod error;
mod http;

pub use error::InventoryError;

use sweep_core::records::DeviceRecord;

// ── Types ──────────────────────────────────────────────────────────

/// Everything one full pagination pass produced.
#[derive(Debug)]
pub struct InventorySnapshot {
    /// Normalized device records, in service order.
    pub records: Vec<DeviceRecord>,
    /// Total record count reported by the service on the first page.
    pub total: u64,
    /// Entries dropped during normalization for missing or malformed fields.
    pub skipped: u64,
}

// ── Client ─────────────────────────────────────────────────────────

/// HTTP client for the inventory API. Credentials ride on every request
/// as HTTP Basic auth.
pub struct InventoryClient {
    base_url: String,
    client_id: String,
    api_key: String,
    http: reqwest::Client,
}

impl InventoryClient {
    /// Create a client for the given API host and credential pair.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(base_url: &str, client_id: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: client_id.to_string(),
            api_key: api_key.to_string(),
            http: reqwest::Client::builder()
                .user_agent("macsweep/0.1")
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("reqwest client should build"),
        }
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth(&self.client_id, Some(&self.api_key))
    }
}
