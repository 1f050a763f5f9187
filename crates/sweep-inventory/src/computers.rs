//! Paginated device enumeration via `GET /v1/computers`.

use chrono::{DateTime, Utc};
use thiserror::Error;

use sweep_core::records::DeviceRecord;

use crate::{InventoryClient, InventorySnapshot, error::InventoryError, http::check_response};

#[derive(serde::Deserialize)]
struct ComputersPage {
    data: Vec<ComputerEntry>,
    metadata: PageMetadata,
}

#[derive(serde::Deserialize)]
struct PageMetadata {
    links: PageLinks,
    results: ResultWindow,
}

#[derive(serde::Deserialize)]
struct PageLinks {
    #[serde(default)]
    next: Option<String>,
}

#[derive(serde::Deserialize)]
struct ResultWindow {
    total: u64,
    #[serde(default)]
    index: u64,
}

#[derive(serde::Deserialize)]
struct ComputerEntry {
    connector_guid: Option<String>,
    hostname: Option<String>,
    last_seen: Option<String>,
    network_addresses: Option<Vec<InterfaceEntry>>,
}

#[derive(serde::Deserialize)]
struct InterfaceEntry {
    mac: Option<String>,
}

/// Why an entry did not make it into the snapshot.
#[derive(Debug, Error)]
enum EntrySkip {
    /// No interface list at all; such entries cannot collide on an address.
    #[error("no network interface list")]
    NoInterfaces,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("unparseable last_seen `{0}`")]
    BadTimestamp(String),
}

impl ComputerEntry {
    fn into_record(self) -> Result<DeviceRecord, EntrySkip> {
        let Some(interfaces) = self.network_addresses else {
            return Err(EntrySkip::NoInterfaces);
        };
        let connector_guid = self
            .connector_guid
            .ok_or(EntrySkip::MissingField("connector_guid"))?;
        let hostname = self.hostname.ok_or(EntrySkip::MissingField("hostname"))?;
        let raw = self.last_seen.ok_or(EntrySkip::MissingField("last_seen"))?;
        let last_seen = raw
            .parse::<DateTime<Utc>>()
            .map_err(|_| EntrySkip::BadTimestamp(raw))?;
        Ok(DeviceRecord {
            connector_guid,
            hostname,
            last_seen,
            macs: interfaces.into_iter().filter_map(|i| i.mac).collect(),
        })
    }
}

/// Normalize one page into `out`, returning the next-page link if any.
fn absorb_page(
    page: ComputersPage,
    out: &mut Vec<DeviceRecord>,
    skipped: &mut u64,
) -> Option<String> {
    let next = page.metadata.links.next;
    for entry in page.data {
        match entry.into_record() {
            Ok(record) => out.push(record),
            // Interface-less entries are excluded by contract, not counted.
            Err(EntrySkip::NoInterfaces) => {
                tracing::debug!("entry without an interface list excluded");
            }
            Err(reason) => {
                *skipped += 1;
                tracing::warn!(%reason, "skipping malformed device entry");
            }
        }
    }
    next
}

impl InventoryClient {
    /// Enumerate every device record the service knows about, following
    /// pagination links until exhausted. Pages are fetched strictly one at
    /// a time; each page is fully normalized before the next request.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] if any page request fails, returns a
    /// non-success status, or cannot be parsed. A failed page fails the
    /// whole enumeration; no partial snapshot is returned.
    pub async fn list_computers(&self) -> Result<InventorySnapshot, InventoryError> {
        let mut records = Vec::new();
        let mut skipped = 0u64;

        let url = format!("{}/v1/computers", self.base_url);
        let first = self.fetch_page(&url).await?;
        let total = first.metadata.results.total;
        tracing::info!(total, "device records reported by the service");

        let mut next = absorb_page(first, &mut records, &mut skipped);
        while let Some(next_url) = next {
            let page = self.fetch_page(&next_url).await?;
            tracing::debug!(index = page.metadata.results.index, "page received");
            next = absorb_page(page, &mut records, &mut skipped);
        }

        if skipped > 0 {
            tracing::warn!(skipped, "device entries dropped during normalization");
        }
        Ok(InventorySnapshot {
            records,
            total,
            skipped,
        })
    }

    async fn fetch_page(&self, url: &str) -> Result<ComputersPage, InventoryError> {
        let resp = check_response(self.authed(self.http.get(url)).send().await?).await?;
        Ok(resp.json().await?)
    }
}
