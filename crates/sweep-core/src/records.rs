//! Record types flowing through the sweep pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One device registration as reported by the inventory API.
///
/// A physical device that was re-imaged or re-enrolled shows up as several of
/// these, each with its own `connector_guid` but the same hostname and at
/// least one shared hardware address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Unique identity issued by the inventory system for one agent install.
    pub connector_guid: String,
    /// Device-reported name. Not unique; the scope for duplicate detection.
    pub hostname: String,
    /// Timestamp of the identity's most recent check-in.
    pub last_seen: DateTime<Utc>,
    /// Hardware addresses in report order. May repeat within one record.
    pub macs: Vec<String>,
}

/// One (identity, colliding-address) pairing found by the detector.
///
/// An identity that collides on several addresses yields several of these
/// with identical fields; consumers group per hostname keyed by guid, so
/// repeats collapse naturally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateRecord {
    pub hostname: String,
    pub connector_guid: String,
    pub last_seen: DateTime<Utc>,
}

/// Result of one delete attempt against the inventory API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionOutcome {
    pub connector_guid: String,
    /// True only when the API returned 200 with an explicit deleted flag.
    pub removed: bool,
    /// Human-readable status line for the deletion log.
    pub status: String,
}

impl DeletionOutcome {
    /// Outcome for a confirmed deletion.
    #[must_use]
    pub fn removed(connector_guid: impl Into<String>) -> Self {
        Self {
            connector_guid: connector_guid.into(),
            removed: true,
            status: "deleted".to_string(),
        }
    }

    /// Outcome for a failed attempt, with the reason for the log.
    #[must_use]
    pub fn failed(connector_guid: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            connector_guid: connector_guid.into(),
            removed: false,
            status: format!("failed: {}", reason.into()),
        }
    }
}
