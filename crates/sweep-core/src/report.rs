//! Report-row shaping and deletion outcome accounting.
//!
//! Detection emits records in aggregate order with repeats for multi-address
//! collisions; presentation ordering and collapsing happen here, at the
//! formatting boundary.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::records::{DeletionOutcome, DuplicateRecord};

/// Row of the pre-deletion report: one line per duplicate identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateRow {
    pub hostname: String,
    pub last_seen: DateTime<Utc>,
    pub connector_guid: String,
}

/// Row of the post-deletion report: a pre-deletion row plus its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeRow {
    pub hostname: String,
    pub last_seen: DateTime<Utc>,
    pub connector_guid: String,
    pub removed: bool,
}

/// Stable presentation rows: sorted by (hostname, last_seen, guid) with
/// exact repeats collapsed.
#[must_use]
pub fn presentation_rows(records: &[DuplicateRecord]) -> Vec<DuplicateRow> {
    let mut rows: Vec<DuplicateRow> = records
        .iter()
        .map(|record| DuplicateRow {
            hostname: record.hostname.clone(),
            last_seen: record.last_seen,
            connector_guid: record.connector_guid.clone(),
        })
        .collect();
    rows.sort_by(|a, b| {
        (&a.hostname, a.last_seen, &a.connector_guid)
            .cmp(&(&b.hostname, b.last_seen, &b.connector_guid))
    });
    rows.dedup();
    rows
}

/// Guids the executor actually removed.
#[must_use]
pub fn success_set(outcomes: &[DeletionOutcome]) -> BTreeSet<String> {
    outcomes
        .iter()
        .filter(|outcome| outcome.removed)
        .map(|outcome| outcome.connector_guid.clone())
        .collect()
}

/// Annotate presentation rows with the executor's success set. A row is
/// marked removed iff its guid is in the set.
#[must_use]
pub fn annotate_removed(rows: &[DuplicateRow], removed: &BTreeSet<String>) -> Vec<OutcomeRow> {
    rows.iter()
        .map(|row| OutcomeRow {
            hostname: row.hostname.clone(),
            last_seen: row.last_seen,
            connector_guid: row.connector_guid.clone(),
            removed: removed.contains(&row.connector_guid),
        })
        .collect()
}
