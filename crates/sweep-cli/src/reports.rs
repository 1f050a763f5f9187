//! Delimited report files and the JSON export.
//!
//! Every run that surveys the inventory writes `duplicates_pre.csv`; a purge
//! additionally writes `deletions.csv` and `duplicates_post.csv` once the
//! deletion pass has finished. Timestamps are rendered as RFC 3339 in UTC
//! with a `Z` suffix.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use sweep_core::records::DeletionOutcome;
use sweep_core::report::{DuplicateRow, OutcomeRow};

pub const PRE_REPORT: &str = "duplicates_pre.csv";
pub const DELETION_LOG: &str = "deletions.csv";
pub const POST_REPORT: &str = "duplicates_post.csv";
pub const JSON_EXPORT: &str = "duplicate_hosts.json";

fn timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Quote a field when it contains the delimiter, a quote, or a line break;
/// embedded quotes are doubled.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

fn write_report(dir: &str, name: &str, contents: &str) -> anyhow::Result<PathBuf> {
    let dir = Path::new(dir);
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create report directory {}", dir.display()))?;
    let path = dir.join(name);
    fs::write(&path, contents)
        .with_context(|| format!("failed to write report {}", path.display()))?;
    Ok(path)
}

/// Write the pre-deletion report: every identity on a hostname that shares
/// a hardware address, one per line.
pub fn write_pre_report(dir: &str, rows: &[DuplicateRow]) -> anyhow::Result<PathBuf> {
    let mut contents = String::from("HOSTNAME,LAST_SEEN,GUID\n");
    for row in rows {
        contents.push_str(&format!(
            "{},{},{}\n",
            csv_field(&row.hostname),
            csv_field(&timestamp(&row.last_seen)),
            csv_field(&row.connector_guid),
        ));
    }
    write_report(dir, PRE_REPORT, &contents)
}

/// Write the deletion log: one line per attempted deletion, in the order
/// the attempts were made.
pub fn write_deletion_log(dir: &str, outcomes: &[DeletionOutcome]) -> anyhow::Result<PathBuf> {
    let mut contents = String::from("GUID,STATUS\n");
    for outcome in outcomes {
        contents.push_str(&format!(
            "{},{}\n",
            csv_field(&outcome.connector_guid),
            csv_field(&outcome.status),
        ));
    }
    write_report(dir, DELETION_LOG, &contents)
}

/// Write the post-deletion report: the pre-deletion rows again, with a
/// REMOVED column that reads `yes` for confirmed deletions and stays empty
/// otherwise.
pub fn write_post_report(dir: &str, rows: &[OutcomeRow]) -> anyhow::Result<PathBuf> {
    let mut contents = String::from("HOSTNAME,LAST_SEEN,GUID,REMOVED\n");
    for row in rows {
        contents.push_str(&format!(
            "{},{},{},{}\n",
            csv_field(&row.hostname),
            csv_field(&timestamp(&row.last_seen)),
            csv_field(&row.connector_guid),
            if row.removed { "yes" } else { "" },
        ));
    }
    write_report(dir, POST_REPORT, &contents)
}

#[derive(Serialize)]
struct JsonIdentity {
    connector_guid: String,
    last_seen: String,
}

/// Write the machine-readable export: hostnames mapped to their duplicate
/// identities, oldest first.
pub fn write_duplicate_hosts_json(dir: &str, rows: &[DuplicateRow]) -> anyhow::Result<PathBuf> {
    let mut hosts: BTreeMap<&str, Vec<JsonIdentity>> = BTreeMap::new();
    for row in rows {
        hosts.entry(&row.hostname).or_default().push(JsonIdentity {
            connector_guid: row.connector_guid.clone(),
            last_seen: timestamp(&row.last_seen),
        });
    }
    let mut contents =
        serde_json::to_string_pretty(&hosts).context("failed to serialize the JSON export")?;
    contents.push('\n');
    write_report(dir, JSON_EXPORT, &contents)
}
