//! End-to-end runs of the detection pipeline: ingest, detect, select,
//! account. No I/O; records go in, rows and targets come out.

use pretty_assertions::assert_eq;
use sweep_core::aggregate::HostIndex;
use sweep_core::detect::find_duplicates;
use sweep_core::records::{DeletionOutcome, DeviceRecord};
use sweep_core::report::{annotate_removed, presentation_rows, success_set};
use sweep_core::retention::select_retention;

fn record(guid: &str, hostname: &str, seen: &str, macs: &[&str]) -> DeviceRecord {
    DeviceRecord {
        connector_guid: guid.to_string(),
        hostname: hostname.to_string(),
        last_seen: seen.parse().expect("test timestamp"),
        macs: macs.iter().map(|m| (*m).to_string()).collect(),
    }
}

fn fleet() -> Vec<DeviceRecord> {
    vec![
        // Three registrations of the same laptop: re-imaged twice, each
        // install reporting the same adapter.
        record("g-old", "laptop-7", "2024-01-05T08:00:00Z", &["aa:bb:cc:dd:ee:01"]),
        record("g-mid", "laptop-7", "2024-02-11T09:30:00Z", &["aa:bb:cc:dd:ee:01"]),
        record("g-new", "laptop-7", "2024-03-20T16:45:00Z", &["aa:bb:cc:dd:ee:01"]),
        // Two identities under one hostname, colliding on two adapters.
        record(
            "g-dock-a",
            "desk-02",
            "2024-03-01T10:00:00Z",
            &["aa:bb:cc:dd:ee:02", "aa:bb:cc:dd:ee:03"],
        ),
        record(
            "g-dock-b",
            "desk-02",
            "2024-03-04T10:00:00Z",
            &["aa:bb:cc:dd:ee:02", "aa:bb:cc:dd:ee:03"],
        ),
        // Healthy single-identity host, never reported.
        record("g-solo", "server-1", "2024-03-19T00:00:00Z", &["aa:bb:cc:dd:ee:04"]),
        // Same adapter as laptop-7 but under a different hostname: no
        // collision across hostname boundaries.
        record("g-other", "loaner-9", "2024-03-18T12:00:00Z", &["aa:bb:cc:dd:ee:01"]),
    ]
}

fn run_detection(records: &[DeviceRecord]) -> Vec<sweep_core::records::DuplicateRecord> {
    let mut index = HostIndex::new();
    index.ingest_all(records);
    find_duplicates(&index)
}

#[test]
fn duplicates_surface_only_hosts_with_shared_addresses() {
    let duplicates = run_detection(&fleet());
    let rows = presentation_rows(&duplicates);

    let hostnames: Vec<_> = rows.iter().map(|r| r.hostname.as_str()).collect();
    assert!(hostnames.contains(&"laptop-7"));
    assert!(hostnames.contains(&"desk-02"));
    assert!(!hostnames.contains(&"server-1"));
    assert!(!hostnames.contains(&"loaner-9"));
    // One row per duplicate identity, multi-address repeats collapsed.
    assert_eq!(rows.len(), 5);
}

#[test]
fn retention_keeps_the_newest_identity_per_hostname() {
    let duplicates = run_detection(&fleet());
    let plan = select_retention(&duplicates);

    let targets: Vec<_> = plan.targets().collect();
    assert_eq!(targets, vec!["g-dock-a", "g-old", "g-mid"]);
    assert!(!targets.contains(&"g-new"));
    assert!(!targets.contains(&"g-dock-b"));
}

#[test]
fn partial_failure_leaves_the_failed_row_unmarked() {
    let duplicates = run_detection(&fleet());
    let rows = presentation_rows(&duplicates);
    let plan = select_retention(&duplicates);

    // The executor removes everything except g-mid, which the service
    // rejects.
    let outcomes: Vec<_> = plan
        .targets()
        .map(|guid| {
            if guid == "g-mid" {
                DeletionOutcome::failed(guid, "API error (409): conflict")
            } else {
                DeletionOutcome::removed(guid)
            }
        })
        .collect();

    let annotated = annotate_removed(&rows, &success_set(&outcomes));
    let marked: Vec<_> = annotated
        .iter()
        .filter(|row| row.removed)
        .map(|row| row.connector_guid.as_str())
        .collect();
    assert_eq!(marked, vec!["g-dock-a", "g-old"]);

    let unmarked: Vec<_> = annotated
        .iter()
        .filter(|row| !row.removed)
        .map(|row| row.connector_guid.as_str())
        .collect();
    assert_eq!(unmarked, vec!["g-dock-b", "g-mid", "g-new"]);
}

#[test]
fn rerun_after_full_cleanup_finds_nothing() {
    let duplicates = run_detection(&fleet());
    let plan = select_retention(&duplicates);
    let deleted: Vec<_> = plan.targets().map(str::to_string).collect();

    let survivors: Vec<_> = fleet()
        .into_iter()
        .filter(|r| !deleted.contains(&r.connector_guid))
        .collect();

    let second_pass = run_detection(&survivors);
    assert!(second_pass.is_empty());
    assert!(select_retention(&second_pass).is_empty());
}

#[test]
fn rerun_after_partial_cleanup_still_targets_the_leftovers() {
    // Only g-old actually went away; g-mid and g-dock-a survived.
    let survivors: Vec<_> = fleet()
        .into_iter()
        .filter(|r| r.connector_guid != "g-old")
        .collect();

    let second_pass = run_detection(&survivors);
    let second_plan = select_retention(&second_pass);
    let targets: Vec<_> = second_plan.targets().collect();
    assert_eq!(targets, vec!["g-dock-a", "g-mid"]);
}

#[test]
fn empty_inventory_produces_empty_everything() {
    let duplicates = run_detection(&[]);
    assert!(duplicates.is_empty());

    let plan = select_retention(&duplicates);
    assert!(plan.is_empty());
    assert_eq!(plan.target_count(), 0);
    assert!(presentation_rows(&duplicates).is_empty());
}
