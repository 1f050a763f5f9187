//! Retention selection: keep the newest identity, delete the rest.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::records::DuplicateRecord;

/// Keep/delete split for one hostname's duplicate group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetentionDecision {
    pub hostname: String,
    /// The identity with the maximal last-seen; on a timestamp tie the
    /// lexicographically smaller guid is kept.
    pub keep: String,
    /// Every other identity in the group, oldest first then guid order.
    pub delete: Vec<String>,
}

/// Every retention decision for one run, hostnames in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RetentionPlan {
    pub decisions: Vec<RetentionDecision>,
}

impl RetentionPlan {
    /// The flat delete sequence, concatenated across hostnames.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.decisions
            .iter()
            .flat_map(|d| d.delete.iter().map(String::as_str))
    }

    #[must_use]
    pub fn target_count(&self) -> usize {
        self.decisions.iter().map(|d| d.delete.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}

/// Collapse duplicate records into per-hostname groups keyed by guid.
///
/// The detector emits one record per colliding address, so the same guid may
/// arrive several times; keying by guid absorbs the repeats. Timestamps for
/// one guid are identical across repeats, so any write wins.
#[must_use]
pub fn duplicate_groups(
    records: &[DuplicateRecord],
) -> BTreeMap<String, BTreeMap<String, DateTime<Utc>>> {
    let mut groups: BTreeMap<String, BTreeMap<String, DateTime<Utc>>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.hostname.clone())
            .or_default()
            .insert(record.connector_guid.clone(), record.last_seen);
    }
    groups
}

/// Partition every duplicate group into one kept identity and the delete set.
///
/// Groups holding a single distinct guid are skipped: an identity that
/// collided only with itself across several addresses is not a true
/// duplicate. The rule is exactly "keep newest, delete all else"; there is
/// no retention count and no grace period.
#[must_use]
pub fn select_retention(records: &[DuplicateRecord]) -> RetentionPlan {
    let mut decisions = Vec::new();

    for (hostname, group) in duplicate_groups(records) {
        // A true duplicate group holds at least two identities.
        if group.len() < 2 {
            continue;
        }

        // Group iterates guid-ascending, so a strict comparison keeps the
        // smaller guid when two timestamps tie.
        let mut keep: Option<(&String, DateTime<Utc>)> = None;
        for (guid, &seen) in &group {
            match keep {
                Some((_, best)) if seen <= best => {}
                _ => keep = Some((guid, seen)),
            }
        }
        let Some((keep_guid, _)) = keep else {
            continue;
        };

        let mut stale: Vec<(DateTime<Utc>, &String)> = group
            .iter()
            .filter(|(guid, _)| *guid != keep_guid)
            .map(|(guid, &seen)| (seen, guid))
            .collect();
        stale.sort();

        decisions.push(RetentionDecision {
            hostname,
            keep: keep_guid.clone(),
            delete: stale.into_iter().map(|(_, guid)| guid.clone()).collect(),
        });
    }

    RetentionPlan { decisions }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::records::DuplicateRecord;

    fn dup(hostname: &str, guid: &str, seen: &str) -> DuplicateRecord {
        DuplicateRecord {
            hostname: hostname.to_string(),
            connector_guid: guid.to_string(),
            last_seen: seen.parse().expect("test timestamp"),
        }
    }

    #[test]
    fn keeps_the_newest_and_deletes_the_rest() {
        let plan = select_retention(&[
            dup("h1", "a", "2024-03-01T10:00:00Z"),
            dup("h1", "b", "2024-03-02T10:00:00Z"),
            dup("h1", "c", "2024-03-03T10:00:00Z"),
        ]);

        assert_eq!(plan.decisions.len(), 1);
        let decision = &plan.decisions[0];
        assert_eq!(decision.keep, "c");
        assert_eq!(decision.delete, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(plan.target_count(), 2);
    }

    #[test]
    fn repeats_from_multi_address_collisions_collapse() {
        // Same pair collides on two addresses: the detector emitted each guid
        // twice, but the group holds each once.
        let plan = select_retention(&[
            dup("h1", "a", "2024-03-01T10:00:00Z"),
            dup("h1", "b", "2024-03-02T10:00:00Z"),
            dup("h1", "a", "2024-03-01T10:00:00Z"),
            dup("h1", "b", "2024-03-02T10:00:00Z"),
        ]);

        assert_eq!(plan.decisions.len(), 1);
        assert_eq!(plan.decisions[0].keep, "b");
        assert_eq!(plan.decisions[0].delete, vec!["a".to_string()]);
    }

    #[test]
    fn single_guid_group_is_not_a_duplicate() {
        let plan = select_retention(&[
            dup("h2", "c", "2024-03-03T10:00:00Z"),
            dup("h2", "c", "2024-03-03T10:00:00Z"),
        ]);
        assert!(plan.is_empty());
    }

    #[test]
    fn timestamp_tie_keeps_the_smaller_guid() {
        let plan = select_retention(&[
            dup("h1", "b", "2024-03-01T10:00:00Z"),
            dup("h1", "a", "2024-03-01T10:00:00Z"),
        ]);

        assert_eq!(plan.decisions[0].keep, "a");
        assert_eq!(plan.decisions[0].delete, vec!["b".to_string()]);
    }

    #[test]
    fn hostnames_and_targets_come_out_in_deterministic_order() {
        let plan = select_retention(&[
            dup("h2", "x", "2024-03-01T10:00:00Z"),
            dup("h2", "y", "2024-03-02T10:00:00Z"),
            dup("h1", "p", "2024-03-04T10:00:00Z"),
            dup("h1", "q", "2024-03-03T10:00:00Z"),
            dup("h1", "r", "2024-03-05T10:00:00Z"),
        ]);

        let hostnames: Vec<_> = plan.decisions.iter().map(|d| d.hostname.clone()).collect();
        assert_eq!(hostnames, vec!["h1".to_string(), "h2".to_string()]);

        let targets: Vec<_> = plan.targets().collect();
        // h1 deletes oldest-first (q then p), then h2's x.
        assert_eq!(targets, vec!["q", "p", "x"]);
    }

    #[test]
    fn kept_identity_is_never_older_than_a_deleted_one() {
        let records = vec![
            dup("h1", "a", "2024-01-01T00:00:00Z"),
            dup("h1", "b", "2024-06-01T00:00:00Z"),
            dup("h1", "c", "2024-03-01T00:00:00Z"),
            dup("h9", "d", "2023-01-01T00:00:00Z"),
            dup("h9", "e", "2023-01-02T00:00:00Z"),
        ];
        let groups = duplicate_groups(&records);
        let plan = select_retention(&records);

        for decision in &plan.decisions {
            let group = &groups[&decision.hostname];
            let kept = group[&decision.keep];
            for deleted in &decision.delete {
                assert!(kept >= group[deleted]);
            }
        }
    }
}
