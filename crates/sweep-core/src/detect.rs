//! Duplicate detection across host aggregates.

use crate::aggregate::HostIndex;
use crate::records::DuplicateRecord;

/// Scan every aggregate for hardware addresses reported by two or more
/// distinct identities under the same hostname.
///
/// Emits one [`DuplicateRecord`] per (identity, colliding address) pairing,
/// so an identity colliding on several addresses appears several times; the
/// retention selector collapses repeats by keying on guid. An address
/// repeated inside a single identity's own report never counts as a
/// collision: it occurs twice but its reporter set holds one guid.
///
/// Emission order follows the aggregate's ordered maps; presentation ordering
/// is imposed later at the report boundary.
#[must_use]
pub fn find_duplicates(index: &HostIndex) -> Vec<DuplicateRecord> {
    let mut records = Vec::new();

    for (hostname, aggregate) in index.hosts() {
        for (mac, reporters) in aggregate.address_reporters() {
            if aggregate.occurrences(mac) < 2 || reporters.len() < 2 {
                continue;
            }
            for guid in reporters {
                let Some(last_seen) = aggregate.last_seen(guid) else {
                    continue;
                };
                records.push(DuplicateRecord {
                    hostname: hostname.clone(),
                    connector_guid: guid.clone(),
                    last_seen,
                });
            }
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::aggregate::HostIndex;
    use crate::records::DeviceRecord;

    fn record(guid: &str, hostname: &str, seen: &str, macs: &[&str]) -> DeviceRecord {
        DeviceRecord {
            connector_guid: guid.to_string(),
            hostname: hostname.to_string(),
            last_seen: seen.parse().expect("test timestamp"),
            macs: macs.iter().map(ToString::to_string).collect(),
        }
    }

    fn index_of(records: &[DeviceRecord]) -> HostIndex {
        let mut index = HostIndex::new();
        index.ingest_all(records);
        index
    }

    #[test]
    fn shared_address_yields_a_record_per_identity() {
        let index = index_of(&[
            record("a", "h1", "2024-03-01T10:00:00Z", &["m1"]),
            record("b", "h1", "2024-03-02T10:00:00Z", &["m1"]),
        ]);

        let mut guids: Vec<_> = find_duplicates(&index)
            .into_iter()
            .map(|r| r.connector_guid)
            .collect();
        guids.sort();
        assert_eq!(guids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn single_identity_with_repeated_address_is_not_a_duplicate() {
        let index = index_of(&[record("c", "h2", "2024-03-03T10:00:00Z", &["m2", "m2"])]);
        assert_eq!(find_duplicates(&index), vec![]);
    }

    #[test]
    fn same_address_under_different_hostnames_is_not_a_collision() {
        let index = index_of(&[
            record("a", "h1", "2024-03-01T10:00:00Z", &["m1"]),
            record("b", "h2", "2024-03-02T10:00:00Z", &["m1"]),
        ]);
        assert_eq!(find_duplicates(&index), vec![]);
    }

    #[test]
    fn identity_colliding_on_two_addresses_is_emitted_once_per_address() {
        let index = index_of(&[
            record("a", "h1", "2024-03-01T10:00:00Z", &["m1", "m2"]),
            record("b", "h1", "2024-03-02T10:00:00Z", &["m1", "m2"]),
        ]);

        let records = find_duplicates(&index);
        assert_eq!(records.len(), 4);
        let for_a = records.iter().filter(|r| r.connector_guid == "a").count();
        assert_eq!(for_a, 2);
    }

    #[test]
    fn disjoint_addresses_under_one_hostname_are_not_duplicates() {
        let index = index_of(&[
            record("a", "h1", "2024-03-01T10:00:00Z", &["m1"]),
            record("b", "h1", "2024-03-02T10:00:00Z", &["m2"]),
        ]);
        assert_eq!(find_duplicates(&index), vec![]);
    }
}
