//! Per-hostname aggregation of device records.
//!
//! Ingestion is a single fold over the record stream: each record lands in
//! the [`HostAggregate`] for its hostname. Aggregates are mutated only during
//! that pass and read-only afterwards.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::records::DeviceRecord;

/// Everything reported under one hostname.
///
/// Holds the flattened multiset of addresses (arrival order preserved), the
/// identities that reported each address, and each identity's last-seen
/// timestamp. Each record contributes each of its address occurrences to the
/// multiset exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostAggregate {
    macs: Vec<String>,
    mac_guids: BTreeMap<String, BTreeSet<String>>,
    guid_last_seen: BTreeMap<String, DateTime<Utc>>,
}

impl HostAggregate {
    fn absorb(&mut self, record: &DeviceRecord) {
        // Last write wins if the same guid somehow appears twice.
        self.guid_last_seen
            .insert(record.connector_guid.clone(), record.last_seen);

        for mac in &record.macs {
            self.macs.push(mac.clone());
            self.mac_guids
                .entry(mac.clone())
                .or_default()
                .insert(record.connector_guid.clone());
        }
    }

    /// How many times `mac` occurs in the flattened multiset.
    #[must_use]
    pub fn occurrences(&self, mac: &str) -> usize {
        self.macs.iter().filter(|m| m.as_str() == mac).count()
    }

    /// Distinct identities that reported `mac`, in guid order.
    #[must_use]
    pub fn reporters(&self, mac: &str) -> Option<&BTreeSet<String>> {
        self.mac_guids.get(mac)
    }

    /// Every aggregated address with its reporter set, in address order.
    pub fn address_reporters(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.mac_guids.iter()
    }

    /// Last-seen timestamp recorded for `guid`.
    #[must_use]
    pub fn last_seen(&self, guid: &str) -> Option<DateTime<Utc>> {
        self.guid_last_seen.get(guid).copied()
    }

    /// Number of distinct identities that reported this hostname.
    #[must_use]
    pub fn identity_count(&self) -> usize {
        self.guid_last_seen.len()
    }
}

/// Inventory-wide aggregates, keyed by hostname.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostIndex {
    hosts: BTreeMap<String, HostAggregate>,
}

impl HostIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record into its hostname's aggregate.
    pub fn ingest(&mut self, record: &DeviceRecord) {
        self.hosts
            .entry(record.hostname.clone())
            .or_default()
            .absorb(record);
    }

    /// Fold a whole page of records.
    pub fn ingest_all<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a DeviceRecord>,
    {
        for record in records {
            self.ingest(record);
        }
    }

    /// Hostnames with their aggregates, in hostname order.
    pub fn hosts(&self) -> impl Iterator<Item = (&String, &HostAggregate)> {
        self.hosts.iter()
    }

    /// Number of distinct hostnames seen.
    #[must_use]
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    /// Number of distinct identities across every hostname.
    #[must_use]
    pub fn identity_count(&self) -> usize {
        self.hosts.values().map(HostAggregate::identity_count).sum()
    }
}
