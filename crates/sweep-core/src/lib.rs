//! # sweep-core
//!
//! Data model and duplicate-resolution algorithm for MacSweep.
//!
//! This crate holds everything that does not touch the network or the
//! filesystem:
//! - Record types flowing through the pipeline (device records, duplicate
//!   records, deletion outcomes)
//! - Per-hostname aggregation of reported hardware addresses
//! - Duplicate detection (addresses shared by distinct identities)
//! - Retention selection (keep the newest identity, delete the rest)
//! - Report-row shaping and outcome accounting
//!
//! The pipeline is a single pass: aggregate every record, detect collisions,
//! select what to keep, then shape rows for the reports. All keyed containers
//! are ordered so a given inventory always produces the same output.

pub mod aggregate;
pub mod detect;
pub mod records;
pub mod report;
pub mod retention;
