use std::path::PathBuf;

use serde::Serialize;

use sweep_config::SweepConfig;

use crate::cli::GlobalFlags;
use crate::commands::shared;
use crate::output::output;
use crate::reports;

#[derive(Debug, Serialize)]
struct ScanResponse {
    total_devices: u64,
    skipped_entries: u64,
    hosts: usize,
    identities: usize,
    duplicate_hosts: usize,
    duplicate_identities: usize,
    stale_identities: usize,
    reports: Vec<String>,
}

/// Handle `msw scan`.
pub async fn handle(config: &SweepConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = shared::build_client(config)?;
    let survey = shared::survey(&client).await?;

    let dir = &config.reports.dir;
    let mut written = Vec::new();
    written.push(reports::write_pre_report(dir, &survey.rows)?);
    if config.reports.json_export {
        written.push(reports::write_duplicate_hosts_json(dir, &survey.rows)?);
    }
    for path in &written {
        tracing::info!(path = %path.display(), "report written");
    }

    output(
        &ScanResponse {
            total_devices: survey.total,
            skipped_entries: survey.skipped,
            hosts: survey.host_count,
            identities: survey.identity_count,
            duplicate_hosts: survey.plan.decisions.len(),
            duplicate_identities: survey.rows.len(),
            stale_identities: survey.plan.target_count(),
            reports: report_paths(&written),
        },
        flags.format,
    )
}

pub(crate) fn report_paths(written: &[PathBuf]) -> Vec<String> {
    written.iter().map(|p| p.display().to_string()).collect()
}
