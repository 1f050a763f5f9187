//! Steps shared by scan and purge: credential resolution and the survey pass.

use anyhow::{Context, bail};

use sweep_config::SweepConfig;
use sweep_core::aggregate::HostIndex;
use sweep_core::detect::find_duplicates;
use sweep_core::report::{DuplicateRow, presentation_rows};
use sweep_core::retention::{RetentionPlan, select_retention};
use sweep_inventory::InventoryClient;

use crate::progress::Progress;
use crate::prompt;

/// Build the API client, prompting for whichever credential the
/// configuration does not carry.
pub fn build_client(config: &SweepConfig) -> anyhow::Result<InventoryClient> {
    let api = &config.api;
    if api.is_configured() {
        return Ok(InventoryClient::new(
            &api.base_url,
            &api.client_id,
            &api.api_key,
        ));
    }

    if !prompt::stdin_is_interactive() {
        bail!(
            "api credentials are not configured; set MACSWEEP_API__CLIENT_ID and \
             MACSWEEP_API__API_KEY (or [api] in .macsweep/config.toml)"
        );
    }

    let client_id = if api.client_id.is_empty() {
        prompt::read_line("Enter the Client ID")?
    } else {
        api.client_id.clone()
    };
    let api_key = if api.api_key.is_empty() {
        prompt::read_line("Enter the API Key")?
    } else {
        api.api_key.clone()
    };
    if client_id.is_empty() || api_key.is_empty() {
        bail!("both a client id and an api key are required");
    }

    Ok(InventoryClient::new(&api.base_url, &client_id, &api_key))
}

/// Everything scan and purge both need from one enumeration pass.
pub struct Survey {
    pub total: u64,
    pub skipped: u64,
    pub host_count: usize,
    pub identity_count: usize,
    pub rows: Vec<DuplicateRow>,
    pub plan: RetentionPlan,
}

/// Enumerate the full inventory, then detect duplicates and select
/// retention.
///
/// Any enumeration failure aborts here, before a single deletion can
/// happen: an incomplete inventory could misidentify the newest identity
/// to keep.
pub async fn survey(client: &InventoryClient) -> anyhow::Result<Survey> {
    let progress = Progress::spinner("enumerating device records");
    let snapshot = match client.list_computers().await {
        Ok(snapshot) => snapshot,
        Err(error) => {
            progress.finish_err("enumeration failed");
            return Err(error).context("inventory enumeration failed; nothing was deleted");
        }
    };
    progress.finish_clear();

    let mut index = HostIndex::new();
    index.ingest_all(&snapshot.records);

    let duplicates = find_duplicates(&index);
    let rows = presentation_rows(&duplicates);
    let plan = select_retention(&duplicates);

    tracing::info!(
        devices = snapshot.records.len(),
        hosts = index.host_count(),
        duplicate_hosts = plan.decisions.len(),
        stale = plan.target_count(),
        "survey complete"
    );

    Ok(Survey {
        total: snapshot.total,
        skipped: snapshot.skipped,
        host_count: index.host_count(),
        identity_count: index.identity_count(),
        rows,
        plan,
    })
}
