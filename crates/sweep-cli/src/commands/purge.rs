use anyhow::bail;
use serde::Serialize;

use sweep_config::SweepConfig;
use sweep_core::records::DeletionOutcome;
use sweep_core::report::{annotate_removed, success_set};
use sweep_core::retention::RetentionPlan;
use sweep_inventory::InventoryClient;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::PurgeArgs;
use crate::commands::scan::report_paths;
use crate::commands::shared;
use crate::output::output;
use crate::progress::Progress;
use crate::prompt;
use crate::reports;

#[derive(Debug, Serialize)]
struct PurgeResponse {
    duplicate_hosts: usize,
    duplicate_identities: usize,
    targeted: usize,
    removed: usize,
    failed: usize,
    dry_run: bool,
    reports: Vec<String>,
}

/// Handle `msw purge`.
pub async fn handle(
    args: &PurgeArgs,
    config: &SweepConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let client = shared::build_client(config)?;
    let survey = shared::survey(&client).await?;
    let dir = &config.reports.dir;

    // The pre-deletion report goes to disk before anything is removed, so
    // there is a record of what the run saw even if it stops here.
    let mut written = Vec::new();
    written.push(reports::write_pre_report(dir, &survey.rows)?);
    if config.reports.json_export {
        written.push(reports::write_duplicate_hosts_json(dir, &survey.rows)?);
    }
    for path in &written {
        tracing::info!(path = %path.display(), "report written");
    }

    if survey.plan.is_empty() {
        tracing::info!("no duplicate identities found; nothing to delete");
        return output(
            &PurgeResponse {
                duplicate_hosts: survey.plan.decisions.len(),
                duplicate_identities: survey.rows.len(),
                targeted: 0,
                removed: 0,
                failed: 0,
                dry_run: args.dry_run,
                reports: report_paths(&written),
            },
            flags.format,
        );
    }

    if args.dry_run {
        for decision in &survey.plan.decisions {
            tracing::info!(
                hostname = %decision.hostname,
                keep = %decision.keep,
                delete = ?decision.delete,
                "dry run: would delete"
            );
        }
        return output(
            &PurgeResponse {
                duplicate_hosts: survey.plan.decisions.len(),
                duplicate_identities: survey.rows.len(),
                targeted: survey.plan.target_count(),
                removed: 0,
                failed: 0,
                dry_run: true,
                reports: report_paths(&written),
            },
            flags.format,
        );
    }

    if !args.yes {
        if !prompt::stdin_is_interactive() {
            bail!("refusing to delete without confirmation; pass --yes to run non-interactively");
        }
        let question = format!(
            "About to delete {} stale identities across {} hostnames",
            survey.plan.target_count(),
            survey.plan.decisions.len(),
        );
        if !prompt::confirm(&question)? {
            bail!("aborted: no identities were deleted");
        }
    }

    let outcomes = execute_deletions(&client, &survey.plan).await;

    let annotated = annotate_removed(&survey.rows, &success_set(&outcomes));
    for path in [
        reports::write_deletion_log(dir, &outcomes)?,
        reports::write_post_report(dir, &annotated)?,
    ] {
        tracing::info!(path = %path.display(), "report written");
        written.push(path);
    }

    let removed = outcomes.iter().filter(|o| o.removed).count();
    let failed = outcomes.len() - removed;
    if failed > 0 {
        tracing::warn!(failed, "some deletions were not confirmed");
    }

    output(
        &PurgeResponse {
            duplicate_hosts: survey.plan.decisions.len(),
            duplicate_identities: survey.rows.len(),
            targeted: outcomes.len(),
            removed,
            failed,
            dry_run: false,
            reports: report_paths(&written),
        },
        flags.format,
    )
}

/// Delete the targets one at a time, strictly in plan order. A failed
/// deletion is recorded and the loop moves on; nothing is retried.
async fn execute_deletions(
    client: &InventoryClient,
    plan: &RetentionPlan,
) -> Vec<DeletionOutcome> {
    let progress = Progress::bar(plan.target_count() as u64, "deleting stale identities");
    let mut outcomes = Vec::with_capacity(plan.target_count());

    for guid in plan.targets() {
        match client.delete_computer(guid).await {
            Ok(true) => {
                tracing::debug!(guid, "identity deleted");
                outcomes.push(DeletionOutcome::removed(guid));
            }
            Ok(false) => {
                tracing::warn!(guid, "service did not confirm the removal");
                outcomes.push(DeletionOutcome::failed(guid, "no removal confirmation"));
            }
            Err(error) => {
                tracing::warn!(guid, %error, "deletion failed");
                outcomes.push(DeletionOutcome::failed(guid, error.to_string()));
            }
        }
        progress.inc(1);
    }

    progress.finish_ok("deletion pass complete");
    outcomes
}
