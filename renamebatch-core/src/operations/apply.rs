use crate::execute::{execute_plan, ExecuteOptions};
use crate::filter::{filter_files, FilterRule, MatchMode};
use crate::history::{History, HistoryEntry};
use crate::listing::list_files;
use crate::lock::LockFile;
use crate::output::ApplyResult;
use crate::pipeline::RenameStep;
use crate::plan::{build_plan, ItemStatus, RenamePlan};
use crate::preview::{format_confirm_message, render_plan, Preview};
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// How an apply run should behave beyond the filter/step inputs.
#[derive(Debug, Clone, Default)]
pub struct ApplyRequest {
    /// Mark eligible items instead of renaming them.
    pub dry_run: bool,
    /// Explicit audit-log path; defaults to
    /// `.renamebatch/logs/undo_<plan-id>.csv`.
    pub audit_log: Option<PathBuf>,
    /// Skip the audit log entirely.
    pub no_audit_log: bool,
    /// Skip the confirmation prompt.
    pub auto_approve: bool,
    /// Preview rendered before the result (and before the prompt).
    pub preview_format: Preview,
    pub use_color: Option<bool>,
}

/// Apply operation - builds the plan, confirms, executes the eligible
/// items, writes the audit log and records history.
pub fn apply_operation(
    folder: &Path,
    rules: &[FilterRule],
    match_mode: MatchMode,
    case_sensitive: bool,
    steps: &[RenameStep],
    request: &ApplyRequest,
    working_dir: Option<&Path>,
) -> Result<(ApplyResult, Option<String>)> {
    let state_dir = super::state_dir(working_dir);
    let folder = super::resolve_folder(folder, working_dir);

    // Dry runs are read-only; only real applies need the lock.
    let _lock = if request.dry_run {
        None
    } else {
        Some(
            LockFile::acquire(&state_dir)
                .context("Failed to acquire lock for renamebatch operation")?,
        )
    };

    let files = list_files(&folder)?;
    let filtered = filter_files(&files, rules, match_mode, case_sensitive);
    let mut plan = build_plan(&folder, &filtered, steps);

    let mut preview_content = match request.preview_format {
        Preview::None => None,
        format => Some(render_plan(&plan, format, request.use_color)),
    };

    if !request.dry_run && !request.auto_approve {
        // Show the preview here, ahead of the prompt; the caller then gets
        // `None` so it is not printed twice.
        if let Some(content) = preview_content.take() {
            println!("{}", content);
        }
        println!("{}", format_confirm_message(&plan.summary));
        if !get_user_confirmation()? {
            return Ok((
                ApplyResult {
                    plan_id: plan.id.clone(),
                    folder,
                    dry_run: false,
                    aborted: true,
                    renamed: 0,
                    skipped: 0,
                    errors: 0,
                    audit_log: None,
                    plan: None,
                },
                None,
            ));
        }
    }

    let execute_options = ExecuteOptions {
        dry_run: request.dry_run,
        log_file: if request.dry_run {
            None
        } else {
            Some(state_dir.join("logs").join(format!("{}.log", plan.id)))
        },
    };
    let stats = execute_plan(&mut plan, &execute_options)?;

    // Audit-log failure degrades to a warning; the renames already happened.
    let audit_log = if request.no_audit_log {
        None
    } else {
        let path = request.audit_log.clone().unwrap_or_else(|| {
            state_dir.join("logs").join(format!("undo_{}.csv", plan.id))
        });
        match crate::audit::write_audit_log(&path, &plan.items) {
            Ok(()) => Some(path),
            Err(e) => {
                eprintln!("Warning: no audit log saved: {:#}", e);
                None
            },
        }
    };

    // An apply that performed no renames leaves nothing to undo; recording
    // it would shadow the previous batch for `undo latest`.
    if request.dry_run || stats.renamed > 0 {
        record_history(&state_dir, &plan, request.dry_run, &stats, audit_log.as_deref())?;
    }

    let result = ApplyResult {
        plan_id: plan.id.clone(),
        folder,
        dry_run: request.dry_run,
        aborted: false,
        renamed: stats.renamed,
        skipped: stats.skipped,
        errors: stats.errors,
        audit_log,
        plan: Some(plan),
    };

    Ok((result, preview_content))
}

fn record_history(
    state_dir: &Path,
    plan: &RenamePlan,
    dry_run: bool,
    stats: &crate::execute::ExecutionStats,
    audit_log: Option<&Path>,
) -> Result<()> {
    let renames: Vec<(PathBuf, PathBuf)> = plan
        .items
        .iter()
        .filter(|item| item.status == ItemStatus::Renamed)
        .map(|item| (item.old_path.clone(), item.new_path.clone()))
        .collect();

    let mut history = History::load(state_dir)?;
    history
        .add_entry(HistoryEntry {
            id: plan.id.clone(),
            created_at: plan.created_at.clone(),
            folder: plan.folder.clone(),
            dry_run,
            renamed: stats.renamed,
            skipped: stats.skipped,
            errors: stats.errors,
            renames,
            audit_log: audit_log.map(Path::to_path_buf),
            revert_of: None,
        })
        .context("Failed to record history entry")
}

fn get_user_confirmation() -> Result<bool> {
    print!("Proceed with rename? [y/N]: ");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}
