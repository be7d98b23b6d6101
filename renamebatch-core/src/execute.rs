use crate::plan::{ItemStatus, PlanItem, Reason, RenamePlan};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Options for executing a rename plan.
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Mark eligible items `dry-run` instead of touching the disk.
    pub dry_run: bool,
    /// Line-oriented execution log, appended to.
    pub log_file: Option<PathBuf>,
}

/// Outcome counts over a plan's items. `renamed` includes `dry-run` marks;
/// the two form the single "would rename" bucket of the result message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStats {
    pub renamed: usize,
    pub skipped: usize,
    pub errors: usize,
}

struct ExecutionLog {
    file: Option<File>,
}

impl ExecutionLog {
    fn open(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create log directory {}", parent.display())
                    })?;
                }
                Some(
                    OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(path)
                        .with_context(|| format!("Failed to open log file {}", path.display()))?,
                )
            },
            None => None,
        };
        Ok(Self { file })
    }

    fn log(&mut self, message: &str) -> Result<()> {
        if let Some(ref mut file) = self.file {
            writeln!(
                file,
                "[{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                message
            )?;
            file.flush()?;
        }
        Ok(())
    }
}

/// Execute every `Ok` item of `plan` in plan order, folding outcomes back
/// into the items. A failed rename marks its item `error` and never stops
/// the batch; non-`Ok` items pass through untouched.
pub fn execute_plan(plan: &mut RenamePlan, options: &ExecuteOptions) -> Result<ExecutionStats> {
    let mut log = ExecutionLog::open(options.log_file.as_deref())?;
    log.log(&format!(
        "begin plan {} ({} items, dry_run={})",
        plan.id,
        plan.items.len(),
        options.dry_run
    ))?;

    let mut stats = ExecutionStats::default();
    for item in &mut plan.items {
        match item.status {
            ItemStatus::Ok => {},
            ItemStatus::Skip => {
                stats.skipped += 1;
                continue;
            },
            _ => continue,
        }

        if options.dry_run {
            item.status = ItemStatus::DryRun;
            stats.renamed += 1;
            log.log(&format!(
                "dry-run: {} -> {}",
                item.old_path.display(),
                item.new_path.display()
            ))?;
            continue;
        }

        match fs::rename(&item.old_path, &item.new_path) {
            Ok(()) => {
                item.status = ItemStatus::Renamed;
                item.reason = None;
                stats.renamed += 1;
                log.log(&format!(
                    "renamed: {} -> {}",
                    item.old_path.display(),
                    item.new_path.display()
                ))?;
            },
            Err(e) => {
                item.status = ItemStatus::Error;
                item.reason = Some(Reason::RenameFailed(e.to_string()));
                stats.errors += 1;
                log.log(&format!(
                    "error: {} -> {}: {}",
                    item.old_path.display(),
                    item.new_path.display(),
                    e
                ))?;
            },
        }
    }

    log.log(&format!(
        "end plan {}: renamed={} skipped={} errors={}",
        plan.id, stats.renamed, stats.skipped, stats.errors
    ))?;
    Ok(stats)
}

/// Count outcomes over already-executed (or dry-run-marked) items.
pub fn result_counts(items: &[PlanItem]) -> ExecutionStats {
    let mut stats = ExecutionStats::default();
    for item in items {
        match item.status {
            ItemStatus::Renamed | ItemStatus::DryRun => stats.renamed += 1,
            ItemStatus::Skip => stats.skipped += 1,
            ItemStatus::Error => stats.errors += 1,
            ItemStatus::Ok => {},
        }
    }
    stats
}

/// The user-facing result message. Counts are part of the contract; the
/// wording mirrors the confirmation dialog of the original tool.
pub fn format_result_message(items: &[PlanItem], dry_run: bool) -> String {
    let stats = result_counts(items);
    if dry_run {
        format!(
            "Dry run complete.\nWould rename: {}\nSkipped: {}\nErrors: {}",
            stats.renamed, stats.skipped, stats.errors
        )
    } else {
        format!(
            "Apply complete.\nRenamed: {}\nSkipped: {}\nErrors: {}",
            stats.renamed, stats.skipped, stats.errors
        )
    }
}
