use crate::history::{History, HistoryEntry};
use crate::lock::LockFile;
use crate::output::UndoResult;
use crate::plan::generate_id;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;

/// Undo operation - replays a recorded batch in reverse, per item.
///
/// This is log-driven and advisory, not transactional: each reversal is
/// attempted independently, failures are reported individually, and nothing
/// is rolled back on partial failure.
pub fn undo_operation(id: &str, working_dir: Option<&Path>) -> Result<(UndoResult, Option<String>)> {
    let state_dir = super::state_dir(working_dir);
    let _lock = LockFile::acquire(&state_dir)
        .context("Failed to acquire lock for renamebatch operation")?;

    let mut history = History::load(&state_dir)?;
    let resolved = history.resolve_undo_id(id)?;
    let entry = history
        .find_entry(&resolved)
        .ok_or_else(|| anyhow!("History entry '{}' not found", resolved))?;

    if entry.revert_of.is_some() {
        return Err(anyhow!(
            "History entry '{}' is itself an undo and cannot be undone",
            resolved
        ));
    }
    if entry.dry_run {
        return Err(anyhow!(
            "History entry '{}' was a dry run; there is nothing to undo",
            resolved
        ));
    }
    if history.is_reverted(&resolved) {
        return Err(anyhow!("History entry '{}' was already undone", resolved));
    }

    let folder = entry.folder.clone();
    let planned: Vec<_> = entry.renames.iter().rev().cloned().collect();

    let mut reverted_renames = Vec::new();
    let mut errors = 0usize;
    let mut failures = Vec::new();
    for (old_path, new_path) in &planned {
        match fs::rename(new_path, old_path) {
            Ok(()) => reverted_renames.push((new_path.clone(), old_path.clone())),
            Err(e) => {
                errors += 1;
                failures.push(format!(
                    "{} -> {}: {}",
                    new_path.display(),
                    old_path.display(),
                    e
                ));
            },
        }
    }

    let reverted = reverted_renames.len();
    history
        .add_entry(HistoryEntry {
            id: generate_id(&format!("undo:{resolved}")),
            created_at: chrono::Local::now().to_rfc3339(),
            folder,
            dry_run: false,
            renamed: reverted,
            skipped: 0,
            errors,
            renames: reverted_renames,
            audit_log: None,
            revert_of: Some(resolved.clone()),
        })
        .context("Failed to record history entry")?;

    let detail = if failures.is_empty() {
        None
    } else {
        Some(format!("Failed reversals:\n - {}", failures.join("\n - ")))
    };

    Ok((
        UndoResult {
            history_id: resolved,
            reverted,
            errors,
        },
        detail,
    ))
}
