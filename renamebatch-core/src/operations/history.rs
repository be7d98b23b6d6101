use crate::history::History;
use crate::output::{HistoryItem, HistoryResult};
use anyhow::Result;
use std::path::Path;

/// History operation - lists recorded batches, newest first.
pub fn history_operation(
    limit: Option<usize>,
    working_dir: Option<&Path>,
) -> Result<HistoryResult> {
    let state_dir = super::state_dir(working_dir);
    let history = History::load(&state_dir)?;

    let entries = history
        .list_entries(limit)
        .into_iter()
        .map(|entry| {
            let operation = if entry.revert_of.is_some() {
                "undo"
            } else if entry.dry_run {
                "dry-run"
            } else {
                "apply"
            };
            HistoryItem {
                id: entry.id.clone(),
                operation: operation.to_string(),
                timestamp: entry.created_at.clone(),
                folder: entry.folder.clone(),
                renamed: entry.renamed,
                skipped: entry.skipped,
                errors: entry.errors,
                reverted: history.is_reverted(&entry.id),
            }
        })
        .collect();

    Ok(HistoryResult { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::MatchMode;
    use crate::operations::apply::{apply_operation, ApplyRequest};
    use crate::operations::undo::undo_operation;
    use crate::pipeline::{RenameStep, StepOp};
    use crate::preview::Preview;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn history_lists_applies_and_undos_newest_first() {
        let work = TempDir::new().unwrap();
        let folder = work.path().join("files");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("a.txt"), "x").unwrap();

        let steps = [RenameStep::new(1, StepOp::Prepend, "new_", "")];
        let request = ApplyRequest {
            auto_approve: true,
            preview_format: Preview::None,
            use_color: Some(false),
            ..ApplyRequest::default()
        };
        apply_operation(
            &folder,
            &[],
            MatchMode::All,
            false,
            &steps,
            &request,
            Some(work.path()),
        )
        .unwrap();
        undo_operation("latest", Some(work.path())).unwrap();

        let result = history_operation(None, Some(work.path())).unwrap();
        assert_eq!(result.entries.len(), 2);
        assert_eq!(result.entries[0].operation, "undo");
        assert_eq!(result.entries[1].operation, "apply");
        assert!(result.entries[1].reverted);

        let limited = history_operation(Some(1), Some(work.path())).unwrap();
        assert_eq!(limited.entries.len(), 1);
    }

    #[test]
    fn empty_history_is_not_an_error() {
        let work = TempDir::new().unwrap();
        let result = history_operation(None, Some(work.path())).unwrap();
        assert!(result.entries.is_empty());
    }
}
