use crate::plan::RenamePlan;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Write;
use std::path::PathBuf;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Json,
}

/// Result of a preview operation
#[derive(Debug, Serialize, Deserialize)]
pub struct PreviewResult {
    pub plan_id: String,
    pub folder: PathBuf,
    pub total_files: usize,
    pub matched: usize,
    pub would_rename: usize,
    pub unchanged: usize,
    pub conflicts: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<RenamePlan>,
}

/// Result of an apply operation
#[derive(Debug, Serialize, Deserialize)]
pub struct ApplyResult {
    pub plan_id: String,
    pub folder: PathBuf,
    pub dry_run: bool,
    pub aborted: bool,
    pub renamed: usize,
    pub skipped: usize,
    pub errors: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_log: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<RenamePlan>,
}

/// Result of an undo operation
#[derive(Debug, Serialize, Deserialize)]
pub struct UndoResult {
    pub history_id: String,
    pub reverted: usize,
    pub errors: usize,
}

/// Result of a history operation
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResult {
    pub entries: Vec<HistoryItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: String,
    pub operation: String,
    pub timestamp: String,
    pub folder: PathBuf,
    pub renamed: usize,
    pub skipped: usize,
    pub errors: usize,
    pub reverted: bool,
}

/// Trait for formatting output in different formats
pub trait OutputFormatter {
    fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => self.format_json(),
            OutputFormat::Summary => self.format_summary(),
        }
    }
    fn format_json(&self) -> String;
    fn format_summary(&self) -> String;
}

impl OutputFormatter for PreviewResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": "preview",
            "plan_id": self.plan_id,
            "folder": self.folder,
            "summary": {
                "total_files": self.total_files,
                "matched": self.matched,
                "would_rename": self.would_rename,
                "unchanged": self.unchanged,
                "conflicts": self.conflicts,
            },
            "plan": self.plan,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();
        writeln!(output, "Folder: {}", self.folder.display()).unwrap();
        writeln!(
            output,
            "Matched {} of {} file(s)",
            self.matched, self.total_files
        )
        .unwrap();
        writeln!(output, "Would rename: {}", self.would_rename).unwrap();
        writeln!(output, "Unchanged: {}", self.unchanged).unwrap();
        write!(output, "Conflicts: {}", self.conflicts).unwrap();
        output
    }
}

impl OutputFormatter for ApplyResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": if self.dry_run { "dry-run" } else { "apply" },
            "plan_id": self.plan_id,
            "folder": self.folder,
            "aborted": self.aborted,
            "summary": {
                "renamed": self.renamed,
                "skipped": self.skipped,
                "errors": self.errors,
            },
            "audit_log": self.audit_log,
            "plan": self.plan,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        if self.aborted {
            return "Aborted.".to_string();
        }

        let mut output = String::new();
        if self.dry_run {
            writeln!(output, "Dry run complete.").unwrap();
            writeln!(output, "Would rename: {}", self.renamed).unwrap();
        } else {
            writeln!(output, "Apply complete.").unwrap();
            writeln!(output, "Renamed: {}", self.renamed).unwrap();
        }
        writeln!(output, "Skipped: {}", self.skipped).unwrap();
        writeln!(output, "Errors: {}", self.errors).unwrap();
        match &self.audit_log {
            Some(path) => writeln!(output, "Audit log: {}", path.display()).unwrap(),
            None => writeln!(output, "Audit log: (not saved)").unwrap(),
        }
        if self.dry_run {
            write!(output, "Nothing was renamed.").unwrap();
        } else {
            write!(output, "Undo with: renamebatch undo {}", self.plan_id).unwrap();
        }
        output
    }
}

impl OutputFormatter for UndoResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": "undo",
            "history_id": self.history_id,
            "summary": {
                "reverted": self.reverted,
                "errors": self.errors,
            },
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        format!(
            "Undo complete.\nReverted: {}\nErrors: {}",
            self.reverted, self.errors
        )
    }
}

impl OutputFormatter for HistoryResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": "history",
            "entries": self.entries,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        if self.entries.is_empty() {
            return "No batches recorded yet.".to_string();
        }

        let mut output = String::new();
        for entry in &self.entries {
            let marker = if entry.reverted { " (undone)" } else { "" };
            writeln!(
                output,
                "{}  {}  {}{}",
                entry.id, entry.timestamp, entry.operation, marker
            )
            .unwrap();
            writeln!(
                output,
                "    {}  renamed={} skipped={} errors={}",
                entry.folder.display(),
                entry.renamed,
                entry.skipped,
                entry.errors
            )
            .unwrap();
        }
        output.truncate(output.trim_end().len());
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_result() -> ApplyResult {
        ApplyResult {
            plan_id: "abc123".to_string(),
            folder: PathBuf::from("/f"),
            dry_run: false,
            aborted: false,
            renamed: 2,
            skipped: 1,
            errors: 0,
            audit_log: Some(PathBuf::from("/f/.renamebatch/logs/undo_abc123.csv")),
            plan: None,
        }
    }

    #[test]
    fn apply_summary_lists_counts_and_undo_hint() {
        let text = apply_result().format_summary();
        assert!(text.contains("Apply complete."));
        assert!(text.contains("Renamed: 2"));
        assert!(text.contains("Skipped: 1"));
        assert!(text.contains("Undo with: renamebatch undo abc123"));
    }

    #[test]
    fn dry_run_summary_uses_the_would_rename_bucket() {
        let result = ApplyResult {
            dry_run: true,
            ..apply_result()
        };
        let text = result.format_summary();
        assert!(text.contains("Dry run complete."));
        assert!(text.contains("Would rename: 2"));
        assert!(text.contains("Nothing was renamed."));
    }

    #[test]
    fn aborted_apply_short_circuits() {
        let result = ApplyResult {
            aborted: true,
            ..apply_result()
        };
        assert_eq!(result.format_summary(), "Aborted.");
    }

    #[test]
    fn json_output_is_machine_readable() {
        let text = apply_result().format_json();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["operation"], "apply");
        assert_eq!(value["summary"]["renamed"], 2);
    }

    #[test]
    fn history_summary_marks_undone_entries() {
        let result = HistoryResult {
            entries: vec![HistoryItem {
                id: "abc".to_string(),
                operation: "apply".to_string(),
                timestamp: "2026-01-01T00:00:00".to_string(),
                folder: PathBuf::from("/f"),
                renamed: 1,
                skipped: 0,
                errors: 0,
                reverted: true,
            }],
        };
        assert!(result.format_summary().contains("(undone)"));
    }
}
