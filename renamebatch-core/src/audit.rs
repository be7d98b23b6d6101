use crate::plan::{ItemStatus, PlanItem};
use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One row of the CSV audit log. Field order matches the column order:
/// `old_path,new_path,old_name,new_name,status,reason`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRow {
    pub old_path: String,
    pub new_path: String,
    pub old_name: String,
    pub new_name: String,
    pub status: String,
    pub reason: String,
}

impl From<&PlanItem> for AuditRow {
    fn from(item: &PlanItem) -> Self {
        Self {
            old_path: item.old_path.display().to_string(),
            new_path: item.new_path.display().to_string(),
            old_name: item.old_name.clone(),
            new_name: item.new_name.clone(),
            status: item.status.as_str().to_string(),
            reason: item.reason_text(),
        }
    }
}

/// Write the audit log for `items`, one row per item, in plan order.
///
/// `ok` is an in-memory status only: callers execute the plan or mark it
/// dry-run before saving, so persisted rows are always one of `skip`,
/// `renamed`, `error` or `dry-run`.
pub fn write_audit_log(path: &Path, items: &[PlanItem]) -> Result<()> {
    ensure!(
        items.iter().all(|i| i.status != ItemStatus::Ok),
        "audit log requested for a plan that has not been executed"
    );

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create audit directory {}", parent.display()))?;
    }
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create audit log {}", path.display()))?;
    // Write the header explicitly so an empty plan still produces a valid
    // log; `serialize` then skips its own header row.
    writer
        .write_record([
            "old_path", "new_path", "old_name", "new_name", "status", "reason",
        ])
        .with_context(|| format!("Failed to write audit log {}", path.display()))?;
    for item in items {
        writer
            .serialize(AuditRow::from(item))
            .with_context(|| format!("Failed to write audit log {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write audit log {}", path.display()))?;
    Ok(())
}

/// Read an audit log back. Rows come out in file order, which is plan order.
pub fn read_audit_log(path: &Path) -> Result<Vec<AuditRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to read audit log {}", path.display()))?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row.with_context(|| format!("Failed to parse audit log {}", path.display()))?);
    }
    Ok(rows)
}
