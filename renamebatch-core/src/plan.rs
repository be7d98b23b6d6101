use crate::listing::FileEntry;
use crate::pipeline::{apply_steps, RenameStep};
use crate::validate::{invalid_name_reason, InvalidName};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Eligibility / outcome of one plan item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemStatus {
    /// Eligible for execution. In-memory only; never written to an audit log.
    Ok,
    Skip,
    Renamed,
    Error,
    DryRun,
}

impl ItemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Skip => "skip",
            Self::Renamed => "renamed",
            Self::Error => "error",
            Self::DryRun => "dry-run",
        }
    }
}

/// Why an item is not (or no longer) eligible for a rename, as structured
/// data. The human-readable string is produced only at the presentation and
/// audit boundaries, via `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "kebab-case")]
pub enum Reason {
    /// The pipeline left the name as it was.
    Unchanged,
    /// The proposed name cannot be used on disk.
    Invalid(InvalidName),
    /// Another file in the batch maps to the same proposed name.
    DuplicateTarget,
    /// A file already occupies the proposed target path.
    TargetExists,
    /// The rename call itself failed during execution.
    RenameFailed(String),
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unchanged => f.write_str("unchanged"),
            Self::Invalid(problem) => write!(f, "invalid: {problem}"),
            Self::DuplicateTarget => f.write_str("conflict: duplicate preview name"),
            Self::TargetExists => f.write_str("conflict: target exists on disk"),
            Self::RenameFailed(message) => f.write_str(message),
        }
    }
}

/// One file's proposed rename outcome plus its eligibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItem {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    pub old_name: String,
    pub new_name: String,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<Reason>,
}

impl PlanItem {
    /// Human-readable reason, empty when the item has none.
    pub fn reason_text(&self) -> String {
        self.reason
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    fn skip(&mut self, reason: Reason) {
        self.status = ItemStatus::Skip;
        self.reason = Some(reason);
    }
}

/// Aggregate view of a plan, shown to the user before confirmation.
///
/// The conflict lists hold every affected file; rendering caps them for
/// display (see `preview::format_confirm_message`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub total: usize,
    pub ok: usize,
    pub unchanged: usize,
    pub invalid: Vec<String>,
    pub duplicates: Vec<String>,
    pub target_exists: Vec<String>,
}

impl PlanSummary {
    /// Number of files skipped for a conflict or validity problem.
    pub fn conflicts(&self) -> usize {
        self.invalid.len() + self.duplicates.len() + self.target_exists.len()
    }
}

/// A full planning cycle over one folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamePlan {
    pub id: String,
    pub created_at: String,
    pub folder: PathBuf,
    pub items: Vec<PlanItem>,
    pub summary: PlanSummary,
}

/// Build the execution plan for `files` (already filtered and sorted),
/// probing the real filesystem for target collisions.
pub fn build_plan(folder: &Path, files: &[FileEntry], steps: &[RenameStep]) -> RenamePlan {
    build_plan_with(folder, files, steps, Path::exists)
}

/// `build_plan` with an injectable existence probe.
///
/// The probe result is a point-in-time snapshot: a file created or removed
/// between planning and execution is not seen. This is an accepted
/// limitation, matched by the per-item failure handling during execution.
pub fn build_plan_with<F>(
    folder: &Path,
    files: &[FileEntry],
    steps: &[RenameStep],
    exists: F,
) -> RenamePlan
where
    F: Fn(&Path) -> bool,
{
    // Tally proposed names across the whole batch first. Unchanged names
    // count too, so a changed file colliding with an unchanged neighbor is
    // still flagged.
    let mut proposed: Vec<String> = Vec::with_capacity(files.len());
    let mut name_counts: HashMap<&str, usize> = HashMap::with_capacity(files.len());
    for file in files {
        proposed.push(apply_steps(&file.name, steps));
    }
    for name in &proposed {
        *name_counts.entry(name.as_str()).or_insert(0) += 1;
    }

    let mut summary = PlanSummary {
        total: files.len(),
        ..PlanSummary::default()
    };
    let mut items = Vec::with_capacity(files.len());

    for (file, new_name) in files.iter().zip(&proposed) {
        let mut item = PlanItem {
            old_path: file.path.clone(),
            new_path: file.parent().join(new_name),
            old_name: file.name.clone(),
            new_name: new_name.clone(),
            status: ItemStatus::Ok,
            reason: None,
        };

        // Classification order is fixed: unchanged wins over everything,
        // invalid names are reported before either conflict check.
        if *new_name == file.name {
            summary.unchanged += 1;
            item.skip(Reason::Unchanged);
        } else if let Some(problem) = invalid_name_reason(new_name) {
            summary
                .invalid
                .push(format!("{} -> {} ({})", file.name, new_name, problem));
            item.skip(Reason::Invalid(problem));
        } else if name_counts[new_name.as_str()] > 1 {
            summary
                .duplicates
                .push(format!("{} -> {}", file.name, new_name));
            item.skip(Reason::DuplicateTarget);
        } else if exists(&item.new_path) {
            summary
                .target_exists
                .push(format!("{} -> {}", file.name, new_name));
            item.skip(Reason::TargetExists);
        } else {
            summary.ok += 1;
        }
        items.push(item);
    }

    RenamePlan {
        id: generate_plan_id(folder, steps),
        created_at: chrono::Local::now().to_rfc3339(),
        folder: folder.to_path_buf(),
        items,
        summary,
    }
}

/// Derive a short unique id from arbitrary seed material plus the clock.
pub fn generate_id(material: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(material.as_bytes());
    hasher.update(
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
            .to_string()
            .as_bytes(),
    );
    format!("{:x}", hasher.finalize())[..16].to_string()
}

fn generate_plan_id(folder: &Path, steps: &[RenameStep]) -> String {
    generate_id(&format!("{}{:?}", folder.display(), steps))
}
