use crate::filter::{filter_files, FilterRule, MatchMode};
use crate::listing::list_files;
use crate::output::PreviewResult;
use crate::pipeline::RenameStep;
use crate::plan::build_plan;
use crate::preview::{render_plan, Preview};
use anyhow::Result;
use std::path::Path;

/// Preview operation - returns structured data plus optional preview text.
///
/// Read-only: lists the folder, filters, builds the plan, renders it. The
/// only disk access beyond the listing is the per-item existence probe.
#[allow(clippy::too_many_arguments)]
pub fn preview_operation(
    folder: &Path,
    rules: &[FilterRule],
    match_mode: MatchMode,
    case_sensitive: bool,
    steps: &[RenameStep],
    preview_format: Preview,
    use_color: Option<bool>,
    working_dir: Option<&Path>,
) -> Result<(PreviewResult, Option<String>)> {
    let folder = super::resolve_folder(folder, working_dir);

    let files = list_files(&folder)?;
    let filtered = filter_files(&files, rules, match_mode, case_sensitive);
    let plan = build_plan(&folder, &filtered, steps);

    let preview_content = match preview_format {
        Preview::None => None,
        format => Some(render_plan(&plan, format, use_color)),
    };

    let result = PreviewResult {
        plan_id: plan.id.clone(),
        folder: folder.clone(),
        total_files: files.len(),
        matched: filtered.len(),
        would_rename: plan.summary.ok,
        unchanged: plan.summary.unchanged,
        conflicts: plan.summary.conflicts(),
        plan: Some(plan),
    };

    Ok((result, preview_content))
}
