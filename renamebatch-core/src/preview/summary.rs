use crate::plan::{PlanSummary, RenamePlan};
use std::fmt::Write;

/// How many conflict lines each section of the confirmation message shows
/// before collapsing into "... and N more".
const DISPLAY_CAP: usize = 20;

/// Render the plan as a plain-text listing, one line per file.
pub fn render_summary(plan: &RenamePlan) -> String {
    let mut output = String::new();

    writeln!(output, "[PLAN SUMMARY]").unwrap();
    writeln!(output, "Folder: {}", plan.folder.display()).unwrap();
    writeln!(output, "Files: {}", plan.summary.total).unwrap();
    writeln!(output, "Will rename: {}", plan.summary.ok).unwrap();
    writeln!(output).unwrap();

    for item in &plan.items {
        let note = item.reason_text();
        if note.is_empty() {
            writeln!(
                output,
                "{} -> {} [{}]",
                item.old_name,
                item.new_name,
                item.status.as_str()
            )
            .unwrap();
        } else {
            writeln!(
                output,
                "{} -> {} [{}] {}",
                item.old_name,
                item.new_name,
                item.status.as_str(),
                note
            )
            .unwrap();
        }
    }

    output
}

/// The confirmation message shown before an apply: overall counts plus the
/// capped conflict sections.
pub fn format_confirm_message(summary: &PlanSummary) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "You are about to process {} file(s).",
        summary.total
    )
    .unwrap();
    writeln!(output, "Will rename: {}", summary.ok).unwrap();
    writeln!(output, "Unchanged (skipped): {}", summary.unchanged).unwrap();

    write_section(&mut output, "Invalid names (skipped):", &summary.invalid);
    write_section(
        &mut output,
        "Duplicate preview conflicts (skipped):",
        &summary.duplicates,
    );
    write_section(
        &mut output,
        "Target already exists on disk (skipped):",
        &summary.target_exists,
    );

    write!(output, "\nProceed?").unwrap();
    output
}

fn write_section(output: &mut String, title: &str, entries: &[String]) {
    if entries.is_empty() {
        return;
    }
    writeln!(output, "\n{}", title).unwrap();
    for entry in entries.iter().take(DISPLAY_CAP) {
        writeln!(output, " - {}", entry).unwrap();
    }
    if entries.len() > DISPLAY_CAP {
        writeln!(output, " ... and {} more", entries.len() - DISPLAY_CAP).unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::FileEntry;
    use crate::pipeline::{RenameStep, StepOp};
    use crate::plan::build_plan_with;
    use std::path::{Path, PathBuf};

    #[test]
    fn summary_lists_items_with_reasons() {
        let files = [
            FileEntry::new(PathBuf::from("/f/a.txt")).unwrap(),
            FileEntry::new(PathBuf::from("/f/readme")).unwrap(),
        ];
        let steps = [RenameStep::new(1, StepOp::Append, "_x", "")];
        let plan = build_plan_with(Path::new("/f"), &files, &steps, |_| false);

        let rendered = render_summary(&plan);
        assert!(rendered.contains("[PLAN SUMMARY]"));
        assert!(rendered.contains("a.txt -> a_x.txt [ok]"));
        assert!(rendered.contains("readme -> readme_x [ok]"));
    }

    #[test]
    fn confirm_message_counts_and_sections() {
        let summary = PlanSummary {
            total: 3,
            ok: 1,
            unchanged: 1,
            invalid: vec!["x.txt -> CON (reserved filename)".to_string()],
            duplicates: vec![],
            target_exists: vec![],
        };
        let message = format_confirm_message(&summary);
        assert!(message.contains("You are about to process 3 file(s)."));
        assert!(message.contains("Will rename: 1"));
        assert!(message.contains("Unchanged (skipped): 1"));
        assert!(message.contains("Invalid names (skipped):"));
        assert!(message.contains(" - x.txt -> CON (reserved filename)"));
        assert!(!message.contains("Duplicate preview conflicts"));
        assert!(message.ends_with("Proceed?"));
    }

    #[test]
    fn long_sections_collapse_after_the_cap() {
        let summary = PlanSummary {
            total: 30,
            ok: 0,
            unchanged: 0,
            invalid: vec![],
            duplicates: (0..25).map(|i| format!("f{i} -> same")).collect(),
            target_exists: vec![],
        };
        let message = format_confirm_message(&summary);
        assert!(message.contains(" - f0 -> same"));
        assert!(message.contains(" - f19 -> same"));
        assert!(!message.contains(" - f20 -> same"));
        assert!(message.contains(" ... and 5 more"));
    }
}
