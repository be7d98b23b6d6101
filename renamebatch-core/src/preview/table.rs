use crate::plan::{ItemStatus, RenamePlan};
use comfy_table::{Cell, Color, ContentArrangement, Table};
use std::io::{self, IsTerminal};

/// Render the plan as a per-file table: original name, proposed name,
/// status and the reason when there is one.
pub fn render_table(plan: &RenamePlan, use_color: bool) -> String {
    let mut table = Table::new();

    if io::stdout().is_terminal() {
        table.set_content_arrangement(ContentArrangement::Dynamic);
    } else {
        table.set_content_arrangement(ContentArrangement::Disabled);
    }

    // Force styling even in non-TTY environments when colors are explicitly requested
    if use_color {
        table.enforce_styling();
    }

    if use_color {
        table.set_header(vec![
            Cell::new("Original").fg(Color::Cyan),
            Cell::new("Proposed").fg(Color::Cyan),
            Cell::new("Status").fg(Color::Cyan),
            Cell::new("Note").fg(Color::Cyan),
        ]);
    } else {
        table.set_header(vec!["Original", "Proposed", "Status", "Note"]);
    }

    for item in &plan.items {
        let status = item.status.as_str();
        let status_cell = if use_color {
            Cell::new(status).fg(status_color(item.status))
        } else {
            Cell::new(status)
        };
        table.add_row(vec![
            Cell::new(&item.old_name),
            Cell::new(&item.new_name),
            status_cell,
            Cell::new(item.reason_text()),
        ]);
    }

    table.to_string()
}

fn status_color(status: ItemStatus) -> Color {
    match status {
        ItemStatus::Ok | ItemStatus::Renamed => Color::Green,
        ItemStatus::Skip => Color::Yellow,
        ItemStatus::Error => Color::Red,
        ItemStatus::DryRun => Color::Cyan,
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
    fn table_lists_every_item_with_status() {
        let files = [
            FileEntry::new(PathBuf::from("/f/a.txt")).unwrap(),
            FileEntry::new(PathBuf::from("/f/readme")).unwrap(),
        ];
        let steps = [RenameStep::new(1, StepOp::Prepend, "new_", "")];
        let plan = build_plan_with(Path::new("/f"), &files, &steps, |_| false);

        let rendered = render_table(&plan, false);
        assert!(rendered.contains("a.txt"));
        assert!(rendered.contains("new_a.txt"));
        assert!(rendered.contains("ok"));
        assert!(rendered.contains("Original"));
        assert!(rendered.contains("Proposed"));
    }

    #[test]
    fn skipped_items_carry_their_reason() {
        let files = [FileEntry::new(PathBuf::from("/f/same.txt")).unwrap()];
        let plan = build_plan_with(Path::new("/f"), &files, &[], |_| false);

        let rendered = render_table(&plan, false);
        assert!(rendered.contains("skip"));
        assert!(rendered.contains("unchanged"));
    }
}
