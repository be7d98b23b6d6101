mod summary;
mod table;

pub use summary::{format_confirm_message, render_summary};
pub use table::render_table;

use crate::plan::RenamePlan;
use std::io::{self, IsTerminal};

/// Preview rendering format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preview {
    #[default]
    Table,
    Summary,
    None,
}

impl std::str::FromStr for Preview {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "summary" => Ok(Self::Summary),
            "none" => Ok(Self::None),
            _ => Err(format!("Invalid preview format: {}", s)),
        }
    }
}

/// Determine whether to use colors based on explicit preference or terminal detection
pub fn should_use_color_with_detector<F>(use_color: Option<bool>, is_terminal: F) -> bool
where
    F: Fn() -> bool,
{
    match use_color {
        Some(explicit_color) => explicit_color,
        None => is_terminal(),
    }
}

/// Determine whether to use colors based on explicit preference or terminal detection
pub fn should_use_color(use_color: Option<bool>) -> bool {
    should_use_color_with_detector(use_color, || io::stdout().is_terminal())
}

/// Render the plan in the requested format.
pub fn render_plan(plan: &RenamePlan, format: Preview, use_color: Option<bool>) -> String {
    let use_color = should_use_color(use_color);

    match format {
        Preview::Table => render_table(plan, use_color),
        Preview::Summary => render_summary(plan),
        Preview::None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_format_parsing() {
        assert_eq!("table".parse::<Preview>(), Ok(Preview::Table));
        assert_eq!("SUMMARY".parse::<Preview>(), Ok(Preview::Summary));
        assert_eq!("none".parse::<Preview>(), Ok(Preview::None));
        assert!("diff".parse::<Preview>().is_err());
    }

    #[test]
    fn explicit_color_preference_wins() {
        assert!(should_use_color_with_detector(Some(true), || false));
        assert!(!should_use_color_with_detector(Some(false), || true));
        assert!(should_use_color_with_detector(None, || true));
        assert!(!should_use_color_with_detector(None, || false));
    }
}
