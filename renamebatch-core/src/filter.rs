use crate::listing::FileEntry;
use crate::pipeline::split_extension;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::str::FromStr;

/// Stable identity for a filter rule. Display correlation only; matching
/// semantics never look at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleId(pub u32);

/// What part of the base name a rule tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterMode {
    Contains,
    StartsWith,
    EndsWith,
    Extension,
}

impl FilterMode {
    /// Parse a mode word. Unknown words fall back to `Contains` so a rule
    /// written for a newer engine still narrows instead of erroring out.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "starts-with" | "starts_with" | "startswith" | "prefix" => Self::StartsWith,
            "ends-with" | "ends_with" | "endswith" | "suffix" => Self::EndsWith,
            "extension" | "ext" => Self::Extension,
            _ => Self::Contains,
        }
    }
}

impl FromStr for FilterMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

/// One user-configured filter rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    pub id: RuleId,
    pub mode: FilterMode,
    pub value: String,
}

impl FilterRule {
    pub fn new(id: u32, mode: FilterMode, value: impl Into<String>) -> Self {
        Self {
            id: RuleId(id),
            mode,
            value: value.into(),
        }
    }
}

/// How multiple rules combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Logical AND: every rule must match.
    All,
    /// Logical OR: at least one rule must match.
    Any,
}

/// Evaluate `base_name` against the rule set. An empty rule set matches
/// everything, under either combination mode.
pub fn matches(
    base_name: &str,
    rules: &[FilterRule],
    match_mode: MatchMode,
    case_sensitive: bool,
) -> bool {
    if rules.is_empty() {
        return true;
    }
    match match_mode {
        MatchMode::All => rules.iter().all(|r| rule_matches(base_name, r, case_sensitive)),
        MatchMode::Any => rules.iter().any(|r| rule_matches(base_name, r, case_sensitive)),
    }
}

fn rule_matches(base_name: &str, rule: &FilterRule, case_sensitive: bool) -> bool {
    let value = rule.value.trim();
    // A half-configured rule (no value yet) passes everything through.
    if value.is_empty() {
        return true;
    }

    if rule.mode == FilterMode::Extension {
        let (_, ext) = split_extension(base_name);
        let want = if value.starts_with('.') {
            value.to_string()
        } else {
            format!(".{value}")
        };
        return if case_sensitive {
            ext == want
        } else {
            ext.to_lowercase() == want.to_lowercase()
        };
    }

    let (name, value) = if case_sensitive {
        (base_name.to_string(), value.to_string())
    } else {
        (base_name.to_lowercase(), value.to_lowercase())
    };
    match rule.mode {
        FilterMode::Contains => name.contains(&value),
        FilterMode::StartsWith => name.starts_with(&value),
        FilterMode::EndsWith => name.ends_with(&value),
        FilterMode::Extension => unreachable!("handled above"),
    }
}

/// Apply `matches` to every entry's base name and return the survivors,
/// sorted lexicographically by full path for a stable, pageable order.
pub fn filter_files(
    files: &[FileEntry],
    rules: &[FilterRule],
    match_mode: MatchMode,
    case_sensitive: bool,
) -> Vec<FileEntry> {
    let mut kept: Vec<FileEntry> = files
        .iter()
        .filter(|f| matches(&f.name, rules, match_mode, case_sensitive))
        .cloned()
        .collect();
    kept.sort_by(|a, b| a.path.cmp(&b.path));
    kept
}
