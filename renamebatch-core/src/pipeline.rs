use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Stable identity for a rename step. Front-ends use it to correlate list
/// rows with engine input; the pipeline itself never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepId(pub u32);

/// One transformation applied to a base name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepOp {
    RemoveText,
    ReplaceText,
    InsertBeforeExtension,
    ChangeExtension,
    Append,
    Prepend,
}

impl StepOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RemoveText => "remove-text",
            Self::ReplaceText => "replace-text",
            Self::InsertBeforeExtension => "insert-before-extension",
            Self::ChangeExtension => "change-extension",
            Self::Append => "append",
            Self::Prepend => "prepend",
        }
    }
}

impl FromStr for StepOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remove" | "remove-text" => Ok(Self::RemoveText),
            "replace" | "replace-text" => Ok(Self::ReplaceText),
            "insert" | "insert-before-ext" | "insert-before-extension" => {
                Ok(Self::InsertBeforeExtension)
            },
            "ext" | "change-ext" | "change-extension" => Ok(Self::ChangeExtension),
            "append" => Ok(Self::Append),
            "prepend" => Ok(Self::Prepend),
            other => Err(format!(
                "unknown rename operation '{other}' (expected remove, replace, insert, append, prepend or change-ext)"
            )),
        }
    }
}

/// One entry of the rename pipeline. Steps are applied left-to-right; each
/// consumes the previous step's output. Operand `b` is only read by
/// `replace-text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameStep {
    pub id: StepId,
    pub op: StepOp,
    pub a: String,
    #[serde(default)]
    pub b: String,
}

impl RenameStep {
    pub fn new(id: u32, op: StepOp, a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            id: StepId(id),
            op,
            a: a.into(),
            b: b.into(),
        }
    }
}

/// Split a base name into stem and extension.
///
/// The extension is the suffix starting at the last dot, dot included; a
/// name without a dot has an empty extension. `.bashrc` splits into an
/// empty stem and `.bashrc`.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) => name.split_at(idx),
        None => (name, ""),
    }
}

/// Run `steps` left-to-right over `original` and return the proposed name,
/// trimmed of surrounding whitespace.
///
/// An empty step list is the identity: the input comes back untouched, not
/// even trimmed.
pub fn apply_steps(original: &str, steps: &[RenameStep]) -> String {
    if steps.is_empty() {
        return original.to_string();
    }
    let mut name = original.to_string();
    for step in steps {
        name = apply_step(&name, step);
    }
    name.trim().to_string()
}

fn apply_step(name: &str, step: &RenameStep) -> String {
    match step.op {
        StepOp::RemoveText => {
            if step.a.is_empty() {
                name.to_string()
            } else {
                name.replace(&step.a, "")
            }
        },
        StepOp::ReplaceText => {
            if step.a.is_empty() {
                name.to_string()
            } else {
                name.replace(&step.a, &step.b)
            }
        },
        StepOp::InsertBeforeExtension | StepOp::Append => {
            let (stem, ext) = split_extension(name);
            format!("{stem}{}{ext}", step.a)
        },
        StepOp::Prepend => {
            let (stem, ext) = split_extension(name);
            format!("{}{stem}{ext}", step.a)
        },
        StepOp::ChangeExtension => {
            let (stem, _) = split_extension(name);
            let new_ext = step.a.trim();
            if new_ext.is_empty() {
                stem.to_string()
            } else if new_ext.starts_with('.') {
                format!("{stem}{new_ext}")
            } else {
                format!("{stem}.{new_ext}")
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(op: StepOp, a: &str, b: &str) -> RenameStep {
        RenameStep::new(1, op, a, b)
    }

    #[test]
    fn split_extension_cases() {
        assert_eq!(split_extension("a.txt"), ("a", ".txt"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_extension("noext"), ("noext", ""));
        assert_eq!(split_extension(".bashrc"), ("", ".bashrc"));
        assert_eq!(split_extension("trailing."), ("trailing", "."));
        assert_eq!(split_extension(""), ("", ""));
    }

    #[test]
    fn empty_pipeline_is_identity() {
        // No trimming either; the pipeline is bypassed entirely.
        assert_eq!(apply_steps("  spaced.txt  ", &[]), "  spaced.txt  ");
    }

    #[test]
    fn remove_text() {
        assert_eq!(
            apply_steps("vivek_notes.txt", &[step(StepOp::RemoveText, "vivek", "")]),
            "_notes.txt"
        );
        // Empty operand is a no-op.
        assert_eq!(
            apply_steps("vivek_notes.txt", &[step(StepOp::RemoveText, "", "")]),
            "vivek_notes.txt"
        );
    }

    #[test]
    fn replace_text_is_literal_and_case_exact() {
        assert_eq!(
            apply_steps("the_hobbit.mkv", &[step(StepOp::ReplaceText, "the", "The")]),
            "The_hobbit.mkv"
        );
        assert_eq!(
            apply_steps("The Whale.mkv", &[step(StepOp::ReplaceText, "the", "The")]),
            "The Whale.mkv"
        );
        // Empty replacement acts as removal.
        assert_eq!(
            apply_steps("a-b-c.txt", &[step(StepOp::ReplaceText, "-", "")]),
            "abc.txt"
        );
    }

    #[test]
    fn insert_before_extension() {
        assert_eq!(
            apply_steps("movie.mp4", &[step(StepOp::InsertBeforeExtension, "(awesome)", "")]),
            "movie(awesome).mp4"
        );
        assert_eq!(
            apply_steps("noext", &[step(StepOp::InsertBeforeExtension, "_v2", "")]),
            "noext_v2"
        );
    }

    #[test]
    fn append_matches_insert_before_extension() {
        assert_eq!(
            apply_steps("movie.mp4", &[step(StepOp::Append, "_x", "")]),
            "movie_x.mp4"
        );
    }

    #[test]
    fn prepend_keeps_extension_in_place() {
        assert_eq!(
            apply_steps("name.txt", &[step(StepOp::Prepend, "NEW_", "")]),
            "NEW_name.txt"
        );
    }

    #[test]
    fn change_extension() {
        assert_eq!(
            apply_steps("a.txt", &[step(StepOp::ChangeExtension, "md", "")]),
            "a.md"
        );
        assert_eq!(
            apply_steps("a.txt", &[step(StepOp::ChangeExtension, ".md", "")]),
            "a.md"
        );
        // Empty operand strips the extension entirely.
        assert_eq!(
            apply_steps("a.txt", &[step(StepOp::ChangeExtension, "", "")]),
            "a"
        );
        assert_eq!(
            apply_steps("a.txt", &[step(StepOp::ChangeExtension, "  ", "")]),
            "a"
        );
    }

    #[test]
    fn steps_chain_left_to_right() {
        let steps = vec![
            RenameStep::new(1, StepOp::ReplaceText, "the", "The"),
            RenameStep::new(2, StepOp::ChangeExtension, "mp4", ""),
        ];
        assert_eq!(apply_steps("the_hobbit.mkv", &steps), "The_hobbit.mp4");
    }

    #[test]
    fn result_is_trimmed() {
        assert_eq!(
            apply_steps("name.txt", &[step(StepOp::ReplaceText, "name.txt", "  padded  ")]),
            "padded"
        );
    }

    #[test]
    fn step_op_parsing() {
        assert_eq!("replace".parse::<StepOp>(), Ok(StepOp::ReplaceText));
        assert_eq!("change-ext".parse::<StepOp>(), Ok(StepOp::ChangeExtension));
        assert_eq!("INSERT".parse::<StepOp>(), Ok(StepOp::InsertBeforeExtension));
        assert!("regex".parse::<StepOp>().is_err());
    }
}
