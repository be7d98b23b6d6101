use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use renamebatch_core::{
    apply_operation, history_operation, preview_operation, undo_operation, ApplyRequest, Config,
    FilterMode, FilterRule, MatchMode, OutputFormat, OutputFormatter, Preview, RenameStep, StepOp,
};
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

/// Filter, preview and safely batch-rename the files in a folder
#[derive(Parser, Debug)]
#[command(name = "renamebatch")]
#[command(author, version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Output format for results
    #[arg(long, global = true, value_enum, default_value_t = OutputFormatArg::Summary)]
    output: OutputFormatArg,

    /// Run as if started in <path> instead of the current working directory
    #[arg(short = 'C', global = true, value_name = "PATH")]
    directory: Option<PathBuf>,

    /// Assume yes for all prompts
    #[arg(short = 'y', long = "yes", global = true, env = "RENAMEBATCH_YES")]
    yes: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Preview the rename plan without touching any file
    Preview {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Build the plan, confirm, and rename the eligible files
    Apply {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Show what would happen without renaming anything
        #[arg(long)]
        dry_run: bool,

        /// Where to write the CSV audit log (defaults under .renamebatch/logs)
        #[arg(long, value_name = "PATH", conflicts_with = "no_log")]
        log: Option<PathBuf>,

        /// Skip the CSV audit log
        #[arg(long)]
        no_log: bool,
    },

    /// Revert a previously applied batch using its history entry
    Undo {
        /// History ID to undo (use 'latest' for the most recent batch)
        id: String,
    },

    /// Show the batches applied from this working directory
    History {
        /// Limit number of entries
        #[arg(long)]
        limit: Option<usize>,
    },
}

/// Folder, filter and step arguments shared by preview and apply.
#[derive(Args, Debug)]
struct SelectionArgs {
    /// Folder whose direct children are considered
    folder: PathBuf,

    /// Filter rule `MODE=VALUE` (contains, starts-with, ends-with,
    /// extension); a bare value is a contains rule. Repeatable.
    #[arg(short = 'f', long = "filter", value_name = "SPEC")]
    filters: Vec<FilterSpec>,

    /// Require every filter to match, or any of them
    #[arg(long = "match", value_enum, value_name = "MODE")]
    match_mode: Option<MatchModeArg>,

    /// Case-sensitive filter matching
    #[arg(long)]
    case_sensitive: bool,

    /// Rename step `OP=TEXT`, applied in order: remove=A, replace=A/B,
    /// insert=A, append=A, prepend=A, change-ext=A. Repeatable.
    #[arg(short = 's', long = "step", value_name = "SPEC")]
    steps: Vec<StepSpec>,

    /// Preview output format (defaults from config if not specified)
    #[arg(long, value_enum)]
    preview_format: Option<PreviewFormatArg>,
}

#[derive(Debug, Clone)]
struct FilterSpec {
    mode: FilterMode,
    value: String,
}

impl FromStr for FilterSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.split_once('=') {
            Some((mode, value)) => Self {
                mode: FilterMode::parse_lenient(mode),
                value: value.to_string(),
            },
            None => Self {
                mode: FilterMode::Contains,
                value: s.to_string(),
            },
        })
    }
}

#[derive(Debug, Clone)]
struct StepSpec {
    op: StepOp,
    a: String,
    b: String,
}

impl FromStr for StepSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (op, rest) = s
            .split_once('=')
            .ok_or_else(|| format!("expected OP=TEXT, got '{s}'"))?;
        let op: StepOp = op.parse()?;
        // Base names can never contain '/', so it is a safe separator for
        // the two replace operands.
        let (a, b) = if op == StepOp::ReplaceText {
            match rest.split_once('/') {
                Some((a, b)) => (a.to_string(), b.to_string()),
                None => (rest.to_string(), String::new()),
            }
        } else {
            (rest.to_string(), String::new())
        };
        Ok(Self { op, a, b })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum MatchModeArg {
    All,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum PreviewFormatArg {
    Table,
    Summary,
    None,
}

impl From<PreviewFormatArg> for Preview {
    fn from(arg: PreviewFormatArg) -> Self {
        match arg {
            PreviewFormatArg::Table => Self::Table,
            PreviewFormatArg::Summary => Self::Summary,
            PreviewFormatArg::None => Self::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum OutputFormatArg {
    Summary,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Summary => Self::Summary,
            OutputFormatArg::Json => Self::Json,
        }
    }
}

/// Selection arguments resolved against the config defaults, in the shape
/// the core operations take.
struct EngineInputs {
    rules: Vec<FilterRule>,
    match_mode: MatchMode,
    case_sensitive: bool,
    steps: Vec<RenameStep>,
    preview: Preview,
}

fn resolve_inputs(selection: &SelectionArgs, config: &Config) -> EngineInputs {
    let rules = selection
        .filters
        .iter()
        .enumerate()
        .map(|(i, spec)| FilterRule::new(i as u32 + 1, spec.mode, spec.value.clone()))
        .collect();
    let steps = selection
        .steps
        .iter()
        .enumerate()
        .map(|(i, spec)| RenameStep::new(i as u32 + 1, spec.op, spec.a.clone(), spec.b.clone()))
        .collect();
    let match_mode = match selection.match_mode {
        Some(MatchModeArg::All) => MatchMode::All,
        Some(MatchModeArg::Any) => MatchMode::Any,
        None => {
            if config.defaults.match_any {
                MatchMode::Any
            } else {
                MatchMode::All
            }
        },
    };
    let preview = selection.preview_format.map_or_else(
        || {
            config
                .defaults
                .preview_format
                .parse()
                .unwrap_or(Preview::Table)
        },
        Into::into,
    );

    EngineInputs {
        rules,
        match_mode,
        case_sensitive: selection.case_sensitive || config.defaults.case_sensitive,
        steps,
        preview,
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(dir) = &cli.directory {
        std::env::set_current_dir(dir)
            .with_context(|| format!("Failed to change directory to {}", dir.display()))?;
    }

    let config = Config::load().unwrap_or_default();
    let use_color = if cli.no_color {
        Some(false)
    } else {
        config.defaults.use_color
    };
    let output: OutputFormat = cli.output.into();

    match cli.command {
        Commands::Preview { selection } => {
            let inputs = resolve_inputs(&selection, &config);
            let (result, preview) = preview_operation(
                &selection.folder,
                &inputs.rules,
                inputs.match_mode,
                inputs.case_sensitive,
                &inputs.steps,
                inputs.preview,
                use_color,
                None,
            )?;
            if output == OutputFormat::Summary {
                if let Some(preview) = preview {
                    if !preview.is_empty() {
                        println!("{}", preview);
                    }
                }
            }
            println!("{}", result.format(output));
        },
        Commands::Apply {
            selection,
            dry_run,
            log,
            no_log,
        } => {
            let inputs = resolve_inputs(&selection, &config);
            let no_audit_log = no_log || (log.is_none() && !config.defaults.audit_log);
            let request = ApplyRequest {
                dry_run,
                audit_log: log,
                no_audit_log,
                auto_approve: cli.yes,
                preview_format: inputs.preview,
                use_color,
            };
            let (result, preview) = apply_operation(
                &selection.folder,
                &inputs.rules,
                inputs.match_mode,
                inputs.case_sensitive,
                &inputs.steps,
                &request,
                None,
            )?;
            if output == OutputFormat::Summary {
                if let Some(preview) = preview {
                    if !preview.is_empty() {
                        println!("{}", preview);
                    }
                }
            }
            println!("{}", result.format(output));
        },
        Commands::Undo { id } => {
            let (result, detail) = undo_operation(&id, None)?;
            if let Some(detail) = detail {
                eprintln!("{}", detail);
            }
            println!("{}", result.format(output));
        },
        Commands::History { limit } => {
            let result = history_operation(limit, None)?;
            println!("{}", result.format(output));
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_specs_parse_mode_and_value() {
        let spec: FilterSpec = "extension=mkv".parse().unwrap();
        assert_eq!(spec.mode, FilterMode::Extension);
        assert_eq!(spec.value, "mkv");

        let bare: FilterSpec = "whale".parse().unwrap();
        assert_eq!(bare.mode, FilterMode::Contains);
        assert_eq!(bare.value, "whale");

        // Unknown modes degrade to a contains rule on the value.
        let unknown: FilterSpec = "regex=x+".parse().unwrap();
        assert_eq!(unknown.mode, FilterMode::Contains);
        assert_eq!(unknown.value, "x+");
    }

    #[test]
    fn step_specs_parse_operands() {
        let spec: StepSpec = "replace=the/The".parse().unwrap();
        assert_eq!(spec.op, StepOp::ReplaceText);
        assert_eq!(spec.a, "the");
        assert_eq!(spec.b, "The");

        let remove: StepSpec = "remove=vivek".parse().unwrap();
        assert_eq!(remove.op, StepOp::RemoveText);
        assert_eq!(remove.a, "vivek");
        assert_eq!(remove.b, "");

        let strip: StepSpec = "change-ext=".parse().unwrap();
        assert_eq!(strip.op, StepOp::ChangeExtension);
        assert_eq!(strip.a, "");

        assert!("vivek".parse::<StepSpec>().is_err());
        assert!("regex=x".parse::<StepSpec>().is_err());
    }

    #[test]
    fn cli_parses_a_full_apply_invocation() {
        let cli = Cli::try_parse_from([
            "renamebatch",
            "apply",
            "/some/folder",
            "--filter",
            "extension=mkv",
            "--step",
            "replace=the/The",
            "--step",
            "change-ext=mp4",
            "--dry-run",
            "--yes",
        ])
        .unwrap();
        match cli.command {
            Commands::Apply {
                selection, dry_run, ..
            } => {
                assert!(dry_run);
                assert_eq!(selection.filters.len(), 1);
                assert_eq!(selection.steps.len(), 2);
            },
            _ => panic!("expected apply"),
        }
        assert!(cli.yes);
    }

    #[test]
    fn resolve_inputs_numbers_rules_and_steps_in_order() {
        let cli = Cli::try_parse_from([
            "renamebatch",
            "preview",
            "/f",
            "-f",
            "a",
            "-f",
            "ext=txt",
            "-s",
            "remove=x",
            "-s",
            "append=_y",
        ])
        .unwrap();
        let Commands::Preview { selection } = cli.command else {
            panic!("expected preview");
        };
        let inputs = resolve_inputs(&selection, &Config::default());
        assert_eq!(inputs.rules.len(), 2);
        assert_eq!(inputs.rules[0].id.0, 1);
        assert_eq!(inputs.rules[1].id.0, 2);
        assert_eq!(inputs.steps[0].id.0, 1);
        assert_eq!(inputs.steps[1].id.0, 2);
        assert_eq!(inputs.match_mode, MatchMode::All);
        assert_eq!(inputs.preview, Preview::Table);
    }
}
