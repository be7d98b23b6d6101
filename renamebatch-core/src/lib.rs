#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod audit;
pub mod config;
pub mod execute;
pub mod filter;
pub mod history;
pub mod listing;
pub mod lock;
pub mod operations;
pub mod output;
pub mod pipeline;
pub mod plan;
pub mod preview;
pub mod validate;

pub use audit::{read_audit_log, write_audit_log, AuditRow};
pub use config::Config;
pub use execute::{execute_plan, format_result_message, result_counts, ExecuteOptions, ExecutionStats};
pub use filter::{filter_files, matches, FilterMode, FilterRule, MatchMode, RuleId};
pub use history::{History, HistoryEntry};
pub use listing::{list_files, FileEntry};
pub use lock::LockFile;
pub use operations::{
    apply_operation, history_operation, preview_operation, undo_operation, ApplyRequest,
};
pub use output::{
    ApplyResult, HistoryItem, HistoryResult, OutputFormat, OutputFormatter, PreviewResult,
    UndoResult,
};
pub use pipeline::{apply_steps, split_extension, RenameStep, StepId, StepOp};
pub use plan::{build_plan, build_plan_with, ItemStatus, PlanItem, PlanSummary, Reason, RenamePlan};
pub use preview::{format_confirm_message, render_plan, should_use_color, Preview};
pub use validate::{invalid_name_reason, InvalidName};
