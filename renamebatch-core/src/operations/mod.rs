//! High-level operations that correspond to CLI commands
//!
//! These modules contain the core business logic for each renamebatch
//! operation, separated from CLI concerns like argument parsing and output
//! formatting.

pub mod apply;
pub mod history;
pub mod preview;
pub mod undo;

pub use apply::{apply_operation, ApplyRequest};
pub use history::history_operation;
pub use preview::preview_operation;
pub use undo::undo_operation;

use std::path::{Path, PathBuf};

/// Resolve the state directory (`.renamebatch/`) under `working_dir`, or
/// under the process working directory when none is given.
pub(crate) fn state_dir(working_dir: Option<&Path>) -> PathBuf {
    let base = working_dir.map_or_else(
        || std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        Path::to_path_buf,
    );
    base.join(crate::config::STATE_DIR_NAME)
}

/// Resolve `folder` against `working_dir` and canonicalize it, so plan
/// items carry absolute paths.
pub(crate) fn resolve_folder(folder: &Path, working_dir: Option<&Path>) -> PathBuf {
    let absolute = if folder.is_absolute() {
        folder.to_path_buf()
    } else {
        let base = working_dir.map_or_else(
            || std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            Path::to_path_buf,
        );
        base.join(folder)
    };
    absolute.canonicalize().unwrap_or(absolute)
}
