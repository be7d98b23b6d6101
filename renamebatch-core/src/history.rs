use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// A single applied batch, or the undo of one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique identifier for this batch.
    pub id: String,
    /// Timestamp when the batch was executed.
    pub created_at: String,
    /// Folder the batch ran against.
    pub folder: PathBuf,
    /// Whether this was a dry run (nothing touched on disk).
    pub dry_run: bool,
    pub renamed: usize,
    pub skipped: usize,
    pub errors: usize,
    /// Renames actually performed, in execution order (old -> new).
    pub renames: Vec<(PathBuf, PathBuf)>,
    /// Audit log written for this batch, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_log: Option<PathBuf>,
    /// If this entry undid a previous batch, the id of that batch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revert_of: Option<String>,
}

/// Manages the batch history at `<state_dir>/history.json`.
pub struct History {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl History {
    /// Load history from the default location under the state directory.
    pub fn load(state_dir: &Path) -> Result<Self> {
        Self::load_from_path(&state_dir.join("history.json"))
    }

    /// Load history from a specific path. A missing file is an empty history.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let entries = if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open history file: {}", path.display()))?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse history file: {}", path.display()))?
        } else {
            Vec::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Save the history to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("Failed to create history file: {}", self.path.display()))?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.entries)
            .with_context(|| format!("Failed to write history file: {}", self.path.display()))?;

        Ok(())
    }

    /// Add a new entry and persist.
    pub fn add_entry(&mut self, entry: HistoryEntry) -> Result<()> {
        if self.entries.iter().any(|e| e.id == entry.id) {
            return Err(anyhow!("History entry with ID {} already exists", entry.id));
        }

        self.entries.push(entry);
        self.save()?;
        Ok(())
    }

    /// Find an entry by id.
    pub fn find_entry(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// All entries, newest first, optionally limited.
    pub fn list_entries(&self, limit: Option<usize>) -> Vec<&HistoryEntry> {
        let entries: Vec<_> = self.entries.iter().rev().collect();
        match limit {
            Some(n) => entries.into_iter().take(n).collect(),
            None => entries,
        }
    }

    /// Whether a later entry already undid `id`.
    pub fn is_reverted(&self, id: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.revert_of.as_deref() == Some(id))
    }

    /// Resolve an undo target: `latest` means the most recent real batch
    /// that has not been undone yet; anything else must be an existing id.
    pub fn resolve_undo_id(&self, id: &str) -> Result<String> {
        if id == "latest" {
            self.entries
                .iter()
                .rev()
                .find(|e| e.revert_of.is_none() && !e.dry_run && !self.is_reverted(&e.id))
                .map(|e| e.id.clone())
                .ok_or_else(|| anyhow!("No applied batches found that can be undone"))
        } else if self.find_entry(id).is_some() {
            Ok(id.to_string())
        } else {
            Err(anyhow!("History entry '{}' not found", id))
        }
    }
}
