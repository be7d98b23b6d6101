use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One regular file directly inside the selected folder. Immutable for the
/// duration of a planning cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Base name, without the directory component.
    pub name: String,
}

impl FileEntry {
    /// Build an entry from a path. Returns `None` for paths without a
    /// UTF-8 base name; the engine operates on `String` names.
    pub fn new(path: PathBuf) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_string();
        Some(Self { path, name })
    }

    /// Directory component of the entry.
    pub fn parent(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// List the direct children of `folder` that are regular files, sorted by
/// full path. Directories and symlinks are excluded; names that are not
/// valid UTF-8 are skipped.
pub fn list_files(folder: &Path) -> Result<Vec<FileEntry>> {
    let entries = fs::read_dir(folder)
        .with_context(|| format!("Failed to read folder {}", folder.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("Failed to read folder {}", folder.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("Failed to stat {}", entry.path().display()))?;
        if !file_type.is_file() {
            continue;
        }
        if let Some(file) = FileEntry::new(entry.path()) {
            files.push(file);
        }
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lists_only_direct_regular_files_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("nested.txt"), "n").unwrap();

        let files = list_files(dir.path()).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a.txt", "b.txt"]);
        assert!(files.iter().all(|f| f.path.is_absolute()));
    }

    #[test]
    fn missing_folder_is_an_error() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("nope");
        let err = list_files(&gone).unwrap_err();
        assert!(err.to_string().contains("Failed to read folder"));
    }

    #[test]
    fn entry_parent_and_name() {
        let entry = FileEntry::new(PathBuf::from("/data/movies/The Whale.mkv")).unwrap();
        assert_eq!(entry.name, "The Whale.mkv");
        assert_eq!(entry.parent(), Path::new("/data/movies"));
    }
}
