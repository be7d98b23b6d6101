use anyhow::{anyhow, Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

const LOCK_FILE_NAME: &str = "renamebatch.lock";
const STALE_LOCK_TIMEOUT_SECS: u64 = 300;

/// Advisory lock serializing apply/undo runs of this tool against each
/// other. Format on disk is `pid:timestamp`; a lock older than the stale
/// timeout is reclaimed.
#[derive(Debug)]
pub struct LockFile {
    path: PathBuf,
    pid: u32,
    timestamp: u64,
}

impl LockFile {
    /// Acquire the lock under the state directory.
    pub fn acquire(state_dir: &Path) -> Result<Self> {
        let lock_path = state_dir.join(LOCK_FILE_NAME);

        if lock_path.exists() {
            let mut content = String::new();
            File::open(&lock_path)
                .context("Failed to read lock file")?
                .read_to_string(&mut content)
                .context("Failed to read lock file content")?;

            let parts: Vec<&str> = content.trim().split(':').collect();
            if parts.len() == 2 {
                let pid = parts[0].parse::<u32>().unwrap_or(0);
                let timestamp = parts[1].parse::<u64>().unwrap_or(0);

                let current_time = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_secs();

                if current_time.saturating_sub(timestamp) > STALE_LOCK_TIMEOUT_SECS {
                    fs::remove_file(&lock_path).context("Failed to remove stale lock file")?;
                } else {
                    return Err(anyhow!(
                        "Another renamebatch process is already running (PID: {}). \
                        If this is incorrect, remove the lock file at: {}",
                        pid,
                        lock_path.display()
                    ));
                }
            } else {
                // Unreadable lock content; treat it as stale.
                fs::remove_file(&lock_path).context("Failed to remove malformed lock file")?;
            }
        }

        let pid = process::id();
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let lock_content = format!("{}:{}", pid, timestamp);

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).context("Failed to create state directory")?;
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true) // Fail if file exists (race condition protection)
            .open(&lock_path)
            .context("Failed to create lock file")?;

        file.write_all(lock_content.as_bytes())
            .context("Failed to write lock file")?;

        Ok(Self {
            path: lock_path,
            pid,
            timestamp,
        })
    }

    /// Release the lock, verifying it is still ours before removing.
    pub fn release(self) -> Result<()> {
        if self.path.exists() {
            let mut content = String::new();
            File::open(&self.path)
                .context("Failed to read lock file")?
                .read_to_string(&mut content)
                .context("Failed to read lock file content")?;

            let expected_content = format!("{}:{}", self.pid, self.timestamp);
            if content.trim() == expected_content {
                fs::remove_file(&self.path).context("Failed to remove lock file")?;
            }
        }
        Ok(())
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        // Best effort cleanup on drop
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}
