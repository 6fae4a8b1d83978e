// JSON file persistence for the task collection

use fs2::FileExt;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::models::Task;

/// Default storage location, relative to the working directory
pub const DEFAULT_STORE_FILE: &str = "tasks.json";

/// Durable storage for the whole task collection
pub trait Persistence {
    /// Read the stored collection. A missing store is an empty collection.
    fn load(&self) -> Result<Vec<Task>>;

    /// Replace the stored collection with `tasks`
    fn save(&self, tasks: &[Task]) -> Result<()>;

    /// Where the collection lives, for error reporting
    fn location(&self) -> &Path;
}

/// Task collection stored as a pretty-printed JSON array in one file
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_STORE_FILE.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_temp(&self, temp: &Path, content: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(temp)
            .map_err(|e| StoreError::io(temp, e))?;

        // Lock is released when file is dropped; truncate only once it is held
        file.lock_exclusive().map_err(|e| StoreError::io(temp, e))?;
        file.set_len(0).map_err(|e| StoreError::io(temp, e))?;

        file.write_all(content.as_bytes())
            .and_then(|_| file.write_all(b"\n"))
            .and_then(|_| file.sync_all())
            .map_err(|e| StoreError::io(temp, e))
    }
}

impl Default for JsonFile {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_FILE)
    }
}

impl Persistence for JsonFile {
    fn load(&self) -> Result<Vec<Task>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(file = ?self.path, "Task file not found, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let tasks: Vec<Task> =
            serde_json::from_str(&content).map_err(|e| StoreError::corrupt(&self.path, e.to_string()))?;

        validate_collection(&self.path, &tasks)?;

        info!(file = ?self.path, count = tasks.len(), "Loaded tasks");
        Ok(tasks)
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let content = serde_json::to_string_pretty(tasks)
            .map_err(|e| StoreError::io(&self.path, std::io::Error::new(ErrorKind::InvalidData, e)))?;

        let temp = self.temp_path();
        if let Err(e) = self.write_temp(&temp, &content) {
            let _ = fs::remove_file(&temp);
            return Err(e);
        }

        fs::rename(&temp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;

        info!(file = ?self.path, count = tasks.len(), "Saved tasks");
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

/// Reject decoded collections that break the task invariants
fn validate_collection(path: &Path, tasks: &[Task]) -> Result<()> {
    let mut seen = HashSet::with_capacity(tasks.len());

    for task in tasks {
        if task.text.trim().is_empty() {
            return Err(StoreError::corrupt(path, format!("task {} has empty text", task.id)));
        }
        if !seen.insert(task.id) {
            return Err(StoreError::corrupt(
                path,
                format!(
                    "duplicate task id {}; ids must be unique, so a file that numbered tasks by position \
                     needs its ids renumbered before it can be opened",
                    task.id
                ),
            ));
        }
    }

    debug!(file = ?path, count = tasks.len(), "Task collection validated");
    Ok(())
}
