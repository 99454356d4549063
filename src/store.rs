//! File-backed persistence for the task collection.
//!
//! The store owns `<dir>/.task/task.json` and nothing else. Every mutation is
//! a whole-file read-modify-write: load the collection, change it in memory,
//! write it back. The canonical on-disk shape is newline-delimited JSON (one
//! task per line, empty file for zero tasks); the legacy single-array shape is
//! still accepted on read and upgraded on the next save.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{ErrorCode, TaskError};
use crate::models::{Status, Task, TaskType};

pub const TASK_DIR: &str = ".task";
pub const TASK_FILE: &str = "task.json";

/// Conjunctive listing criteria; absent fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub status: Option<Status>,
    pub kind: Option<TaskType>,
    pub label: Option<String>,
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.kind.is_none() && self.label.is_none()
    }

    fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if task.kind != kind {
                return false;
            }
        }
        if let Some(ref label) = self.label {
            if !task.has_label(label) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn task_dir(&self) -> PathBuf {
        self.dir.join(TASK_DIR)
    }

    pub fn task_file(&self) -> PathBuf {
        self.task_dir().join(TASK_FILE)
    }

    /// Create the `.task/` directory and an empty backing file. If the file
    /// cannot be written the directory is removed again so a failed init
    /// leaves no initialized-looking marker behind.
    pub fn init(&self) -> Result<(), TaskError> {
        let task_dir = self.task_dir();
        if task_dir.exists() {
            return Err(TaskError::already_initialized(&task_dir));
        }

        fs::create_dir_all(&task_dir)
            .map_err(|e| TaskError::io("creating task directory", e))?;

        if let Err(err) = self.save(&[]) {
            let _ = fs::remove_dir_all(&task_dir);
            return Err(err);
        }

        Ok(())
    }

    /// Initialized means the backing file exists, not just the directory.
    pub fn is_initialized(&self) -> bool {
        self.task_file().exists()
    }

    pub fn load(&self) -> Result<Vec<Task>, TaskError> {
        let content = match fs::read_to_string(self.task_file()) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(TaskError::not_initialized())
            }
            Err(e) => return Err(TaskError::io("reading task file", e)),
        };

        let tasks = parse_tasks(&content)?;
        debug!(count = tasks.len(), "loaded task file");
        Ok(tasks)
    }

    /// Overwrite the backing file with the full collection, one task per
    /// line. Data loaded from the legacy array shape is upgraded permanently
    /// by its first save.
    pub fn save(&self, tasks: &[Task]) -> Result<(), TaskError> {
        let mut out = String::new();
        for task in tasks {
            let line = serde_json::to_string(task).map_err(|e| {
                TaskError::new(ErrorCode::ParseFailure, format!("encoding tasks: {e}"))
            })?;
            out.push_str(&line);
            out.push('\n');
        }

        fs::write(self.task_file(), out).map_err(|e| TaskError::io("writing task file", e))?;
        debug!(count = tasks.len(), "saved task file");
        Ok(())
    }

    /// Linear scan by ID. Absence is not an error.
    pub fn find_by_id(&self, id: &str) -> Result<Option<Task>, TaskError> {
        let tasks = self.load()?;
        Ok(tasks.into_iter().find(|t| t.id == id))
    }

    pub fn add(&self, task: &Task) -> Result<(), TaskError> {
        let mut tasks = self.load()?;
        tasks.push(task.clone());
        self.save(&tasks)
    }

    pub fn update(&self, task: &Task) -> Result<(), TaskError> {
        let mut tasks = self.load()?;
        let slot = tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(|| TaskError::task_not_found(&task.id))?;
        *slot = task.clone();
        self.save(&tasks)
    }

    pub fn delete(&self, id: &str) -> Result<(), TaskError> {
        let mut tasks = self.load()?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(TaskError::task_not_found(id));
        }
        self.save(&tasks)
    }

    /// All task IDs currently in the store, for collision-free generation.
    pub fn existing_ids(&self) -> Result<HashSet<String>, TaskError> {
        let tasks = self.load()?;
        Ok(tasks.into_iter().map(|t| t.id).collect())
    }

    /// Canonical listing order: most recently touched first. The sort is
    /// stable, so ties keep their on-disk order.
    pub fn list_sorted(&self) -> Result<Vec<Task>, TaskError> {
        let mut tasks = self.load()?;
        tasks.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(tasks)
    }

    pub fn list_filtered(&self, filter: &Filter) -> Result<Vec<Task>, TaskError> {
        let tasks = self.list_sorted()?;
        if filter.is_empty() {
            return Ok(tasks);
        }
        Ok(tasks.into_iter().filter(|t| filter.matches(t)).collect())
    }

    /// Remove every closed (`done` or `abandon`) task. The file is rewritten
    /// only when something was actually removed.
    pub fn clean(&self) -> Result<usize, TaskError> {
        let tasks = self.load()?;
        let kept: Vec<Task> = tasks
            .iter()
            .filter(|t| !t.status.is_closed())
            .cloned()
            .collect();
        let deleted = tasks.len() - kept.len();
        if deleted == 0 {
            return Ok(0);
        }
        self.save(&kept)?;
        debug!(deleted, "cleaned closed tasks");
        Ok(deleted)
    }
}

/// Detect the on-disk shape and parse it. Newline-delimited JSON is tried
/// first; on failure the content is retried as a single JSON array (the
/// legacy shape). A zero-byte or all-blank file is an empty store.
fn parse_tasks(content: &str) -> Result<Vec<Task>, TaskError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let line_err = match parse_lines(content) {
        Ok(tasks) => return Ok(tasks),
        Err(err) => err,
    };

    match serde_json::from_str::<Vec<Task>>(content) {
        Ok(tasks) => {
            debug!(count = tasks.len(), "read legacy array format");
            Ok(tasks)
        }
        // Report the error from whichever shape the file resembles.
        Err(array_err) if content.trim_start().starts_with('[') => {
            Err(TaskError::parse(array_err))
        }
        Err(_) => Err(line_err),
    }
}

fn parse_lines(content: &str) -> Result<Vec<Task>, TaskError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line)
                .map_err(|e| TaskError::parse(format!("line {}: {e}", index + 1)))
        })
        .collect()
}
