use std::env;
use std::fs;
use std::io::Write;
use std::process::Command;

use serde_json::json;
use tempfile::Builder;

use crate::error::TaskError;
use crate::frontmatter;
use crate::models::{self, Status, Task, TaskType};
use crate::output;

pub fn run(id: &str, json_output: bool) -> i32 {
    match execute(id) {
        Ok(task) => {
            if json_output {
                output::json::emit(&output::json::success(json!({
                    "task": output::json::task_json(&task)
                })));
            } else {
                println!("Updated task {}", task.id);
            }
            0
        }
        Err(err) => super::render_error(&err, json_output),
    }
}

fn execute(id: &str) -> Result<Task, TaskError> {
    let store = super::store();
    let mut task = store
        .find_by_id(id)?
        .ok_or_else(|| TaskError::task_not_found(id))?;

    let edited = open_editor(&frontmatter::render(&task))?;
    let (fm, body) = frontmatter::parse(&edited)?;

    // Resolve and validate every field before the first mutation so a bad
    // value rejects the whole edit.
    let title = fm.title.unwrap_or_else(|| task.title.clone());
    if title.trim().is_empty() {
        return Err(TaskError::validation("task title is required"));
    }
    let kind = match fm.kind {
        Some(raw) => TaskType::parse(&raw)?,
        None => task.kind,
    };
    let status = match fm.status {
        Some(raw) => Status::parse(&raw)?,
        None => task.status,
    };
    let labels = fm
        .labels
        .map(frontmatter::normalize_labels)
        .unwrap_or_else(|| task.labels.clone());
    let description = frontmatter::normalize_description(&body);

    let now = models::now();
    if title != task.title {
        task.set_title(title, now);
    }
    if kind != task.kind {
        task.set_kind(kind, now);
    }
    if status != task.status {
        task.set_status(status, now);
    }
    if labels != task.labels {
        task.set_labels(labels, now);
    }
    if description != task.description {
        task.set_description_value(description, now);
    }

    store.update(&task)?;
    Ok(task)
}

/// Write the template to a temp file, hand it to `$EDITOR` (falling back to
/// `$VISUAL`), and read the result back.
fn open_editor(template: &str) -> Result<String, TaskError> {
    let editor = env::var("EDITOR")
        .ok()
        .filter(|e| !e.is_empty())
        .or_else(|| env::var("VISUAL").ok().filter(|e| !e.is_empty()))
        .ok_or_else(|| TaskError::validation("EDITOR is not set"))?;

    let mut file = Builder::new()
        .prefix("task-edit-")
        .suffix(".md")
        .tempfile()
        .map_err(|e| TaskError::io("creating temp file", e))?;
    file.write_all(template.as_bytes())
        .map_err(|e| TaskError::io("writing temp file", e))?;
    file.flush()
        .map_err(|e| TaskError::io("writing temp file", e))?;

    let path = file.path().to_path_buf();
    let status = Command::new("sh")
        .arg("-c")
        .arg(format!("{editor} {}", shell_escape(&path.to_string_lossy())))
        .status()
        .map_err(|e| TaskError::io("running editor", e))?;
    if !status.success() {
        return Err(TaskError::validation(format!(
            "editor exited with status {status}"
        )));
    }

    fs::read_to_string(&path).map_err(|e| TaskError::io("reading temp file", e))
}

fn shell_escape(value: &str) -> String {
    format!("'{}'", value.replace('\'', r#"'"'"'"#))
}
