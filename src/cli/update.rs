use serde_json::json;

use crate::error::TaskError;
use crate::models::{self, Status, Task, TaskType};
use crate::output;

pub fn run(
    id: &str,
    name: Option<&str>,
    description: Option<&str>,
    labels: Vec<String>,
    kind: Option<&str>,
    status: Option<&str>,
    json_output: bool,
) -> i32 {
    match execute(id, name, description, labels, kind, status) {
        Ok(task) => {
            finish(&task, json_output);
            0
        }
        Err(err) => super::render_error(&err, json_output),
    }
}

/// Status shortcut used by the `take`/`complete`/`block`/`abandon` aliases.
pub fn run_status(id: &str, status: Status, json_output: bool) -> i32 {
    match execute_status(id, status) {
        Ok(task) => {
            if json_output {
                output::json::emit(&output::json::success(json!({
                    "task": output::json::task_json(&task)
                })));
            } else {
                println!("Updated task {} to {}", task.id, status);
            }
            0
        }
        Err(err) => super::render_error(&err, json_output),
    }
}

fn finish(task: &Task, json_output: bool) {
    if json_output {
        output::json::emit(&output::json::success(json!({
            "task": output::json::task_json(task)
        })));
    } else {
        println!("Updated task {}", task.id);
    }
}

fn execute(
    id: &str,
    name: Option<&str>,
    description: Option<&str>,
    labels: Vec<String>,
    kind: Option<&str>,
    status: Option<&str>,
) -> Result<Task, TaskError> {
    // Parse every enum flag up front: one invalid value rejects the whole
    // update before any field is touched.
    let kind = kind.map(TaskType::parse).transpose()?;
    let status = status.map(Status::parse).transpose()?;

    if let Some(name) = name {
        if name.trim().is_empty() {
            return Err(TaskError::validation("task title is required"));
        }
    }

    let store = super::store();
    let mut task = store
        .find_by_id(id)?
        .ok_or_else(|| TaskError::task_not_found(id))?;

    let now = models::now();
    if let Some(name) = name {
        task.set_title(name, now);
    }
    if let Some(description) = description {
        task.set_description(description, now);
    }
    if !labels.is_empty() {
        task.set_labels(labels, now);
    }
    if let Some(kind) = kind {
        task.set_kind(kind, now);
    }
    if let Some(status) = status {
        task.set_status(status, now);
    }

    store.update(&task)?;
    Ok(task)
}

fn execute_status(id: &str, status: Status) -> Result<Task, TaskError> {
    let store = super::store();
    let mut task = store
        .find_by_id(id)?
        .ok_or_else(|| TaskError::task_not_found(id))?;
    task.set_status(status, models::now());
    store.update(&task)?;
    Ok(task)
}
