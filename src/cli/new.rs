use serde_json::json;

use crate::error::TaskError;
use crate::id;
use crate::models::{self, Task, TaskType};
use crate::output;

pub fn run(
    title: &str,
    description: Option<&str>,
    labels: Vec<String>,
    kind: &str,
    json_output: bool,
) -> i32 {
    match execute(title, description, labels, kind) {
        Ok(task) => {
            if json_output {
                output::json::emit(&output::json::success(json!({
                    "task": output::json::task_json(&task)
                })));
            } else {
                println!("Created task {}: {}", task.id, task.title);
            }
            0
        }
        Err(err) => super::render_error(&err, json_output),
    }
}

fn execute(
    title: &str,
    description: Option<&str>,
    labels: Vec<String>,
    kind: &str,
) -> Result<Task, TaskError> {
    if title.trim().is_empty() {
        return Err(TaskError::validation("task title is required"));
    }
    let kind = TaskType::parse(kind)?;

    let store = super::store();
    let existing = store.existing_ids()?;
    let task_id = id::generate_unique(&existing)?;

    let now = models::now();
    let mut task = Task::new(task_id, title, kind, now);
    if let Some(description) = description {
        task.set_description(description, now);
    }
    for label in labels {
        task.add_label(label, now);
    }

    store.add(&task)?;
    Ok(task)
}
