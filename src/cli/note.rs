use std::io::{IsTerminal, Read};

use serde_json::json;

use crate::error::TaskError;
use crate::id;
use crate::models;
use crate::output;

pub fn run(task_id: &str, content: Option<&str>, json_output: bool) -> i32 {
    match execute(task_id, content) {
        Ok(note_id) => {
            if json_output {
                output::json::emit(&output::json::success(json!({
                    "task_id": task_id,
                    "note_id": note_id
                })));
            } else {
                println!("Added note to task {task_id}");
            }
            0
        }
        Err(err) => super::render_error(&err, json_output),
    }
}

fn execute(task_id: &str, content: Option<&str>) -> Result<String, TaskError> {
    let content = match content {
        Some(content) => content.to_string(),
        None => read_stdin()?,
    };
    let content = content.trim().to_string();
    if content.is_empty() {
        return Err(TaskError::validation("note content is required"));
    }

    let store = super::store();
    let mut task = store
        .find_by_id(task_id)?
        .ok_or_else(|| TaskError::task_not_found(task_id))?;

    let note_id = id::generate_note_id(task_id)?;
    task.add_note(&note_id, content, models::now());
    store.update(&task)?;
    Ok(note_id)
}

/// Piped stdin is note content; an interactive terminal is not read.
fn read_stdin() -> Result<String, TaskError> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }
    let mut content = String::new();
    stdin
        .read_to_string(&mut content)
        .map_err(|e| TaskError::io("reading stdin", e))?;
    Ok(content)
}
