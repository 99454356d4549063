use serde_json::{json, Value};

use crate::error::TaskError;
use crate::models::Task;

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &TaskError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

/// A task in its exact wire shape (same keys and encodings as the store).
pub fn task_json(task: &Task) -> Value {
    serde_json::to_value(task).unwrap_or(Value::Null)
}

pub fn tasks_json(tasks: &[Task]) -> Value {
    Value::Array(tasks.iter().map(task_json).collect())
}

pub fn emit(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{value}"),
    }
}
