use serde_json::json;

use crate::error::TaskError;
use crate::models::{Status, Task, TaskType};
use crate::output;
use crate::store::Filter;

pub fn run(
    status: Option<&str>,
    kind: Option<&str>,
    label: Option<String>,
    json_output: bool,
) -> i32 {
    match execute(status, kind, label) {
        Ok(tasks) => {
            if json_output {
                output::json::emit(&output::json::success(json!({
                    "tasks": output::json::tasks_json(&tasks)
                })));
            } else {
                output::text::print_task_list(&tasks);
            }
            0
        }
        Err(err) => super::render_error(&err, json_output),
    }
}

fn execute(
    status: Option<&str>,
    kind: Option<&str>,
    label: Option<String>,
) -> Result<Vec<Task>, TaskError> {
    let filter = Filter {
        status: status.map(Status::parse).transpose()?,
        kind: kind.map(TaskType::parse).transpose()?,
        label,
    };
    super::store().list_filtered(&filter)
}
