use serde_json::json;

use crate::error::TaskError;
use crate::models::Task;
use crate::output;

pub fn run(id: &str, json_output: bool) -> i32 {
    match execute(id) {
        Ok(task) => {
            if json_output {
                output::json::emit(&output::json::success(json!({
                    "task": output::json::task_json(&task)
                })));
            } else {
                output::text::print_task_detail(&task);
            }
            0
        }
        Err(err) => super::render_error(&err, json_output),
    }
}

fn execute(id: &str) -> Result<Task, TaskError> {
    super::store()
        .find_by_id(id)?
        .ok_or_else(|| TaskError::task_not_found(id))
}
