use serde_json::json;

use crate::error::TaskError;
use crate::output;

pub fn run(id: &str, json_output: bool) -> i32 {
    match execute(id) {
        Ok(()) => {
            if json_output {
                output::json::emit(&output::json::success(json!({ "id": id })));
            } else {
                println!("Deleted task {id}");
            }
            0
        }
        Err(err) => super::render_error(&err, json_output),
    }
}

fn execute(id: &str) -> Result<(), TaskError> {
    super::store().delete(id)
}
