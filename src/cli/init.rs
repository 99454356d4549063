use serde_json::json;

use crate::output;

pub fn run(json_output: bool) -> i32 {
    let store = super::store();
    match store.init() {
        Ok(()) => {
            if json_output {
                output::json::emit(&output::json::success(json!({
                    "path": store.task_file().to_string_lossy()
                })));
            } else {
                println!("Initialized task tracking in .task/");
            }
            0
        }
        Err(err) => super::render_error(&err, json_output),
    }
}
