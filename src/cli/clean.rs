use serde_json::json;

use crate::output;

pub fn run(json_output: bool) -> i32 {
    match super::store().clean() {
        Ok(deleted) => {
            if json_output {
                output::json::emit(&output::json::success(json!({ "deleted": deleted })));
            } else if deleted == 0 {
                println!("No closed tasks to delete");
            } else {
                println!("Deleted {deleted} closed task(s)");
            }
            0
        }
        Err(err) => super::render_error(&err, json_output),
    }
}
