pub mod commands;

pub mod clean;
pub mod delete;
pub mod edit;
pub mod init;
pub mod list;
pub mod new;
pub mod note;
pub mod show;
pub mod update;

pub use commands::*;

use crate::error::TaskError;
use crate::output;
use crate::store::Store;

/// All commands operate on the store rooted in the current directory.
pub(crate) fn store() -> Store {
    Store::new(".")
}

pub(crate) fn render_error(err: &TaskError, json_output: bool) -> i32 {
    if json_output {
        output::json::emit(&output::json::error(err));
    } else {
        eprintln!("Error: {}", err.message);
    }
    1
}
