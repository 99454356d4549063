use clap::{Parser, Subcommand};

const VERSION: &str = env!("TASK_VERSION");

#[derive(Parser)]
#[command(
    name = "task",
    version = VERSION,
    about = "A simple file-backed task tracker",
    after_help = "\
NOTE:
  Tasks live in <cwd>/.task/task.json so they can be committed with the
  project. Run `task init` once per project before any other command.

EXIT CODES:
  0  Success
  1  Error (not initialized, unknown task, invalid flag value, etc.)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize task tracking in the current directory
    Init,

    /// Create a new task
    New {
        /// Task title
        title: String,

        /// Task description
        #[arg(short, long)]
        description: Option<String>,

        /// Label to add (can be repeated)
        #[arg(short = 'l', long = "label", value_name = "LABEL")]
        labels: Vec<String>,

        /// Task type: task, bug, feature
        #[arg(short = 't', long = "type", value_name = "TYPE", default_value = "task")]
        kind: String,
    },

    /// List tasks, most recently updated first
    List {
        /// Filter by status: todo, progress, blocked, abandon, done
        #[arg(short, long)]
        status: Option<String>,

        /// Filter by type: task, bug, feature
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        kind: Option<String>,

        /// Filter by label
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Show task details
    Show {
        /// Task ID
        id: String,
    },

    /// Update an existing task
    #[command(after_help = "\
NOTE:
  --label flags replace the whole label set. Invalid --type or --status
  values reject the update as a whole; no other flag is applied.")]
    Update {
        /// Task ID
        id: String,

        /// New task title
        #[arg(short, long)]
        name: Option<String>,

        /// Task description
        #[arg(short, long)]
        description: Option<String>,

        /// Replacement label (can be repeated)
        #[arg(short = 'l', long = "label", value_name = "LABEL")]
        labels: Vec<String>,

        /// Task type: task, bug, feature
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        kind: Option<String>,

        /// Task status: todo, progress, blocked, abandon, done
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Add a note to a task
    #[command(after_help = "\
NOTE:
  Content comes from the positional argument, or from stdin when piped:
    echo \"longer note\" | task note abc")]
    Note {
        /// Task ID
        id: String,

        /// Note content (stdin is read when omitted)
        content: Option<String>,
    },

    /// Edit a task in $EDITOR
    Edit {
        /// Task ID
        id: String,
    },

    /// Delete a task completely
    Delete {
        /// Task ID
        id: String,
    },

    /// Delete all closed (done or abandon) tasks
    Clean,

    /// List tasks with status 'todo'
    Ready,

    /// Set a task's status to 'progress'
    Take {
        /// Task ID
        id: String,
    },

    /// Set a task's status to 'done'
    Complete {
        /// Task ID
        id: String,
    },

    /// Set a task's status to 'blocked'
    Block {
        /// Task ID
        id: String,
    },

    /// Set a task's status to 'abandon'
    Abandon {
        /// Task ID
        id: String,
    },
}
