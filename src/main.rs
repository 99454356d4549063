use clap::Parser;
use std::process;

use task::cli::{self, Cli, Commands};
use task::models::Status;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli_args = Cli::parse();
    let json_output = cli_args.json;

    let exit_code = match cli_args.command {
        Commands::Init => cli::init::run(json_output),
        Commands::New {
            title,
            description,
            labels,
            kind,
        } => cli::new::run(&title, description.as_deref(), labels, &kind, json_output),
        Commands::List {
            status,
            kind,
            label,
        } => cli::list::run(status.as_deref(), kind.as_deref(), label, json_output),
        Commands::Show { id } => cli::show::run(&id, json_output),
        Commands::Update {
            id,
            name,
            description,
            labels,
            kind,
            status,
        } => cli::update::run(
            &id,
            name.as_deref(),
            description.as_deref(),
            labels,
            kind.as_deref(),
            status.as_deref(),
            json_output,
        ),
        Commands::Note { id, content } => cli::note::run(&id, content.as_deref(), json_output),
        Commands::Edit { id } => cli::edit::run(&id, json_output),
        Commands::Delete { id } => cli::delete::run(&id, json_output),
        Commands::Clean => cli::clean::run(json_output),
        Commands::Ready => cli::list::run(Some("todo"), None, None, json_output),
        Commands::Take { id } => cli::update::run_status(&id, Status::Progress, json_output),
        Commands::Complete { id } => cli::update::run_status(&id, Status::Done, json_output),
        Commands::Block { id } => cli::update::run_status(&id, Status::Blocked, json_output),
        Commands::Abandon { id } => cli::update::run_status(&id, Status::Abandon, json_output),
    };

    process::exit(exit_code);
}
