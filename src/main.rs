use clap::Parser;
use ideaflow::cli::{
    handle_attach, handle_decide, handle_delete, handle_history, handle_init, handle_list,
    handle_overview, handle_show, handle_submit, Cli, Commands,
};
use ideaflow::storage::{find_project_root, Project};
use ideaflow::Config;
use tracing_subscriber::EnvFilter;

/// Log to stderr, filtered by `IDEAFLOW_LOG` or else the project's `log_filter`
fn init_logging() {
    let filter = EnvFilter::try_from_env("IDEAFLOW_LOG").unwrap_or_else(|_| {
        let fallback = Project::open(&find_project_root())
            .map(|p| p.config.log_filter)
            .unwrap_or_else(|_| Config::default().log_filter);
        EnvFilter::try_new(&fallback).unwrap_or_else(|_| EnvFilter::new("warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let identity = &cli.identity;
    let result = match cli.command {
        Commands::Init => handle_init(),
        Commands::Submit {
            title,
            description,
            category,
            attach,
            json,
        } => handle_submit(identity, title, description, category, attach, json),
        Commands::List { status, json } => handle_list(identity, status, json),
        Commands::Show { id, json } => handle_show(identity, id, json),
        Commands::Decide {
            id,
            outcome,
            comment,
            json,
        } => handle_decide(identity, id, outcome, comment, json),
        Commands::History { id, json } => handle_history(identity, id, json),
        Commands::Attach { id, path } => handle_attach(identity, id, path),
        Commands::Delete { id, force } => handle_delete(identity, id, force),
        Commands::Overview { json } => handle_overview(identity, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
