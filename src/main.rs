mod bootstrap;
mod cli;
mod commands;

use anyhow::Result;
use ck_app::AppPaths;
use clap::Parser;

use bootstrap::config::default_data_root;
use bootstrap::tracing::init_tracing_subscriber;
use bootstrap::{load_app_config, wire_dependencies};
use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The helper may run as another user: no data dir, no log file.
    if let Command::Helper = cli.command {
        init_tracing_subscriber(None)?;
        return commands::helper::run().await;
    }

    let data_root = default_data_root()?;
    let config = load_app_config(cli.config, &data_root)?;
    let paths = AppPaths::resolve(&config, &data_root);

    let log_dir = matches!(cli.command, Command::Watch { .. }).then(|| paths.logs_dir.clone());
    init_tracing_subscriber(log_dir.as_deref())?;

    let deps = wire_dependencies(paths)?;

    match cli.command {
        Command::Watch { touch_stdin } => commands::watch::run(deps, touch_stdin).await,
        Command::Helper => Ok(()),
        Command::List { limit } => commands::history::list(&deps, limit).await,
        Command::Search { query } => commands::history::search(&deps, &query).await,
        Command::Delete { id } => commands::history::delete(&deps, &id).await,
        Command::Clear => commands::history::clear(&deps).await,
        Command::Count => commands::history::count(&deps).await,
        Command::Export { file } => commands::history::export(&deps, &file).await,
        Command::Import { file } => commands::history::import(&deps, &file).await,
        Command::Pause => commands::settings::set_paused(&deps, true).await,
        Command::Resume => commands::settings::set_paused(&deps, false).await,
        Command::Settings => commands::settings::show(&deps).await,
    }
}
