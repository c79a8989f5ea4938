use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::db::{init_db, Database};
use crate::errors::AppError;
use clap::Parser;

mod cli;
mod commands;
mod config;
mod cycle;
mod db;
mod domain;
mod errors;
mod logging;
mod responses;
mod router;
mod scraper;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    dotenvy::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = Config::from_env()?;
    if let Some(path) = cli.db_path {
        config.db_path = path;
    }

    let db = Database::new(&config.db_path);
    init_db(&db)?;

    match cli.command {
        Commands::Fetch => commands::run_fetch(&db, &config),
        Commands::Serve { addr } => commands::run_serve(db, config, addr),
        Commands::List { json } => commands::run_list(&db, json),
        Commands::Export { format, output } => {
            commands::run_export(&db, format, output.as_deref())
        }
        Commands::Render { output } => commands::run_render(&db, output.as_deref()),
        Commands::CaptureHeaders { file } => commands::run_capture_headers(&db, &file),
    }
}
