use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use astra::Server;
use chrono::Utc;
use tracing::info;

use crate::cli::ExportFormat;
use crate::config::Config;
use crate::cycle::run_fetch_cycle;
use crate::db::storage::load_state;
use crate::db::{fetch_runs, Database};
use crate::domain::columns::format_number;
use crate::domain::PersistedState;
use crate::errors::AppError;
use crate::responses::html_error_response;
use crate::router::{handle, App};
use crate::scraper::headers::save_captured_headers;
use crate::scraper::{BuycycleScraper, StoredHeaders};
use crate::spreadsheets::bikes_workbook;
use crate::templates::pages::{bikes_page, BikesVm};

fn scraper_for(db: &Database, config: &Config) -> Result<BuycycleScraper, AppError> {
    Ok(BuycycleScraper::new(
        config,
        Box::new(StoredHeaders::new(db.clone())),
    )?)
}

fn read_state(db: &Database) -> Result<PersistedState, AppError> {
    db.with_conn(|conn| load_state(conn))
}

pub fn run_fetch(db: &Database, config: &Config) -> Result<(), AppError> {
    let scraper = scraper_for(db, config)?;
    let outcome = run_fetch_cycle(db, &scraper, &config.shop_base_url, Utc::now())?;

    println!("{} ({} tracked)", outcome.report, outcome.tracked);
    if outcome.skipped > 0 {
        println!("{} malformed listings skipped", outcome.skipped);
    }
    Ok(())
}

pub fn run_serve(db: Database, config: Config, addr: Option<String>) -> Result<(), AppError> {
    let addr = addr.unwrap_or_else(|| config.addr.clone());
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| AppError::Config(format!("invalid bind address '{addr}': {e}")))?;

    let source = Box::new(scraper_for(&db, &config)?);
    let app = App {
        db,
        config,
        source,
    };

    info!("Starting server at http://{addr}");
    let server = Server::bind(&addr).max_workers(8);

    server.serve(move |req, _info| match handle(req, &app) {
        Ok(resp) => resp,
        Err(err) => html_error_response(err),
    })?;

    info!("Server shut down cleanly.");
    Ok(())
}

pub fn run_list(db: &Database, as_json: bool) -> Result<(), AppError> {
    let state = read_state(db)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    for line in format_bike_lines(&state) {
        println!("{line}");
    }
    Ok(())
}

pub fn format_bike_lines(state: &PersistedState) -> Vec<String> {
    state
        .iter()
        .map(|bike| {
            format!(
                "{}\t{}\t{}\t{}\t{} price points",
                bike.id,
                bike.status,
                bike.price.map(format_number).unwrap_or_else(|| "-".into()),
                bike.name(),
                bike.price_history.len()
            )
        })
        .collect()
}

pub fn run_export(
    db: &Database,
    format: ExportFormat,
    output_path: Option<&Path>,
) -> Result<(), AppError> {
    let state = read_state(db)?;

    match format {
        ExportFormat::Json => {
            let rendered = serde_json::to_string_pretty(&state)?;
            write_or_print(output_path, rendered)
        }
        ExportFormat::Xlsx => {
            let path = output_path.ok_or_else(|| {
                AppError::BadRequest("xlsx export needs --output <PATH>".into())
            })?;
            fs::write(path, bikes_workbook(&state.to_rows())?)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

pub fn run_render(db: &Database, output_path: Option<&Path>) -> Result<(), AppError> {
    let (state, runs) = db.with_conn(|conn| {
        Ok((
            load_state(conn)?,
            fetch_runs::recent_fetch_runs(conn, 10)?,
        ))
    })?;

    let page = bikes_page(&BikesVm {
        rows: state.to_rows(),
        sort: None,
        runs: &runs,
    });
    write_or_print(output_path, page.into_string())
}

pub fn run_capture_headers(db: &Database, file: &Path) -> Result<(), AppError> {
    let raw = fs::read_to_string(file)?;
    let saved = save_captured_headers(db, &raw)?;
    println!("Saved {saved} headers");
    Ok(())
}

fn write_or_print(output_path: Option<&Path>, rendered: String) -> Result<(), AppError> {
    if let Some(path) = output_path {
        fs::write(path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BikeRecord;
    use serde_json::json;

    #[test]
    fn list_lines_show_status_price_and_history_length() {
        let mut state = PersistedState::new();
        state.insert(
            serde_json::from_value::<BikeRecord>(json!({
                "id": "12",
                "price": 2400,
                "name": "Orbea Rise",
                "status": "sold",
                "price_history": [
                    { "price": 2400, "timestamp": "2024-03-01T09:00:00Z" },
                    { "price": 2400, "timestamp": "2024-03-02T09:00:00Z", "status": "sold" }
                ]
            }))
            .unwrap(),
        );
        state.insert(serde_json::from_value::<BikeRecord>(json!({ "id": "13" })).unwrap());

        assert_eq!(
            format_bike_lines(&state),
            vec![
                format!("12\tsold\t{}\tOrbea Rise\t2 price points", format_number(2400.0)),
                "13\tavailable\t-\t13\t0 price points".to_string(),
            ]
        );
    }
}
