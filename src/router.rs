use crate::config::Config;
use crate::cycle::run_fetch_cycle;
use crate::db::storage::load_state;
use crate::db::{fetch_runs, Database};
use crate::domain::columns::{sort_rows, SortSpec};
use crate::errors::AppError;
use crate::responses::{html_response, json_response, redirect, xlsx_response, ResultResp};
use crate::scraper::headers::save_captured_headers;
use crate::scraper::SnapshotSource;
use crate::spreadsheets::bikes_workbook;
use crate::templates::pages::{bikes_page, BikesVm};
use astra::Request;
use chrono::Utc;
use std::collections::HashMap;
use std::io::Read;
use tracing::info;

const MAX_BODY_BYTES: u64 = 64 * 1024;
const RECENT_RUNS: usize = 10;

/// Everything a request handler needs.
pub struct App {
    pub db: Database,
    pub config: Config,
    pub source: Box<dyn SnapshotSource>,
}

pub fn handle(mut req: Request, app: &App) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => {
            let params = parse_query(&req);
            let sort = SortSpec::parse(
                params.get("sort").map(String::as_str),
                params.get("dir").map(String::as_str),
            );
            bikes(app, sort)
        }
        ("POST", "/fetch") => {
            run_fetch_cycle(
                &app.db,
                app.source.as_ref(),
                &app.config.shop_base_url,
                Utc::now(),
            )?;
            redirect("/")
        }
        ("POST", "/headers") => {
            let body = read_body(&mut req)?;
            let saved = save_captured_headers(&app.db, &body)?;
            info!(count = saved, "captured request headers");
            json_response(serde_json::json!({ "saved": saved }).to_string())
        }
        ("GET", "/state.json") => {
            let state = app.db.with_conn(|conn| load_state(conn))?;
            json_response(state.to_json()?)
        }
        ("GET", "/export.xlsx") => {
            let state = app.db.with_conn(|conn| load_state(conn))?;
            let buffer = bikes_workbook(&state.to_rows())?;
            xlsx_response(buffer, "bikes.xlsx")
        }
        _ => Err(AppError::NotFound),
    }
}

fn bikes(app: &App, sort: Option<SortSpec>) -> ResultResp {
    let (state, runs) = app.db.with_conn(|conn| {
        Ok((
            load_state(conn)?,
            fetch_runs::recent_fetch_runs(conn, RECENT_RUNS)?,
        ))
    })?;

    let mut rows = state.to_rows();
    if let Some(spec) = sort {
        sort_rows(&mut rows, spec);
    }

    html_response(bikes_page(&BikesVm {
        rows,
        sort,
        runs: &runs,
    }))
}

fn read_body(req: &mut Request) -> Result<String, AppError> {
    let mut body = String::new();
    req.body_mut()
        .reader()
        .take(MAX_BODY_BYTES)
        .read_to_string(&mut body)
        .map_err(|e| AppError::BadRequest(format!("unreadable request body: {e}")))?;
    Ok(body)
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    let mut map = HashMap::new();

    if let Some(q) = req.uri().query() {
        for pair in q.split('&') {
            let mut parts = pair.splitn(2, '=');
            if let (Some(k), Some(v)) = (parts.next(), parts.next()) {
                map.insert(k.to_string(), v.to_string());
            }
        }
    }

    map
}
