// src/tests/router_tests/fetch_tests.rs

use crate::db::fetch_runs::recent_fetch_runs;
use crate::errors::AppError;
use crate::responses::html_error_response;
use crate::router::handle;
use crate::scraper::ScraperError;
use crate::tests::utils::{body_string, listing, request, test_app, StubSource};
use http::Method;
use serde_json::Value;

fn state_json(app: &crate::router::App) -> Value {
    let body = body_string(handle(request(Method::GET, "/state.json", ""), app).unwrap());
    serde_json::from_str(&body).unwrap()
}

#[test]
fn post_fetch_merges_snapshot_and_redirects_home() {
    let (_dir, app) = test_app(StubSource::returning(vec![
        listing(7, 2400, "Orbea Rise"),
        listing(8, 1800, "Canyon Spectral"),
    ]));

    let resp = handle(request(Method::POST, "/fetch", ""), &app).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers()["Location"], "/");

    let state = state_json(&app);
    let ids: Vec<&str> = state.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["7", "8"]);
    assert_eq!(state["7"]["status"], "available");
    assert_eq!(state["7"]["price_history"][0]["price"].as_f64(), Some(2400.0));
}

#[test]
fn failed_fetch_reports_conflict_and_keeps_state() {
    let stub = StubSource::returning(vec![listing(7, 2400, "Orbea Rise")]);
    let (_dir, app) = test_app(stub.clone());
    handle(request(Method::POST, "/fetch", ""), &app).unwrap();
    let before = state_json(&app);

    stub.fail();
    let err = handle(request(Method::POST, "/fetch", ""), &app).unwrap_err();
    assert!(matches!(
        err,
        AppError::Scraper(ScraperError::MissingAuthContext)
    ));

    let resp = html_error_response(err);
    assert_eq!(resp.status(), 409);
    assert!(body_string(resp).contains("No headers captured yet"));

    assert_eq!(state_json(&app), before);

    let runs = app
        .db
        .with_conn(|conn| recent_fetch_runs(conn, 10))
        .unwrap();
    assert_eq!(runs.len(), 2);
    assert!(!runs[0].success);
    assert!(runs[1].success);
}

#[test]
fn posted_headers_are_stored() {
    let (_dir, app) = test_app(StubSource::failing());

    let resp = handle(
        request(
            Method::POST,
            "/headers",
            r#"[{"name": "Cookie", "value": "session=abc"}, {"name": "X-XSRF-TOKEN", "value": "t0k"}]"#,
        ),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = serde_json::from_str(&body_string(resp)).unwrap();
    assert_eq!(body["saved"], 2);
}

#[test]
fn garbage_headers_are_a_bad_request() {
    let (_dir, app) = test_app(StubSource::failing());

    let err = handle(request(Method::POST, "/headers", "not json"), &app).unwrap_err();
    assert_eq!(err.status_code(), 400);

    let err = handle(request(Method::POST, "/headers", "[]"), &app).unwrap_err();
    assert_eq!(err.status_code(), 400);
}
