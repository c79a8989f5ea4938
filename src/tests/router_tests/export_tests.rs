// src/tests/router_tests/export_tests.rs

use crate::router::handle;
use crate::tests::utils::{body_string, listing, request, test_app, StubSource};
use http::Method;
use std::io::Read;

#[test]
fn state_json_of_empty_store_is_an_empty_object() {
    let (_dir, app) = test_app(StubSource::failing());

    let resp = handle(request(Method::GET, "/state.json", ""), &app).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["Content-Type"], "application/json");
    assert_eq!(body_string(resp), "{}");
}

#[test]
fn xlsx_export_is_a_workbook_attachment() {
    let (_dir, app) = test_app(StubSource::returning(vec![listing(1, 2400, "Orbea Rise")]));
    handle(request(Method::POST, "/fetch", ""), &app).unwrap();

    let mut resp = handle(request(Method::GET, "/export.xlsx", ""), &app).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["Content-Disposition"],
        "attachment; filename=\"bikes.xlsx\""
    );

    let mut bytes = Vec::new();
    resp.body_mut().reader().read_to_end(&mut bytes).unwrap();
    // xlsx files are zip archives
    assert!(bytes.starts_with(b"PK"));
}
