// src/tests/router_tests/bikes_tests.rs

use crate::router::handle;
use crate::tests::utils::{body_string, listing, request, test_app, StubSource};
use http::Method;

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("{needle:?} not found in page"))
}

#[test]
fn empty_store_shows_fetch_hint() {
    let (_dir, app) = test_app(StubSource::failing());

    let resp = handle(request(Method::GET, "/", ""), &app).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("No bike data found"));
    assert!(body.contains(r#"action="/fetch""#));
    assert!(!body.contains(r#"id="bike-data""#));
}

#[test]
fn fetched_bikes_are_listed_with_links() {
    let (_dir, app) = test_app(StubSource::returning(vec![
        listing(1, 2400, "Orbea Rise"),
        listing(2, 1800, "Canyon Spectral"),
    ]));

    handle(request(Method::POST, "/fetch", ""), &app).unwrap();
    let body = body_string(handle(request(Method::GET, "/", ""), &app).unwrap());

    assert!(body.contains(r#"id="bike-data""#));
    assert!(body.contains("Orbea Rise"));
    assert!(body.contains("Canyon Spectral"));
    assert!(body.contains(r#"href="https://buycycle.com/pl-pl/bike/orbea-rise-1""#));
    assert!(body.contains("https://img.example/2.jpg"));
    assert!(body.contains("Recent fetches"));
}

#[test]
fn sort_query_orders_rows_and_marks_header() {
    let (_dir, app) = test_app(StubSource::returning(vec![
        listing(1, 2400, "Orbea Rise"),
        listing(2, 1800, "Canyon Spectral"),
        listing(3, 3100, "Trek Fuel"),
    ]));
    handle(request(Method::POST, "/fetch", ""), &app).unwrap();

    let asc = body_string(handle(request(Method::GET, "/?sort=price&dir=asc", ""), &app).unwrap());
    assert!(position(&asc, "Canyon Spectral") < position(&asc, "Orbea Rise"));
    assert!(position(&asc, "Orbea Rise") < position(&asc, "Trek Fuel"));
    assert!(asc.contains("Current Price ▲"));
    assert!(asc.contains("/?sort=price&amp;dir=desc"));

    let desc = body_string(handle(request(Method::GET, "/?sort=price&dir=desc", ""), &app).unwrap());
    assert!(position(&desc, "Trek Fuel") < position(&desc, "Orbea Rise"));
    assert!(position(&desc, "Orbea Rise") < position(&desc, "Canyon Spectral"));
    assert!(desc.contains("Current Price ▼"));
}

#[test]
fn unknown_sort_column_keeps_state_order() {
    let (_dir, app) = test_app(StubSource::returning(vec![
        listing(1, 2400, "Orbea Rise"),
        listing(2, 1800, "Canyon Spectral"),
    ]));
    handle(request(Method::POST, "/fetch", ""), &app).unwrap();

    let body = body_string(handle(request(Method::GET, "/?sort=colour", ""), &app).unwrap());
    assert!(position(&body, "Orbea Rise") < position(&body, "Canyon Spectral"));
    assert!(!body.contains('▲'));
}

#[test]
fn unknown_route_is_not_found() {
    let (_dir, app) = test_app(StubSource::failing());

    let err = handle(request(Method::GET, "/nope", ""), &app).unwrap_err();
    assert_eq!(err.status_code(), 404);

    let err = handle(request(Method::GET, "/fetch", ""), &app).unwrap_err();
    assert_eq!(err.status_code(), 404);
}
