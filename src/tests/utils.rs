use crate::config::Config;
use crate::db::connection::{init_db, Database};
use crate::router::App;
use crate::scraper::{ScraperError, SnapshotSource};
use astra::{Body, Request, Response};
use http::Method;
use serde_json::{json, Value};
use std::io::Read;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Fresh database file with the production schema. Keep the `TempDir`
/// alive for as long as the database is used.
pub fn init_test_db() -> (TempDir, Database) {
    let dir = tempfile::tempdir().expect("temp dir");
    let db = Database::new(dir.path().join("bike_tracker_test.sqlite3"));
    init_db(&db).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    (dir, db)
}

/// Snapshot source whose next answer the test controls. Clones share state.
#[derive(Clone, Default)]
pub struct StubSource {
    next: Arc<Mutex<Option<Vec<Value>>>>,
}

impl StubSource {
    pub fn returning(listings: Vec<Value>) -> Self {
        let stub = Self::default();
        stub.set(listings);
        stub
    }

    /// Fails the way a shop fetch does before any headers were captured.
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn set(&self, listings: Vec<Value>) {
        *self.next.lock().unwrap() = Some(listings);
    }

    pub fn fail(&self) {
        *self.next.lock().unwrap() = None;
    }
}

impl SnapshotSource for StubSource {
    fn fetch_snapshot(&self) -> Result<Vec<Value>, ScraperError> {
        self.next
            .lock()
            .unwrap()
            .clone()
            .ok_or(ScraperError::MissingAuthContext)
    }
}

pub fn test_app(source: StubSource) -> (TempDir, App) {
    let (dir, db) = init_test_db();
    let app = App {
        db,
        config: Config::default(),
        source: Box::new(source),
    };
    (dir, app)
}

pub fn request(method: Method, uri: &str, body: &str) -> Request {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn body_string(mut resp: Response) -> String {
    let mut body = String::new();
    resp.body_mut()
        .reader()
        .read_to_string(&mut body)
        .unwrap();
    body
}

pub fn listing(id: u64, price: u64, name: &str) -> Value {
    json!({
        "id": id,
        "price": price,
        "slug": format!("{}-{id}", name.to_lowercase().replace(' ', "-")),
        "name": name,
        "year": 2021,
        "city": "Kraków",
        "image_side": { "file_url": format!("https://img.example/{id}.jpg") }
    })
}
