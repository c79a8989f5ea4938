pub mod headers;
pub mod models;
mod scraper;
mod scraper_error;

pub use headers::StoredHeaders;
pub use scraper::{BuycycleScraper, SnapshotSource};
pub use scraper_error::ScraperError;
