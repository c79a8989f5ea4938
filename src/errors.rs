// errors.rs
use crate::scraper::ScraperError;
use std::io;
use thiserror::Error;

/// Errors surfaced by the fetch cycle, the store, and the HTTP/CLI front ends.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Scraper(#[from] ScraperError),
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Spreadsheet error: {0}")]
    Xlsx(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Not Found")]
    NotFound,
    #[error("Internal Server Error")]
    InternalError,
}

impl AppError {
    /// HTTP status used when the error is rendered as a page.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::NotFound => 404,
            AppError::BadRequest(_) => 400,
            AppError::Scraper(ScraperError::MissingAuthContext) => 409,
            AppError::Scraper(_) => 502,
            _ => 500,
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        AppError::Xlsx(err.to_string())
    }
}
