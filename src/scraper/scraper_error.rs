use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("No headers captured yet. Please visit the Buycycle page first.")]
    MissingAuthContext,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Shop API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    JsonParse(String),
    #[error("Unexpected data shape: {0}")]
    UnexpectedShape(String),
}

impl ScraperError {
    /// Transport failures and server-side errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ScraperError::Network(_) => true,
            ScraperError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
