// src/config.rs

use crate::errors::AppError;
use crate::scraper::models::ShopFilter;
use std::env;
use std::fs;
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://buycycle.com/pl-pl/shop-api/get-content";
pub const DEFAULT_SHOP_URL: &str = "https://buycycle.com/pl-pl";
pub const DEFAULT_DB_PATH: &str = "bike_tracker.sqlite3";
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub api_url: String,
    pub shop_base_url: String,
    pub filter: ShopFilter,
    pub addr: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            api_url: DEFAULT_API_URL.to_string(),
            shop_base_url: DEFAULT_SHOP_URL.to_string(),
            filter: ShopFilter::default(),
            addr: DEFAULT_ADDR.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Reads `BIKE_TRACKER_*` variables (a `.env` file is honoured by the caller).
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let filter = match lookup("BIKE_TRACKER_FILTER") {
            Some(path) => load_filter(&path)?,
            None => defaults.filter,
        };

        let timeout_secs = match lookup("BIKE_TRACKER_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                AppError::Config(format!("BIKE_TRACKER_TIMEOUT_SECS is not a number: {raw}"))
            })?,
            None => defaults.timeout_secs,
        };

        let config = Self {
            db_path: lookup("BIKE_TRACKER_DB")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            api_url: lookup("BIKE_TRACKER_API_URL").unwrap_or(defaults.api_url),
            shop_base_url: lookup("BIKE_TRACKER_SHOP_URL").unwrap_or(defaults.shop_base_url),
            filter,
            addr: lookup("BIKE_TRACKER_ADDR").unwrap_or(defaults.addr),
            timeout_secs,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        for (name, value) in [("api url", &self.api_url), ("shop url", &self.shop_base_url)] {
            let parsed = Url::parse(value)
                .map_err(|e| AppError::Config(format!("invalid {name} '{value}': {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(AppError::Config(format!("{name} must be http(s): {value}")));
            }
        }
        if self.timeout_secs == 0 {
            return Err(AppError::Config("timeout must be at least one second".into()));
        }
        Ok(())
    }
}

fn load_filter(path: &str) -> Result<ShopFilter, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read filter file {path}: {e}")))?;
    serde_json::from_str(&raw)
        .map_err(|e| AppError::Config(format!("invalid filter file {path}: {e}")))
}
