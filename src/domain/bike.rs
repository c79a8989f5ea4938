// src/domain/bike.rs

use crate::domain::history::PriceHistory;
use crate::domain::lenient;
use crate::scraper::models::Listing;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Availability of a tracked listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BikeStatus {
    #[default]
    Available,
    Sold,
}

impl BikeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BikeStatus::Available => "available",
            BikeStatus::Sold => "sold",
        }
    }
}

impl fmt::Display for BikeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Older records carry whatever status string the vendor sent. Only "sold"
// means anything to us.
impl<'de> Deserialize<'de> for BikeStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value.as_str() {
            Some(s) if s.eq_ignore_ascii_case("sold") => BikeStatus::Sold,
            _ => BikeStatus::Available,
        })
    }
}

/// A listing as persisted: the vendor's fields plus what the tracker derives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BikeRecord {
    #[serde(deserialize_with = "lenient::deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::deserialize_price")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::deserialize_opt_string")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient::deserialize_opt_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient::deserialize_opt_string")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub price_history: PriceHistory,
    #[serde(default)]
    pub status: BikeStatus,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Keys owned by the record itself; a vendor field with the same name is
/// overridden, never duplicated.
const DERIVED_KEYS: [&str; 4] = ["url", "image_url", "price_history", "status"];

impl BikeRecord {
    /// Builds the stored form of a freshly fetched listing.
    pub fn from_listing(
        listing: &Listing,
        shop_base_url: &str,
        price_history: PriceHistory,
        status: BikeStatus,
    ) -> Self {
        let mut fields = listing.fields.clone();
        for key in DERIVED_KEYS {
            fields.remove(key);
        }

        Self {
            id: listing.id.clone(),
            price: listing.price,
            slug: listing.slug.clone(),
            url: listing
                .slug
                .as_deref()
                .map(|slug| bike_url(shop_base_url, slug)),
            image_url: listing.image_url(),
            price_history,
            status,
            fields,
        }
    }

    /// Most recent price we know of: the last history entry, else the listed price.
    pub fn last_known_price(&self) -> Option<f64> {
        self.price_history.last_price().or(self.price)
    }

    pub fn is_sold(&self) -> bool {
        self.status == BikeStatus::Sold
    }

    pub fn name(&self) -> &str {
        self.fields
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(&self.id)
    }

    /// Reads a pass-through vendor field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }
}

pub fn bike_url(shop_base_url: &str, slug: &str) -> String {
    format!("{}/bike/{}", shop_base_url.trim_end_matches('/'), slug)
}
