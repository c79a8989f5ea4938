// src/domain/history.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Marker carried by the terminal entry appended when a listing disappears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Sold,
}

/// One timestamped price observation.
///
/// The timestamp is the time of the fetch that observed the price, not the
/// time the vendor changed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    pub price: f64,
    // First extension version stored this as `date`.
    #[serde(alias = "date")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EntryStatus>,
}

impl PriceHistoryEntry {
    pub fn observed(price: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            price,
            timestamp,
            status: None,
        }
    }

    pub fn sold(price: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            price,
            timestamp,
            status: Some(EntryStatus::Sold),
        }
    }

    pub fn is_sold_marker(&self) -> bool {
        self.status == Some(EntryStatus::Sold)
    }
}

/// Append-only price history of a single listing.
///
/// Entries can only be appended; nothing removes or reorders them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceHistory(Vec<PriceHistoryEntry>);

// Stored histories were written by older versions that could omit the price.
// An unreadable entry is skipped on its own so the rest of the history and
// the record that owns it survive.
impl<'de> Deserialize<'de> for PriceHistory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = match Value::deserialize(deserializer)? {
            Value::Array(items) => items,
            Value::Null => return Ok(Self::new()),
            other => {
                warn!(value = %other, "ignoring price history that is not a list");
                return Ok(Self::new());
            }
        };

        let entries = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| {
                match serde_json::from_value::<PriceHistoryEntry>(item) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        warn!(index, error = %e, "skipping unreadable price history entry");
                        None
                    }
                }
            })
            .collect();

        Ok(Self(entries))
    }
}

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[PriceHistoryEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&PriceHistoryEntry> {
        self.0.last()
    }

    pub fn last_price(&self) -> Option<f64> {
        self.0.last().map(|e| e.price)
    }

    /// Records `price` unless it equals the immediately preceding entry.
    /// Returns whether an entry was appended.
    ///
    /// Only the last entry is compared, so a price that comes back to an
    /// earlier value after other changes is recorded again.
    pub fn record(&mut self, price: f64, at: DateTime<Utc>) -> bool {
        if self.last_price() == Some(price) {
            return false;
        }
        self.0.push(PriceHistoryEntry::observed(price, at));
        true
    }

    /// Appends an observation even if it repeats the previous price.
    /// Used when a sold listing comes back.
    pub fn record_unconditionally(&mut self, price: f64, at: DateTime<Utc>) {
        self.0.push(PriceHistoryEntry::observed(price, at));
    }

    pub fn mark_sold(&mut self, price: f64, at: DateTime<Utc>) {
        self.0.push(PriceHistoryEntry::sold(price, at));
    }
}

impl From<Vec<PriceHistoryEntry>> for PriceHistory {
    fn from(entries: Vec<PriceHistoryEntry>) -> Self {
        Self(entries)
    }
}
