// src/domain/state.rs

use crate::domain::bike::BikeRecord;
use crate::domain::lenient;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{error, warn};

/// Every listing ever observed, keyed by vendor id.
///
/// Iteration follows insertion order: ids already known keep their place,
/// new ids are appended in the order they were first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedState {
    order: Vec<String>,
    records: HashMap<String, BikeRecord>,
}

impl PersistedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the stored blob.
    ///
    /// Accepts the canonical `{id: record}` object and the legacy `[record]`
    /// array (re-keyed on `record.id`). A blob that is not JSON, or is neither
    /// shape, yields an empty state; the previous history is lost and logged.
    pub fn load(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return Self::new();
        };

        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                error!(error = %e, "stored bike data is not valid JSON, starting from empty state");
                return Self::new();
            }
        };

        match value {
            Value::Object(map) => {
                let mut state = Self::new();
                for (key, mut value) in map {
                    // the map key is authoritative, even when the record lacks an id
                    if let Value::Object(fields) = &mut value {
                        fields.insert("id".to_string(), Value::String(key.clone()));
                    }
                    match serde_json::from_value::<BikeRecord>(value) {
                        Ok(record) => state.insert(record),
                        Err(e) => warn!(id = %key, error = %e, "dropping undecodable stored record"),
                    }
                }
                state
            }
            Value::Array(items) => {
                warn!(count = items.len(), "migrating legacy array-shaped bike data");
                let mut state = Self::new();
                for item in items {
                    let id = item.get("id").and_then(lenient::id_from_value);
                    match serde_json::from_value::<BikeRecord>(item) {
                        Ok(record) => state.insert(record),
                        Err(e) => warn!(id = ?id, error = %e, "dropping undecodable legacy record"),
                    }
                }
                state
            }
            other => {
                error!(
                    kind = json_kind(&other),
                    "stored bike data has unexpected shape, starting from empty state"
                );
                Self::new()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Inserts or replaces a record. A replaced record keeps its position.
    pub fn insert(&mut self, record: BikeRecord) {
        if !self.records.contains_key(&record.id) {
            self.order.push(record.id.clone());
        }
        self.records.insert(record.id.clone(), record);
    }

    pub fn get(&self, id: &str) -> Option<&BikeRecord> {
        self.records.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut BikeRecord> {
        self.records.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BikeRecord> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// Records in state order, for tabular presentation.
    pub fn to_rows(&self) -> Vec<&BikeRecord> {
        self.iter().collect()
    }
}

impl Serialize for PersistedState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for record in self.iter() {
            map.serialize_entry(&record.id, record)?;
        }
        map.end()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
