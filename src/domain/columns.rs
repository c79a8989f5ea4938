// src/domain/columns.rs

//! Dashboard columns and how rows are ordered by them.

use crate::domain::bike::BikeRecord;
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Year,
    Price,
    Msrp,
    Status,
    Preowned,
    Receipt,
    LastService,
    Mileage,
    Component,
    City,
    PriceData,
    PriceHistory,
    Info,
}

impl Column {
    pub const ALL: [Column; 14] = [
        Column::Name,
        Column::Year,
        Column::Price,
        Column::Msrp,
        Column::Status,
        Column::Preowned,
        Column::Receipt,
        Column::LastService,
        Column::Mileage,
        Column::Component,
        Column::City,
        Column::PriceData,
        Column::PriceHistory,
        Column::Info,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Year => "Year",
            Column::Price => "Current Price",
            Column::Msrp => "MSRP",
            Column::Status => "Status",
            Column::Preowned => "Preowned",
            Column::Receipt => "Receipt",
            Column::LastService => "Last Service",
            Column::Mileage => "Mileage",
            Column::Component => "Component",
            Column::City => "City",
            Column::PriceData => "Price Data",
            Column::PriceHistory => "Price History",
            Column::Info => "Info",
        }
    }

    /// Query-string name.
    pub fn key(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Year => "year",
            Column::Price => "price",
            Column::Msrp => "msrp",
            Column::Status => "status",
            Column::Preowned => "preowned",
            Column::Receipt => "receipt",
            Column::LastService => "last_service",
            Column::Mileage => "mileage",
            Column::Component => "component",
            Column::City => "city",
            Column::PriceData => "price_data",
            Column::PriceHistory => "price_history",
            Column::Info => "info",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    /// Plain-text value of the cell, used for sorting and exports.
    pub fn text(self, record: &BikeRecord) -> String {
        match self {
            Column::Name => record.name().to_string(),
            Column::Year => field_text(record, "year"),
            Column::Price => record.price.map(format_number).unwrap_or_default(),
            Column::Msrp => field_text(record, "msrp"),
            Column::Status => record.status.to_string(),
            Column::Preowned => yes_no(record, "preowned").to_string(),
            Column::Receipt => yes_no(record, "receipt_present").to_string(),
            Column::LastService => field_text(record, "last_service_code"),
            Column::Mileage => field_text(record, "mileage_code"),
            Column::Component => component_text(record),
            Column::City => field_text(record, "city"),
            Column::PriceData => field_text(record, "created_at"),
            Column::PriceHistory => record.price_history.len().to_string(),
            Column::Info => field_text(record, "info"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn key(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn from_key(key: &str) -> Self {
        if key.eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: Column,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn parse(column: Option<&str>, direction: Option<&str>) -> Option<Self> {
        Some(Self {
            column: Column::from_key(column?)?,
            direction: direction.map(SortDirection::from_key).unwrap_or_default(),
        })
    }

    /// Direction a header link for `column` should request: the active
    /// ascending column flips to descending, anything else starts ascending.
    pub fn next_direction(current: Option<SortSpec>, column: Column) -> SortDirection {
        match current {
            Some(spec) if spec.column == column && spec.direction == SortDirection::Asc => {
                SortDirection::Desc
            }
            _ => SortDirection::Asc,
        }
    }
}

/// Stable sort; rows with equal keys keep state order.
pub fn sort_rows(rows: &mut [&BikeRecord], spec: SortSpec) {
    rows.sort_by(|a, b| {
        let ord = compare_cells(&spec.column.text(a), &spec.column.text(b));
        match spec.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

/// Numbers order numerically and come before any text; text compares
/// case-insensitively. Keeping the two groups apart makes the order total.
pub fn compare_cells(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.trim(), b.trim());
    match (finite_number(a), finite_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

fn finite_number(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn field_text(record: &BikeRecord, key: &str) -> String {
    match record.field(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => (if *b { "Yes" } else { "No" }).to_string(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

pub fn yes_no(record: &BikeRecord, key: &str) -> &'static str {
    let truthy = match record.field(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => !s.is_empty() && s != "0",
        _ => false,
    };
    if truthy {
        "Yes"
    } else {
        "No"
    }
}

pub fn component_text(record: &BikeRecord) -> String {
    let Some(component) = record.field("component") else {
        return "N/A".to_string();
    };
    match component.get("name").and_then(Value::as_str) {
        Some(name) => match component.get("id") {
            Some(id) if !id.is_null() => format!("{name} (ID: {})", id_text(id)),
            _ => name.to_string(),
        },
        None => "N/A".to_string(),
    }
}

fn id_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Whole prices print without a fractional part.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(raw: Value) -> BikeRecord {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn numeric_cells_sort_numerically() {
        assert_eq!(compare_cells("900", "1000"), Ordering::Less);
        assert_eq!(compare_cells("abc", "ABD"), Ordering::Less);
        assert_eq!(compare_cells("2023", "n/a"), Ordering::Less);
        assert_eq!(compare_cells("NaN", "5"), Ordering::Greater);
    }

    #[test]
    fn mixed_cells_order_is_transitive() {
        assert_eq!(compare_cells("9", "10"), Ordering::Less);
        assert_eq!(compare_cells("10", "1a"), Ordering::Less);
        assert_eq!(compare_cells("9", "1a"), Ordering::Less);

        let mut cells = vec!["1a", "10", "b", "9", "", "2.5"];
        cells.sort_by(|a, b| compare_cells(a, b));
        assert_eq!(cells, vec!["2.5", "9", "10", "", "1a", "b"]);
    }

    #[test]
    fn rows_sort_by_price_in_both_directions() {
        let a = record(json!({ "id": "a", "price": 1500 }));
        let b = record(json!({ "id": "b", "price": 900 }));
        let c = record(json!({ "id": "c", "price": 12000 }));

        let mut rows = vec![&a, &b, &c];
        sort_rows(
            &mut rows,
            SortSpec {
                column: Column::Price,
                direction: SortDirection::Asc,
            },
        );
        assert_eq!(rows.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["b", "a", "c"]);

        sort_rows(
            &mut rows,
            SortSpec {
                column: Column::Price,
                direction: SortDirection::Desc,
            },
        );
        assert_eq!(rows.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["c", "a", "b"]);
    }

    #[test]
    fn header_link_toggles_only_the_active_column() {
        let active = SortSpec::parse(Some("year"), Some("asc"));
        assert_eq!(SortSpec::next_direction(active, Column::Year), SortDirection::Desc);
        assert_eq!(SortSpec::next_direction(active, Column::City), SortDirection::Asc);

        let desc = SortSpec::parse(Some("year"), Some("desc"));
        assert_eq!(SortSpec::next_direction(desc, Column::Year), SortDirection::Asc);
        assert_eq!(SortSpec::parse(Some("bogus"), None), None);
    }

    #[test]
    fn cell_text_reads_vendor_fields() {
        let r = record(json!({
            "id": "1",
            "price": 2499.0,
            "year": 2023,
            "preowned": true,
            "component": { "id": 77, "name": "Shimano XT" }
        }));

        assert_eq!(Column::Price.text(&r), "2499");
        assert_eq!(Column::Year.text(&r), "2023");
        assert_eq!(Column::Preowned.text(&r), "Yes");
        assert_eq!(Column::Receipt.text(&r), "No");
        assert_eq!(Column::Component.text(&r), "Shimano XT (ID: 77)");
        assert_eq!(Column::City.text(&r), "");
    }
}
