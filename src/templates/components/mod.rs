use crate::domain::history::PriceHistory;
use crate::domain::columns::format_number;
use chrono::{DateTime, NaiveDateTime, Utc};
use maud::{html, Markup};

pub mod error;

pub use error::error_page;

pub fn tag(text: &str) -> Markup {
    let class = match text {
        "Yes" | "available" => "tag tag-green",
        "No" | "sold" => "tag tag-red",
        _ => "tag",
    };
    html! {
        span class=(class) { (text) }
    }
}

pub fn price_history_list(history: &PriceHistory) -> Markup {
    html! {
        @if history.is_empty() {
            "No history available"
        } @else {
            ul {
                @for entry in history.entries() {
                    li class=[entry.is_sold_marker().then_some("sold")] {
                        (format_number(entry.price)) " on " (format_timestamp(&entry.timestamp))
                        @if entry.is_sold_marker() {
                            " " (tag("sold"))
                        }
                    }
                }
            }
        }
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%d/%m/%Y %H:%M:%S").to_string()
}

/// Formats a vendor date string; unknown formats are shown as-is.
pub fn format_vendor_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return format_timestamp(&dt.with_timezone(&Utc));
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        Ok(naive) => naive.format("%d/%m/%Y %H:%M:%S").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_dates_are_normalised() {
        assert_eq!(format_vendor_date("2024-03-05T14:02:09Z"), "05/03/2024 14:02:09");
        assert_eq!(format_vendor_date("2024-03-05 14:02:09"), "05/03/2024 14:02:09");
        assert_eq!(format_vendor_date("yesterday"), "yesterday");
    }
}
