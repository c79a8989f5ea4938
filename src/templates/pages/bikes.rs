// templates/pages/bikes.rs

use crate::db::fetch_runs::FetchRun;
use crate::domain::columns::{self, Column, SortSpec};
use crate::domain::BikeRecord;
use crate::templates::components::{format_timestamp, format_vendor_date, price_history_list, tag};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct BikesVm<'a> {
    /// Already in display order.
    pub rows: Vec<&'a BikeRecord>,
    pub sort: Option<SortSpec>,
    pub runs: &'a [FetchRun],
}

pub fn bikes_page(vm: &BikesVm) -> Markup {
    desktop_layout(
        "Bikes",
        html! {
            main {
                form action="/fetch" method="post" {
                    button type="submit" { "Fetch data" }
                }

                @if vm.rows.is_empty() {
                    p { "No bike data found. Fetch data to start tracking." }
                } @else {
                    p { "Tracking " strong { (vm.rows.len()) } " bikes." }
                    (bikes_table(vm))
                }

                (fetch_runs_section(vm.runs))
            }
        },
    )
}

pub fn bikes_table(vm: &BikesVm) -> Markup {
    html! {
        table id="bike-data" {
            thead {
                tr {
                    @for column in Column::ALL {
                        (header_cell(column, vm.sort))
                    }
                }
            }
            tbody {
                @for bike in &vm.rows {
                    (bike_row(bike))
                }
            }
        }
    }
}

fn header_cell(column: Column, sort: Option<SortSpec>) -> Markup {
    let next = SortSpec::next_direction(sort, column);
    let href = format!("/?sort={}&dir={}", column.key(), next.key());
    let arrow = sort
        .filter(|s| s.column == column)
        .map(|s| s.direction.arrow());

    html! {
        th {
            a href=(href) {
                (column.label())
                @if let Some(arrow) = arrow {
                    " " (arrow)
                }
            }
        }
    }
}

fn bike_row(bike: &BikeRecord) -> Markup {
    let formatted_price = columns::field_text(bike, "price_converted_formatted");
    let formatted_msrp = columns::field_text(bike, "msrp_converted_formatted");

    html! {
        tr class=[bike.is_sold().then_some("sold")] {
            td {
                @match &bike.url {
                    Some(url) => a href=(url) target="_blank" { (bike.name()) },
                    None => { (bike.name()) },
                }
                @if let Some(image_url) = &bike.image_url {
                    img src=(image_url) width="100" style="display:block;margin-top:5px" alt="";
                }
            }
            td { (Column::Year.text(bike)) }
            td {
                (formatted_price) " "
                i { "(" (Column::Price.text(bike)) " €)" }
            }
            td { s { (formatted_msrp) } }
            td { (tag(bike.status.as_str())) }
            td { (tag(&Column::Preowned.text(bike))) }
            td { (tag(&Column::Receipt.text(bike))) }
            td { (Column::LastService.text(bike)) }
            td { (Column::Mileage.text(bike)) }
            td { (Column::Component.text(bike)) }
            td { (Column::City.text(bike)) }
            td { (price_data(bike)) }
            td { (price_history_list(&bike.price_history)) }
            td {
                @let info = Column::Info.text(bike);
                @if !info.is_empty() {
                    details {
                        summary { "Show Info" }
                        div { (info) }
                    }
                }
            }
        }
    }
}

fn price_data(bike: &BikeRecord) -> Markup {
    let date = |key: &str| {
        let raw = columns::field_text(bike, key);
        if raw.is_empty() {
            raw
        } else {
            format_vendor_date(&raw)
        }
    };

    html! {
        div { "Created: " (date("created_at")) }
        div { "Changed: " (date("price_changed_at")) }
        div { "Updated: " (date("updated_at")) }
        div { "Sold: " (date("sold_date")) }
    }
}

fn fetch_runs_section(runs: &[FetchRun]) -> Markup {
    html! {
        @if !runs.is_empty() {
            section {
                h3 { "Recent fetches" }
                ul {
                    @for run in runs {
                        li {
                            (format_timestamp(&run.started_at)) " · "
                            @if run.success {
                                (tag("Yes")) " " (run.summary.as_deref().unwrap_or(""))
                            } @else {
                                (tag("No")) " " (run.error_message.as_deref().unwrap_or("did not finish"))
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::columns::SortDirection;
    use serde_json::json;

    fn record(raw: serde_json::Value) -> BikeRecord {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn table_renders_links_history_and_sold_state() {
        let bike = record(json!({
            "id": "1",
            "name": "Orbea Rise M10",
            "price": 3100,
            "price_converted_formatted": "3 100 zł",
            "url": "https://buycycle.com/pl-pl/bike/rise-m10",
            "image_url": "https://cdn.example/1.jpg",
            "status": "sold",
            "info": "<b>unescaped?</b>",
            "price_history": [
                { "price": 3100, "timestamp": "2024-06-01T08:00:00Z" },
                { "price": 3100, "timestamp": "2024-06-02T08:00:00Z", "status": "sold" }
            ]
        }));
        let vm = BikesVm {
            rows: vec![&bike],
            sort: None,
            runs: &[],
        };

        let html = bikes_page(&vm).into_string();
        assert!(html.contains(r#"href="https://buycycle.com/pl-pl/bike/rise-m10""#));
        assert!(html.contains("3 100 zł"));
        assert!(html.contains("3100 on 01/06/2024 08:00:00"));
        assert!(html.contains(r#"<tr class="sold">"#));
        assert!(html.contains("&lt;b&gt;unescaped?&lt;/b&gt;"));
    }

    #[test]
    fn active_sort_column_shows_arrow_and_toggles() {
        let vm = BikesVm {
            rows: vec![],
            sort: Some(SortSpec {
                column: Column::Price,
                direction: SortDirection::Asc,
            }),
            runs: &[],
        };

        let html = bikes_table(&vm).into_string();
        assert!(html.contains("/?sort=price&amp;dir=desc"));
        assert!(html.contains("Current Price ▲"));
        assert!(html.contains("/?sort=year&amp;dir=asc"));
    }

    #[test]
    fn empty_state_renders_hint_instead_of_table() {
        let vm = BikesVm {
            rows: vec![],
            sort: None,
            runs: &[],
        };
        let html = bikes_page(&vm).into_string();
        assert!(html.contains("No bike data found"));
        assert!(!html.contains("bike-data"));
    }
}
