use crate::domain::columns::{format_number, Column};
use crate::domain::BikeRecord;
use crate::errors::AppError;
use crate::templates::components::format_timestamp;
use rust_xlsxwriter::Workbook;

/// Spreadsheet with one row per tracked bike, in the order given.
pub fn bikes_workbook(rows: &[&BikeRecord]) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet
        .write_string(0, 0, "ID")
        .map_err(|e| AppError::Xlsx(format!("Failed to write header 'ID': {e}")))?;
    worksheet
        .write_string(0, 1, "URL")
        .map_err(|e| AppError::Xlsx(format!("Failed to write header 'URL': {e}")))?;
    for (i, column) in Column::ALL.iter().enumerate() {
        worksheet
            .write_string(0, (i + 2) as u16, column.label())
            .map_err(|e| {
                AppError::Xlsx(format!("Failed to write header '{}': {e}", column.label()))
            })?;
    }

    for (i, bike) in rows.iter().enumerate() {
        let r = (i + 1) as u32;

        worksheet.write_string(r, 0, &bike.id)?;
        worksheet.write_string(r, 1, bike.url.as_deref().unwrap_or(""))?;

        for (j, column) in Column::ALL.iter().enumerate() {
            let col = (j + 2) as u16;
            match column {
                Column::Price => match bike.price {
                    Some(price) => worksheet.write_number(r, col, price)?,
                    None => worksheet.write_string(r, col, "")?,
                },
                Column::PriceHistory => worksheet.write_string(r, col, history_text(bike))?,
                other => worksheet.write_string(r, col, other.text(bike))?,
            };
        }
    }

    let buffer = workbook
        .save_to_buffer()
        .map_err(|e| AppError::Xlsx(format!("Failed to save workbook: {e}")))?;

    Ok(buffer)
}

fn history_text(bike: &BikeRecord) -> String {
    bike.price_history
        .entries()
        .iter()
        .map(|e| {
            let marker = if e.is_sold_marker() { " (sold)" } else { "" };
            format!("{} on {}{marker}", format_number(e.price), format_timestamp(&e.timestamp))
        })
        .collect::<Vec<_>>()
        .join("; ")
}
