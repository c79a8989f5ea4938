pub mod export_xlsx;

pub use export_xlsx::bikes_workbook;
