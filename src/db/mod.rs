pub mod connection;
pub mod fetch_runs;
pub mod storage;

pub use connection::{init_db, Database};
