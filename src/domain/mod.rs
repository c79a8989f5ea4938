pub mod bike;
pub mod columns;
pub mod history;
pub mod lenient;
pub mod reconcile;
pub mod state;

pub use bike::{BikeRecord, BikeStatus};
pub use reconcile::{reconcile, reconcile_with_report, ReconcileReport};
pub use state::PersistedState;
