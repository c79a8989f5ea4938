// src/cycle.rs

//! One user-triggered fetch: pull a snapshot, merge it, persist it.

use crate::db::storage::{load_state, save_state};
use crate::db::{fetch_runs, Database};
use crate::domain::{reconcile_with_report, ReconcileReport};
use crate::errors::AppError;
use crate::scraper::models::Listing;
use crate::scraper::SnapshotSource;
use chrono::{DateTime, Utc};
use rusqlite::TransactionBehavior;
use serde_json::Value;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleOutcome {
    pub report: ReconcileReport,
    /// Raw entries dropped because they had no usable id.
    pub skipped: usize,
    pub tracked: usize,
}

/// Runs one fetch cycle.
///
/// A failed fetch leaves the stored state untouched. Reading, reconciling and
/// writing the state happen inside one immediate transaction so two cycles
/// can never interleave their read and write.
pub fn run_fetch_cycle(
    db: &Database,
    source: &dyn SnapshotSource,
    shop_base_url: &str,
    now: DateTime<Utc>,
) -> Result<CycleOutcome, AppError> {
    let run_id = db.with_conn(|conn| fetch_runs::start_fetch_run(conn, now))?;

    let result = fetch_and_merge(db, source, shop_base_url, now);

    match &result {
        Ok(outcome) => {
            info!(
                report = %outcome.report,
                skipped = outcome.skipped,
                tracked = outcome.tracked,
                "fetch cycle complete"
            );
            let summary = outcome.report.to_string();
            db.with_conn(|conn| {
                fetch_runs::finish_fetch_run(conn, run_id, Utc::now(), outcome.report.seen(), &summary)
            })?;
        }
        Err(e) => {
            warn!(error = %e, "fetch cycle failed, stored state left untouched");
            if let Err(log_err) =
                db.with_conn(|conn| fetch_runs::fail_fetch_run(conn, run_id, Utc::now(), &e.to_string()))
            {
                warn!(error = %log_err, "could not record failed fetch run");
            }
        }
    }

    result
}

fn fetch_and_merge(
    db: &Database,
    source: &dyn SnapshotSource,
    shop_base_url: &str,
    now: DateTime<Utc>,
) -> Result<CycleOutcome, AppError> {
    let raw = source.fetch_snapshot()?;
    let (listings, skipped) = decode_snapshot(raw);

    db.with_conn(|conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let prior = load_state(&tx)?;
        let (next, report) = reconcile_with_report(&prior, &listings, shop_base_url, now);
        save_state(&tx, &next)?;
        tx.commit()?;

        Ok(CycleOutcome {
            report,
            skipped,
            tracked: next.len(),
        })
    })
}

/// Decodes raw entries one by one; an entry that cannot be keyed is skipped
/// instead of failing the batch.
pub fn decode_snapshot(raw: Vec<Value>) -> (Vec<Listing>, usize) {
    let mut listings = Vec::with_capacity(raw.len());
    let mut skipped = 0;

    for (index, value) in raw.into_iter().enumerate() {
        match Listing::from_value(value) {
            Ok(listing) => listings.push(listing),
            Err(e) => {
                skipped += 1;
                warn!(index, error = %e, "skipping malformed listing");
            }
        }
    }

    (listings, skipped)
}
