// src/domain/reconcile.rs

use crate::domain::bike::{BikeRecord, BikeStatus};
use crate::domain::history::PriceHistory;
use crate::domain::state::PersistedState;
use crate::scraper::models::{Listing, PriceLog};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// What a single reconciliation did, for logging and the fetch-run log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub new: usize,
    pub repriced: usize,
    pub unchanged: usize,
    pub reactivated: usize,
    pub sold: usize,
}

impl ReconcileReport {
    pub fn seen(&self) -> usize {
        self.new + self.repriced + self.unchanged + self.reactivated
    }
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} new, {} repriced, {} unchanged, {} reactivated, {} sold",
            self.new, self.repriced, self.unchanged, self.reactivated, self.sold
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Observation {
    New,
    Repriced,
    Unchanged,
    Reactivated,
}

/// Merges a complete snapshot into the prior state.
///
/// The snapshot is treated as exhaustive: any known id missing from it is
/// marked sold. Nothing already recorded is removed.
pub fn reconcile(
    prior: &PersistedState,
    snapshot: &[Listing],
    shop_base_url: &str,
    now: DateTime<Utc>,
) -> PersistedState {
    reconcile_with_report(prior, snapshot, shop_base_url, now).0
}

pub fn reconcile_with_report(
    prior: &PersistedState,
    snapshot: &[Listing],
    shop_base_url: &str,
    now: DateTime<Utc>,
) -> (PersistedState, ReconcileReport) {
    let mut next = prior.clone();
    let mut report = ReconcileReport::default();
    // Duplicate ids: every occurrence is merged against the prior record and
    // the last one wins.
    let mut observations: HashMap<&str, Observation> = HashMap::new();

    for listing in snapshot {
        let (history, observation) = merge_observation(prior.get(&listing.id), listing, now);
        next.insert(BikeRecord::from_listing(
            listing,
            shop_base_url,
            history,
            BikeStatus::Available,
        ));
        observations.insert(listing.id.as_str(), observation);
    }

    for observation in observations.values() {
        match observation {
            Observation::New => report.new += 1,
            Observation::Repriced => report.repriced += 1,
            Observation::Unchanged => report.unchanged += 1,
            Observation::Reactivated => report.reactivated += 1,
        }
    }

    let present: HashSet<&str> = observations.keys().copied().collect();
    let absent: Vec<String> = prior
        .ids()
        .filter(|id| !present.contains(id))
        .map(str::to_string)
        .collect();

    for id in absent {
        if let Some(record) = next.get_mut(&id) {
            if mark_sold(record, now) {
                report.sold += 1;
            }
        }
    }

    (next, report)
}

fn merge_observation(
    existing: Option<&BikeRecord>,
    listing: &Listing,
    now: DateTime<Utc>,
) -> (PriceHistory, Observation) {
    let Some(existing) = existing else {
        let mut history = PriceHistory::new();
        if let Some(price) = listing.price {
            history.record(price, now);
        }
        return (history, Observation::New);
    };

    let mut history = existing.price_history.clone();

    if existing.is_sold() {
        if let Some(price) = listing.price {
            history.record_unconditionally(price, now);
        }
        return (history, Observation::Reactivated);
    }

    let before = history.len();
    if let Some(log) = listing.price_log() {
        apply_price_log(&mut history, log, now);
    }
    if let Some(price) = listing.price {
        history.record(price, now);
    }

    let observation = if history.len() > before {
        Observation::Repriced
    } else {
        Observation::Unchanged
    };
    (history, observation)
}

/// Back-fills a change the vendor saw between our fetches. The true time of
/// the change is unknown, so both points carry `now`.
fn apply_price_log(history: &mut PriceHistory, log: PriceLog, now: DateTime<Utc>) {
    let Some(last) = history.last_price() else {
        return;
    };
    // The vendor keeps the log around after we have recorded the new price.
    if last == log.new_price {
        return;
    }
    history.record(log.old_price, now);
    history.record(log.new_price, now);
}

/// Returns false if the record was already sold.
fn mark_sold(record: &mut BikeRecord, now: DateTime<Utc>) -> bool {
    if record.is_sold() {
        return false;
    }
    if let Some(price) = record.last_known_price() {
        record.price_history.mark_sold(price, now);
    }
    record.status = BikeStatus::Sold;
    true
}
