//! Per-record enrichment: derive aging, status, and schedule fields
//! from a raw record snapshot.
//!
//! Derived fields are never the system of record. Callers re-enrich
//! whenever the underlying data changes or time advances.

use crate::{
    aging::{self, AgingClass},
    policy::{RetryPolicy, RetrySettings},
    record::MonetaryRecord,
    schedule,
    status::{self, ComputedStatus, PaymentStatus},
};
use chrono::NaiveDate;

/// A record decorated with everything the reporting views need.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub record:          MonetaryRecord,
    pub aging:           AgingClass,
    pub days_overdue:    u32,
    pub status:          PaymentStatus,
    pub next_retry_on:   Option<NaiveDate>,
    pub next_reminder_on: Option<NaiveDate>,
}

/// An automatic retry is mid-flight: retries are enabled, the record
/// has a payment method to charge, at least one attempt has failed,
/// and the schedule still has attempts left. A record with no payment
/// method is awaiting a manual payment and never retries.
fn is_actively_retrying(record: &MonetaryRecord, policy: &RetryPolicy, enabled: bool) -> bool {
    enabled
        && !record.settled
        && record.payment_method.is_some()
        && record.failed_attempts > 0
        && !schedule::is_exhausted(record.failed_attempts, policy)
}

/// Compute every derived field for one record at `now`.
pub fn enrich(record: &MonetaryRecord, settings: &RetrySettings, now: NaiveDate) -> EnrichedRecord {
    let aging = aging::classify(record.due_date, now);
    let days_overdue = aging.days_overdue();

    let policy = record.applicable_policy(settings);
    let actively_retrying = is_actively_retrying(record, policy, settings.enabled);

    let status = if record.settled {
        PaymentStatus::Computed(ComputedStatus::Current)
    } else {
        status::resolve_payment_status(
            days_overdue,
            record.failed_attempts,
            actively_retrying,
            record.final_status.as_ref(),
            policy.max_attempts(),
        )
    };

    // Next automatic attempt: number failed_attempts + 1, anchored on
    // the last attempt (the due date when nothing has run yet).
    let next_retry_on = if actively_retrying {
        record
            .last_attempt_on
            .or(record.due_date)
            .and_then(|anchor| {
                schedule::next_attempt_date(policy, record.failed_attempts + 1, anchor)
            })
    } else {
        None
    };

    // Reminders only chase an unpaid, overdue balance.
    let next_reminder_on = if record.settled || days_overdue == 0 {
        None
    } else {
        record
            .last_reminder_on
            .or(record.due_date)
            .and_then(|anchor| {
                schedule::next_reminder_date(
                    policy,
                    &record.reminder_phase,
                    record.reminders_suspended,
                    anchor,
                )
            })
    };

    EnrichedRecord {
        record: record.clone(),
        aging,
        days_overdue,
        status,
        next_retry_on,
        next_reminder_on,
    }
}

/// Enrich a whole snapshot in input order.
pub fn enrich_all(
    records: &[MonetaryRecord],
    settings: &RetrySettings,
    now: NaiveDate,
) -> Vec<EnrichedRecord> {
    records.iter().map(|r| enrich(r, settings, now)).collect()
}
