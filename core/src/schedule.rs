//! Retry and reminder schedule computation.
//!
//! Both schedules share one shape: attempt 1 is anchored on the due
//! date (or initial failure date), attempt n on the date of attempt
//! n-1. They run on separate counters, so exhausted retries and
//! exhausted reminders are independent facts about a record.

use crate::policy::RetryPolicy;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date of attempt `attempt_number` (1-based). `anchor` is the due
/// date for attempt 1 and the previous attempt's date after that.
/// None once the schedule is spent.
pub fn next_attempt_date(
    policy: &RetryPolicy,
    attempt_number: u32,
    anchor: NaiveDate,
) -> Option<NaiveDate> {
    let offset = policy.offset_for_attempt(attempt_number)?;
    anchor.checked_add_days(Days::new(u64::from(offset)))
}

/// True once every attempt in the policy has been made.
pub fn is_exhausted(attempts_made: u32, policy: &RetryPolicy) -> bool {
    attempts_made >= policy.max_attempts()
}

/// One counter sub-state-machine. A record carries two of these, one
/// for automatic payment retries and one for reminder emails, each
/// advanced and exhausted on its own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Phase {
    pub current: u32,
    pub total:   u32,
}

impl Phase {
    pub fn new(total: u32) -> Self {
        Self { current: 0, total }
    }

    /// One step forward, saturating at `total`.
    pub fn advance(self) -> Self {
        Self {
            current: (self.current + 1).min(self.total),
            ..self
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.current >= self.total
    }

    pub fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.current)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::new(RetryPolicy::MAX_ATTEMPTS)
    }
}

/// Next reminder date against the reminder counter. Suspension
/// freezes the counter without resetting it: no date while suspended,
/// and resuming continues from the same index.
pub fn next_reminder_date(
    policy: &RetryPolicy,
    phase: &Phase,
    suspended: bool,
    anchor: NaiveDate,
) -> Option<NaiveDate> {
    if suspended || phase.is_exhausted() {
        return None;
    }
    next_attempt_date(policy, phase.current + 1, anchor)
}
