//! Aging classification: days-overdue computation and bucket mapping.
//!
//! RULE: `now` is always a parameter. Nothing here reads the system
//! clock; two calls with the same inputs return the same answer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whole days past the due date, clamped to zero.
/// A future due date is simply not overdue yet.
pub fn days_overdue(due_date: NaiveDate, now: NaiveDate) -> u32 {
    let days = now.signed_duration_since(due_date).num_days();
    days.max(0) as u32
}

/// The five reporting buckets. Contiguous and non-overlapping over
/// non-negative days-overdue: every day count lands in exactly one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgingBucket {
    Current,
    #[serde(rename = "1-30")]
    Days1To30,
    #[serde(rename = "31-60")]
    Days31To60,
    #[serde(rename = "61-90")]
    Days61To90,
    #[serde(rename = "90+")]
    Days90Plus,
}

impl AgingBucket {
    pub const ALL: [AgingBucket; 5] = [
        AgingBucket::Current,
        AgingBucket::Days1To30,
        AgingBucket::Days31To60,
        AgingBucket::Days61To90,
        AgingBucket::Days90Plus,
    ];

    /// The report label, as shown in aging tables.
    pub fn label(&self) -> &'static str {
        match self {
            AgingBucket::Current => "Current",
            AgingBucket::Days1To30 => "1-30",
            AgingBucket::Days31To60 => "31-60",
            AgingBucket::Days61To90 => "61-90",
            AgingBucket::Days90Plus => "90+",
        }
    }
}

impl fmt::Display for AgingBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a days-overdue count to its bucket. Bounds are inclusive on
/// both ends of each named range.
pub fn classify_bucket(days_overdue: u32) -> AgingBucket {
    match days_overdue {
        0 => AgingBucket::Current,
        1..=30 => AgingBucket::Days1To30,
        31..=60 => AgingBucket::Days31To60,
        61..=90 => AgingBucket::Days61To90,
        _ => AgingBucket::Days90Plus,
    }
}

/// A record with no due date cannot be aged. That is a state the
/// caller must see, never a silent `Current`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgingClass {
    Unscheduled,
    Aged { days_overdue: u32, bucket: AgingBucket },
}

impl AgingClass {
    pub fn bucket(&self) -> Option<AgingBucket> {
        match self {
            AgingClass::Unscheduled => None,
            AgingClass::Aged { bucket, .. } => Some(*bucket),
        }
    }

    pub fn days_overdue(&self) -> u32 {
        match self {
            AgingClass::Unscheduled => 0,
            AgingClass::Aged { days_overdue, .. } => *days_overdue,
        }
    }
}

/// Classify a possibly-unscheduled record.
pub fn classify(due_date: Option<NaiveDate>, now: NaiveDate) -> AgingClass {
    match due_date {
        None => AgingClass::Unscheduled,
        Some(due) => {
            let days = days_overdue(due, now);
            AgingClass::Aged {
                days_overdue: days,
                bucket: classify_bucket(days),
            }
        }
    }
}
