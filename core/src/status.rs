//! Payment lifecycle status resolution and the administrative
//! final-status override.
//!
//! The visible status separates three unpaid situations:
//!   - `Past Due`: no automatic retry running, a human payment is awaited
//!   - `Payment Issue`: an automatic retry schedule is mid-flight
//!   - `Payment Failed`: the schedule is spent, a human must act
//! A manual override always wins over the computed state, but the
//! computed state keeps being tracked beneath it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status derived from due date, failure history, and the retry schedule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ComputedStatus {
    Current,
    #[serde(rename = "Past Due")]
    PastDue,
    #[serde(rename = "Payment Issue")]
    PaymentIssue,
    #[serde(rename = "Payment Failed")]
    PaymentFailed,
}

impl fmt::Display for ComputedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ComputedStatus::Current => "Current",
            ComputedStatus::PastDue => "Past Due",
            ComputedStatus::PaymentIssue => "Payment Issue",
            ComputedStatus::PaymentFailed => "Payment Failed",
        };
        f.write_str(label)
    }
}

/// Terminal classifications an administrator can apply by hand.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OverrideStatus {
    Suspended,
    Canceled,
    #[serde(rename = "In Collections")]
    InCollections,
    #[serde(rename = "Written Off")]
    WrittenOff,
}

impl fmt::Display for OverrideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OverrideStatus::Suspended => "Suspended",
            OverrideStatus::Canceled => "Canceled",
            OverrideStatus::InCollections => "In Collections",
            OverrideStatus::WrittenOff => "Written Off",
        };
        f.write_str(label)
    }
}

/// The resolved status. Exactly one status is visible at a time; an
/// override displays in place of the computed state without erasing
/// it, so clearing the override falls straight back to `underlying`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Computed(ComputedStatus),
    Overridden {
        status: OverrideStatus,
        underlying: ComputedStatus,
    },
}

impl PaymentStatus {
    pub fn is_overridden(&self) -> bool {
        matches!(self, PaymentStatus::Overridden { .. })
    }

    /// The computed state, whether or not an override sits on top.
    pub fn underlying(&self) -> ComputedStatus {
        match self {
            PaymentStatus::Computed(status) => *status,
            PaymentStatus::Overridden { underlying, .. } => *underlying,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Computed(status) => status.fmt(f),
            PaymentStatus::Overridden { status, .. } => status.fmt(f),
        }
    }
}

/// A manually applied terminal annotation. Created and cleared by
/// administrative action outside the engine; the engine reads it as
/// an opaque input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalStatusOverride {
    pub status:     OverrideStatus,
    pub note:       Option<String>,
    pub applied_by: Option<String>,
    pub applied_on: Option<NaiveDate>,
}

impl FinalStatusOverride {
    pub fn new(status: OverrideStatus) -> Self {
        Self {
            status,
            note: None,
            applied_by: None,
            applied_on: None,
        }
    }
}

/// Resolve the visible status. First match wins:
/// 1. a manual override is terminal and returned verbatim
/// 2. not overdue means `Current`
/// 3. mid retry schedule means `Payment Issue`
/// 4. schedule exhausted means `Payment Failed`
/// 5. otherwise `Past Due`
pub fn resolve_payment_status(
    days_overdue: u32,
    failed_attempts: u32,
    is_actively_retrying: bool,
    final_override: Option<&FinalStatusOverride>,
    max_attempts: u32,
) -> PaymentStatus {
    let underlying = if days_overdue == 0 {
        ComputedStatus::Current
    } else if is_actively_retrying {
        ComputedStatus::PaymentIssue
    } else if failed_attempts >= max_attempts {
        ComputedStatus::PaymentFailed
    } else {
        ComputedStatus::PastDue
    };

    match final_override {
        Some(o) => PaymentStatus::Overridden {
            status: o.status,
            underlying,
        },
        None => PaymentStatus::Computed(underlying),
    }
}
