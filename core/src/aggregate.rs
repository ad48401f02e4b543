//! Portfolio-wide aging aggregation for reporting views.
//!
//! Single pass over the combined subscription and invoice set.
//! One malformed record never aborts the scan: records with no due
//! date are counted under `unscheduled` and kept out of the
//! receivable totals.

use crate::{
    aging::{self, AgingBucket, AgingClass},
    record::MonetaryRecord,
    types::Money,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct BucketTotals {
    pub count:  u32,
    pub amount: Money,
}

impl BucketTotals {
    fn add(&mut self, amount: Money) {
        self.count += 1;
        self.amount += amount;
    }
}

/// Per-bucket counts and amounts plus portfolio totals.
///
/// Invariants: `total_accounts_receivable` equals the sum of all
/// scheduled bucket amounts (including Current), `total_overdue`
/// equals that sum minus the Current bucket, and the percentage is 0
/// when there are no receivables.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgingSummary {
    pub current:      BucketTotals,
    pub days_1_30:    BucketTotals,
    pub days_31_60:   BucketTotals,
    pub days_61_90:   BucketTotals,
    pub days_90_plus: BucketTotals,

    /// Records with no due date: visible in the report, outside AR.
    pub unscheduled: BucketTotals,

    pub total_accounts_receivable: Money,
    pub total_overdue:             Money,
    pub overdue_percentage:        f64,
}

impl AgingSummary {
    pub fn bucket(&self, bucket: AgingBucket) -> &BucketTotals {
        match bucket {
            AgingBucket::Current => &self.current,
            AgingBucket::Days1To30 => &self.days_1_30,
            AgingBucket::Days31To60 => &self.days_31_60,
            AgingBucket::Days61To90 => &self.days_61_90,
            AgingBucket::Days90Plus => &self.days_90_plus,
        }
    }

    fn bucket_mut(&mut self, bucket: AgingBucket) -> &mut BucketTotals {
        match bucket {
            AgingBucket::Current => &mut self.current,
            AgingBucket::Days1To30 => &mut self.days_1_30,
            AgingBucket::Days31To60 => &mut self.days_31_60,
            AgingBucket::Days61To90 => &mut self.days_61_90,
            AgingBucket::Days90Plus => &mut self.days_90_plus,
        }
    }
}

/// Bucket every open record at `now` and accumulate totals.
/// Pure in its inputs: calling it twice with the same snapshot and the
/// same `now` returns identical output.
pub fn aggregate(
    subscriptions: &[MonetaryRecord],
    invoices: &[MonetaryRecord],
    now: NaiveDate,
) -> AgingSummary {
    let mut summary = AgingSummary::default();

    for record in subscriptions.iter().chain(invoices) {
        if record.settled {
            continue;
        }

        let amount = record.amount_owed();
        match aging::classify(record.due_date, now) {
            AgingClass::Unscheduled => {
                log::warn!(
                    "aging: record {} has no due date, counted as unscheduled",
                    record.id
                );
                summary.unscheduled.add(amount);
            }
            AgingClass::Aged { bucket, .. } => {
                summary.bucket_mut(bucket).add(amount);
                summary.total_accounts_receivable += amount;
                if bucket != AgingBucket::Current {
                    summary.total_overdue += amount;
                }
            }
        }
    }

    if summary.total_accounts_receivable > 0.0 {
        summary.overdue_percentage =
            summary.total_overdue / summary.total_accounts_receivable * 100.0;
    }

    summary
}
