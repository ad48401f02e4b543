//! The shared record shape for subscriptions and invoices, plus the
//! pure administrative merges (final-status override, reminder
//! suspension). Persistence of the merged record stays with the caller.

use crate::{
    policy::{RetryPolicy, RetrySettings},
    schedule::Phase,
    status::{FinalStatusOverride, OverrideStatus},
    types::{ClientId, Money, RecordId},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Subscription,
    Invoice,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ClientType {
    Business,
    Individual,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    #[serde(rename = "ACH")]
    Ach,
    #[serde(rename = "Credit Card")]
    CreditCard,
    Wire,
    Check,
    PayPal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    Failed,
    Pending,
}

/// One entry in a record's payment history.
/// `retry_number` 0 is the initial charge, 1 the first retry, and so on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentAttempt {
    pub attempted_on:   NaiveDate,
    pub amount:         Money,
    pub outcome:        AttemptOutcome,
    pub failure_reason: Option<String>,
    pub retry_number:   u32,
}

/// The snapshot the engine computes over. One shape covers both
/// subscriptions and invoices; `kind` tells them apart where the
/// rules differ (which amount counts as owed).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonetaryRecord {
    pub id:          RecordId,
    pub client_id:   ClientId,
    pub client_name: String,
    pub client_type: ClientType,
    pub kind:        RecordKind,

    pub amount:         Money,
    pub due_date:       Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,

    pub failed_attempts: u32,
    pub last_attempt_on: Option<NaiveDate>,

    /// Tracked separately for subscriptions; invoices owe the full amount.
    pub overdue_amount: Option<Money>,
    /// Paid records drop out of status resolution and aggregation.
    pub settled: bool,

    pub retry_phase:         Phase,
    pub reminder_phase:      Phase,
    pub reminders_suspended: bool,
    pub suspension_note:     Option<String>,
    pub last_reminder_on:    Option<NaiveDate>,

    /// Per-record cadence override; wins over amount-based selection.
    pub custom_policy: Option<RetryPolicy>,
    pub final_status:  Option<FinalStatusOverride>,

    #[serde(default)]
    pub history: Vec<PaymentAttempt>,
}

impl MonetaryRecord {
    pub fn new(
        kind: RecordKind,
        id: impl Into<RecordId>,
        client_id: impl Into<ClientId>,
        client_name: impl Into<String>,
        client_type: ClientType,
        amount: Money,
        due_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: id.into(),
            client_id: client_id.into(),
            client_name: client_name.into(),
            client_type,
            kind,
            amount,
            due_date,
            payment_method: None,
            failed_attempts: 0,
            last_attempt_on: None,
            overdue_amount: None,
            settled: false,
            retry_phase: Phase::default(),
            reminder_phase: Phase::default(),
            reminders_suspended: false,
            suspension_note: None,
            last_reminder_on: None,
            custom_policy: None,
            final_status: None,
            history: Vec::new(),
        }
    }

    /// The amount this record currently contributes to receivables.
    /// Subscriptions use their tracked overdue amount when one is
    /// recorded; invoices always owe the full amount due.
    pub fn amount_owed(&self) -> Money {
        match self.kind {
            RecordKind::Subscription => match self.overdue_amount {
                Some(owed) if owed > 0.0 => owed,
                _ => self.amount,
            },
            RecordKind::Invoice => self.amount,
        }
    }

    /// The cadence governing this record: its own custom policy if one
    /// is set, otherwise the amount-based selection from settings.
    pub fn applicable_policy<'a>(&'a self, settings: &'a RetrySettings) -> &'a RetryPolicy {
        match &self.custom_policy {
            Some(policy) => policy,
            None => settings.policy_for_amount(self.amount),
        }
    }

    /// Pure merge: the returned record carries the override, the
    /// stored computed state is untouched. Writing it back is the
    /// caller's job.
    pub fn apply_final_status_override(
        mut self,
        status: OverrideStatus,
        note: Option<String>,
        applied_by: Option<String>,
        applied_on: Option<NaiveDate>,
    ) -> Self {
        self.final_status = Some(FinalStatusOverride {
            status,
            note,
            applied_by,
            applied_on,
        });
        self
    }

    /// Pure merge: drop the override so the next resolution pass shows
    /// the computed status again.
    pub fn clear_final_status_override(mut self) -> Self {
        self.final_status = None;
        self
    }

    /// Pure merge: pause reminders without touching the reminder
    /// counter. Resuming continues from the same index.
    pub fn suspend_reminders(mut self, note: Option<String>) -> Self {
        self.reminders_suspended = true;
        self.suspension_note = note;
        self
    }

    pub fn resume_reminders(mut self) -> Self {
        self.reminders_suspended = false;
        self.suspension_note = None;
        self
    }
}
