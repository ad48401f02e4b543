//! Retry policy configuration: the default cadence, amount-based
//! overrides, and the selection rule.
//!
//! RULE: misconfiguration is rejected when settings are built, never
//! during per-record evaluation. `RetrySettings` is a validated value
//! object; by the time a record is scored, every threshold is distinct
//! and every offset is at least one day.

use crate::error::{DunningError, DunningResult};
use crate::types::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happens to a subscription once every retry has failed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FinalAction {
    Pause,
    Cancel,
    KeepActive,
}

impl FinalAction {
    pub fn description(&self) -> &'static str {
        match self {
            FinalAction::Pause => "Pause subscription until payment is resolved",
            FinalAction::Cancel => "Cancel subscription automatically",
            FinalAction::KeepActive => "Keep subscription active (manual follow-up required)",
        }
    }
}

impl fmt::Display for FinalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Cadence of the three automatic attempts. Each offset is relative
/// to the previous attempt (the due date for the first).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetryPolicy {
    pub retry1_days:  u32,
    pub retry2_days:  u32,
    pub retry3_days:  u32,
    pub final_action: FinalAction,
}

impl RetryPolicy {
    /// Fixed attempt count in this domain.
    pub const MAX_ATTEMPTS: u32 = 3;

    pub fn max_attempts(&self) -> u32 {
        Self::MAX_ATTEMPTS
    }

    /// Day offset for attempt `attempt_number` (1-based), relative to
    /// the previous attempt. None once the schedule is spent.
    pub fn offset_for_attempt(&self, attempt_number: u32) -> Option<u32> {
        match attempt_number {
            1 => Some(self.retry1_days),
            2 => Some(self.retry2_days),
            3 => Some(self.retry3_days),
            _ => None,
        }
    }

    /// Human-readable schedule, cumulative from the initial failure.
    pub fn schedule_description(&self) -> Vec<String> {
        let after_first = self.retry1_days;
        let after_second = after_first + self.retry2_days;
        let after_third = after_second + self.retry3_days;
        vec![
            format!("First retry: {after_first} days after initial failure"),
            format!("Second retry: {after_second} days after initial failure"),
            format!("Third retry: {after_third} days after initial failure"),
            format!("After all retries fail: {}", self.final_action.description()),
        ]
    }

    fn validate(&self) -> DunningResult<()> {
        let offsets = [
            (1, self.retry1_days),
            (2, self.retry2_days),
            (3, self.retry3_days),
        ];
        for (attempt, days) in offsets {
            if days == 0 {
                return Err(DunningError::InvalidRetryOffset { attempt });
            }
        }
        Ok(())
    }
}

/// A retry policy that applies to records at or above an amount
/// threshold, overriding the default cadence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AmountBasedRetryPolicy {
    /// Minimum amount for this policy to apply. Inclusive.
    pub threshold: Money,
    #[serde(flatten)]
    pub policy: RetryPolicy,
}

/// Raw settings as they appear on disk, before validation.
#[derive(Debug, Clone, Deserialize)]
struct RetrySettingsFile {
    enabled: bool,
    default_policy: RetryPolicy,
    #[serde(default)]
    amount_based_policies: Vec<AmountBasedRetryPolicy>,
    #[serde(default)]
    notify_admin_after_attempts: u32,
    #[serde(default)]
    notify_admin_emails: Vec<String>,
}

/// One default policy plus zero or more amount-based overrides.
/// Overrides are held sorted by descending threshold, so selection is
/// a first match and the largest threshold the amount meets wins.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RetrySettings {
    pub enabled: bool,
    pub default_policy: RetryPolicy,
    amount_based_policies: Vec<AmountBasedRetryPolicy>,
    pub notify_admin_after_attempts: u32,
    pub notify_admin_emails: Vec<String>,
}

impl RetrySettings {
    /// Build validated settings. Rejects duplicate or negative
    /// thresholds and zero-day offsets here, so a bad policy can
    /// never reach per-record evaluation.
    pub fn new(
        enabled: bool,
        default_policy: RetryPolicy,
        mut amount_based_policies: Vec<AmountBasedRetryPolicy>,
        notify_admin_after_attempts: u32,
        notify_admin_emails: Vec<String>,
    ) -> DunningResult<Self> {
        default_policy.validate()?;
        for entry in &amount_based_policies {
            if entry.threshold < 0.0 {
                return Err(DunningError::NegativeThreshold {
                    threshold: entry.threshold,
                });
            }
            entry.policy.validate()?;
        }

        amount_based_policies.sort_by(|a, b| b.threshold.total_cmp(&a.threshold));
        for pair in amount_based_policies.windows(2) {
            if pair[0].threshold == pair[1].threshold {
                return Err(DunningError::DuplicateThreshold {
                    threshold: pair[0].threshold,
                });
            }
        }

        Ok(Self {
            enabled,
            default_policy,
            amount_based_policies,
            notify_admin_after_attempts,
            notify_admin_emails,
        })
    }

    /// Load from a JSON settings file.
    /// In tests, use RetrySettings::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let file: RetrySettingsFile = serde_json::from_str(&content)?;
        let settings = Self::new(
            file.enabled,
            file.default_policy,
            file.amount_based_policies,
            file.notify_admin_after_attempts,
            file.notify_admin_emails,
        )?;
        log::info!(
            "dunning: loaded retry settings from {path} ({} amount-based overrides)",
            settings.amount_based_policies.len()
        );
        Ok(settings)
    }

    pub fn default_test() -> Self {
        Self {
            enabled: true,
            default_policy: RetryPolicy {
                retry1_days:  3,
                retry2_days:  5,
                retry3_days:  7,
                final_action: FinalAction::Pause,
            },
            amount_based_policies: Vec::new(),
            notify_admin_after_attempts: 3,
            notify_admin_emails: Vec::new(),
        }
    }

    pub fn amount_based_policies(&self) -> &[AmountBasedRetryPolicy] {
        &self.amount_based_policies
    }

    /// Admin notification trigger: fires once the failure count
    /// reaches the configured attempt threshold. Zero disables it.
    pub fn should_notify_admin(&self, failed_attempts: u32) -> bool {
        self.notify_admin_after_attempts > 0 && failed_attempts >= self.notify_admin_after_attempts
    }

    /// Select the policy governing a record of this amount. Among
    /// matching overrides the largest threshold wins; the boundary is
    /// inclusive (amount equal to the threshold selects the override).
    pub fn policy_for_amount(&self, amount: Money) -> &RetryPolicy {
        self.amount_based_policies
            .iter()
            .find(|entry| amount >= entry.threshold)
            .map(|entry| &entry.policy)
            .unwrap_or(&self.default_policy)
    }
}
