use billdesk_core::error::DunningError;
use billdesk_core::policy::{AmountBasedRetryPolicy, FinalAction, RetryPolicy, RetrySettings};
use billdesk_core::record::{ClientType, MonetaryRecord, RecordKind};

fn policy(retry1: u32, retry2: u32, retry3: u32) -> RetryPolicy {
    RetryPolicy {
        retry1_days:  retry1,
        retry2_days:  retry2,
        retry3_days:  retry3,
        final_action: FinalAction::Pause,
    }
}

/// Default 3/5/7 plus overrides at $500 (2/4/6) and $1000 (1/3/5).
fn tiered_settings() -> RetrySettings {
    RetrySettings::new(
        true,
        policy(3, 5, 7),
        vec![
            AmountBasedRetryPolicy {
                threshold: 500.0,
                policy: policy(2, 4, 6),
            },
            AmountBasedRetryPolicy {
                threshold: 1000.0,
                policy: policy(1, 3, 5),
            },
        ],
        3,
        vec![],
    )
    .expect("tiered settings must construct")
}

#[test]
fn largest_matching_threshold_wins() {
    // $1,200 meets both the $500 and $1,000 tiers; the $1,000 policy
    // must govern, not the first match in declaration order.
    let settings = tiered_settings();
    let selected = settings.policy_for_amount(1200.0);
    assert_eq!(selected.retry1_days, 1);
}

#[test]
fn threshold_boundary_is_inclusive() {
    let settings = tiered_settings();
    assert_eq!(settings.policy_for_amount(1000.0).retry1_days, 1);
    assert_eq!(settings.policy_for_amount(999.99).retry1_days, 2);
    assert_eq!(settings.policy_for_amount(500.0).retry1_days, 2);
}

#[test]
fn below_every_threshold_uses_the_default() {
    let settings = tiered_settings();
    assert_eq!(settings.policy_for_amount(499.99).retry1_days, 3);
    assert_eq!(settings.policy_for_amount(0.0).retry1_days, 3);
}

#[test]
fn duplicate_thresholds_are_rejected_at_construction() {
    let result = RetrySettings::new(
        true,
        policy(3, 5, 7),
        vec![
            AmountBasedRetryPolicy {
                threshold: 500.0,
                policy: policy(2, 4, 6),
            },
            AmountBasedRetryPolicy {
                threshold: 500.0,
                policy: policy(1, 3, 5),
            },
        ],
        3,
        vec![],
    );
    assert!(matches!(
        result,
        Err(DunningError::DuplicateThreshold { threshold }) if threshold == 500.0
    ));
}

#[test]
fn negative_threshold_is_rejected_at_construction() {
    let result = RetrySettings::new(
        true,
        policy(3, 5, 7),
        vec![AmountBasedRetryPolicy {
            threshold: -10.0,
            policy: policy(2, 4, 6),
        }],
        3,
        vec![],
    );
    assert!(matches!(
        result,
        Err(DunningError::NegativeThreshold { .. })
    ));
}

#[test]
fn zero_day_offsets_are_rejected_at_construction() {
    let result = RetrySettings::new(true, policy(3, 0, 7), vec![], 3, vec![]);
    assert!(matches!(
        result,
        Err(DunningError::InvalidRetryOffset { attempt: 2 })
    ));
}

#[test]
fn per_record_custom_policy_wins_over_amount_selection() {
    let settings = tiered_settings();
    let mut record = MonetaryRecord::new(
        RecordKind::Subscription,
        "sub-001",
        "client-001",
        "Harbor Light Coffee",
        ClientType::Business,
        1200.0,
        None,
    );
    record.custom_policy = Some(policy(10, 10, 10));

    assert_eq!(record.applicable_policy(&settings).retry1_days, 10);

    record.custom_policy = None;
    assert_eq!(record.applicable_policy(&settings).retry1_days, 1);
}

#[test]
fn overrides_are_kept_sorted_by_descending_threshold() {
    let settings = tiered_settings();
    let thresholds: Vec<f64> = settings
        .amount_based_policies()
        .iter()
        .map(|p| p.threshold)
        .collect();
    assert_eq!(thresholds, vec![1000.0, 500.0]);
}

#[test]
fn settings_load_from_a_json_file() {
    let content = r#"{
        "enabled": true,
        "default_policy": {
            "retry1_days": 3,
            "retry2_days": 5,
            "retry3_days": 7,
            "final_action": "pause"
        },
        "amount_based_policies": [
            {
                "threshold": 1000.0,
                "retry1_days": 1,
                "retry2_days": 3,
                "retry3_days": 5,
                "final_action": "keep-active"
            }
        ],
        "notify_admin_after_attempts": 3,
        "notify_admin_emails": ["billing@example.com"]
    }"#;

    let path = std::env::temp_dir().join("billdesk_retry_settings_test.json");
    std::fs::write(&path, content).expect("write settings file");
    let settings =
        RetrySettings::load(path.to_str().expect("utf8 path")).expect("settings must load");
    let _ = std::fs::remove_file(&path);

    assert!(settings.enabled);
    assert_eq!(settings.policy_for_amount(1500.0).retry1_days, 1);
    assert_eq!(settings.policy_for_amount(200.0).retry1_days, 3);
    assert_eq!(
        settings.policy_for_amount(1500.0).final_action,
        FinalAction::KeepActive
    );
}

#[test]
fn admin_notification_fires_at_the_configured_attempt_count() {
    let settings = tiered_settings();
    assert!(!settings.should_notify_admin(2));
    assert!(settings.should_notify_admin(3));
    assert!(settings.should_notify_admin(4));

    let silent = RetrySettings::new(true, policy(3, 5, 7), vec![], 0, vec![])
        .expect("settings must construct");
    assert!(!silent.should_notify_admin(10), "zero threshold disables it");
}

#[test]
fn schedule_description_is_cumulative_from_the_initial_failure() {
    let lines = policy(3, 5, 7).schedule_description();
    assert_eq!(lines[0], "First retry: 3 days after initial failure");
    assert_eq!(lines[1], "Second retry: 8 days after initial failure");
    assert_eq!(lines[2], "Third retry: 15 days after initial failure");
    assert!(lines[3].starts_with("After all retries fail:"));
}
