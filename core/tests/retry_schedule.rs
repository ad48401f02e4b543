use billdesk_core::policy::{FinalAction, RetryPolicy};
use billdesk_core::schedule::{is_exhausted, next_attempt_date, next_reminder_date, Phase};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn policy() -> RetryPolicy {
    RetryPolicy {
        retry1_days:  3,
        retry2_days:  5,
        retry3_days:  7,
        final_action: FinalAction::Pause,
    }
}

#[test]
fn attempts_chain_from_the_previous_attempt() {
    let p = policy();
    let due = date(2026, 1, 10);

    let first = next_attempt_date(&p, 1, due).expect("first attempt");
    assert_eq!(first, date(2026, 1, 13));

    let second = next_attempt_date(&p, 2, first).expect("second attempt");
    assert_eq!(second, date(2026, 1, 18));

    let third = next_attempt_date(&p, 3, second).expect("third attempt");
    assert_eq!(third, date(2026, 1, 25));
}

#[test]
fn schedule_ends_after_the_third_attempt() {
    let p = policy();
    assert_eq!(next_attempt_date(&p, 4, date(2026, 1, 25)), None);
    assert_eq!(next_attempt_date(&p, 0, date(2026, 1, 25)), None);
}

#[test]
fn exhaustion_matches_the_fixed_attempt_count() {
    let p = policy();
    assert!(!is_exhausted(0, &p));
    assert!(!is_exhausted(2, &p));
    assert!(is_exhausted(3, &p));
    assert!(is_exhausted(4, &p));
}

#[test]
fn phase_advances_one_step_and_saturates() {
    let mut phase = Phase::new(3);
    assert_eq!(phase.remaining(), 3);

    phase = phase.advance();
    assert_eq!(phase.current, 1);
    assert!(!phase.is_exhausted());

    phase = phase.advance().advance();
    assert!(phase.is_exhausted());
    assert_eq!(phase.remaining(), 0);

    // Extra advances do not run past the total.
    phase = phase.advance();
    assert_eq!(phase.current, 3);
}

#[test]
fn reminder_schedule_runs_on_its_own_counter() {
    let p = policy();
    let anchor = date(2026, 2, 1);

    // Reminder phase at index 1: next reminder uses the second offset,
    // regardless of how many payment retries have run.
    let phase = Phase { current: 1, total: 3 };
    let next = next_reminder_date(&p, &phase, false, anchor).expect("second reminder");
    assert_eq!(next, date(2026, 2, 6));
}

#[test]
fn suspension_freezes_the_reminder_counter_without_resetting_it() {
    let p = policy();
    let anchor = date(2026, 2, 1);
    let phase = Phase { current: 1, total: 3 };

    assert_eq!(
        next_reminder_date(&p, &phase, true, anchor),
        None,
        "no reminders while suspended"
    );

    // Resuming continues from the same index, not from the start.
    let resumed = next_reminder_date(&p, &phase, false, anchor).expect("resumed reminder");
    assert_eq!(resumed, date(2026, 2, 6));
}

#[test]
fn exhausted_reminder_phase_schedules_nothing() {
    let p = policy();
    let phase = Phase { current: 3, total: 3 };
    assert_eq!(next_reminder_date(&p, &phase, false, date(2026, 2, 1)), None);
}
