//! aging-report: headless aging & dunning report over a mock portfolio.
//!
//! Usage:
//!   aging-report --seed 42 --records 24 --as-of 2026-03-01
//!   aging-report --settings dunning_settings.json --json
//!
//! The portfolio is generated from the seed, so a fixed seed and
//! as-of date always print the same report.

use anyhow::Result;
use billdesk_core::{
    aggregate::aggregate,
    enrich::enrich,
    policy::{AmountBasedRetryPolicy, FinalAction, RetryPolicy, RetrySettings},
    record::{AttemptOutcome, ClientType, MonetaryRecord, PaymentAttempt, PaymentMethod, RecordKind},
    status::OverrideStatus,
};
use chrono::{Days, NaiveDate};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use std::env;

const BUSINESS_NAMES: [&str; 8] = [
    "Harbor Light Coffee",
    "Meridian Tax Group",
    "Cobalt Fabrication",
    "Willow & Finch LLC",
    "Stonebridge Dental",
    "Acme Field Services",
    "Northgate Logistics",
    "Pinewood Media",
];

const INDIVIDUAL_NAMES: [&str; 8] = [
    "Avery Collins",
    "Jordan Reyes",
    "Sam Whitfield",
    "Priya Raman",
    "Chris Okafor",
    "Dana Kowalski",
    "Lee Tanaka",
    "Morgan Ellis",
];

const PLAN_AMOUNTS: [f64; 6] = [99.0, 250.0, 500.0, 750.0, 1200.0, 2400.0];

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let records = parse_arg(&args, "--records", 24usize);
    let as_of = args
        .windows(2)
        .find(|w| w[0] == "--as-of")
        .map(|w| NaiveDate::parse_from_str(&w[1], "%Y-%m-%d"))
        .transpose()?
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(2026, 3, 1).unwrap_or_default());
    let json = args.iter().any(|a| a == "--json");
    let settings_path = args
        .windows(2)
        .find(|w| w[0] == "--settings")
        .map(|w| w[1].clone());

    let settings = match settings_path {
        Some(path) => RetrySettings::load(&path)?,
        None => demo_settings()?,
    };

    let (subscriptions, invoices) = build_portfolio(seed, records, as_of);
    log::info!(
        "aging-report: {} subscriptions, {} invoices as of {as_of}",
        subscriptions.len(),
        invoices.len()
    );

    let summary = aggregate(&subscriptions, &invoices, as_of);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Aging & Dunning Report — as of {as_of} (seed {seed})");
    println!();
    println!(
        "{:<14} {:<12} {:<24} {:>10}  {:<12} {:<16} {:<12} {:<12}",
        "ID", "KIND", "CLIENT", "OWED", "BUCKET", "STATUS", "NEXT RETRY", "NEXT REMIND"
    );
    for record in subscriptions.iter().chain(&invoices) {
        let e = enrich(record, &settings, as_of);
        let bucket = match e.aging.bucket() {
            Some(b) => b.label().to_string(),
            None => "unscheduled".to_string(),
        };
        println!(
            "{:<14} {:<12} {:<24} {:>10.2}  {:<12} {:<16} {:<12} {:<12}",
            e.record.id,
            match e.record.kind {
                RecordKind::Subscription => "subscription",
                RecordKind::Invoice => "invoice",
            },
            e.record.client_name,
            e.record.amount_owed(),
            bucket,
            e.status.to_string(),
            e.next_retry_on
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".into()),
            e.next_reminder_on
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".into()),
        );
    }

    println!();
    println!("Summary");
    for (label, totals) in [
        ("Current", summary.current),
        ("1-30", summary.days_1_30),
        ("31-60", summary.days_31_60),
        ("61-90", summary.days_61_90),
        ("90+", summary.days_90_plus),
        ("Unscheduled", summary.unscheduled),
    ] {
        println!("  {label:<12} {:>4} items  ${:>12.2}", totals.count, totals.amount);
    }
    println!();
    println!("  Total AR:        ${:>12.2}", summary.total_accounts_receivable);
    println!("  Total overdue:   ${:>12.2}", summary.total_overdue);
    println!("  Overdue percent: {:>13.1}%", summary.overdue_percentage);

    Ok(())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

/// Demo settings: the stock 3/5/7 cadence plus two amount tiers, the
/// same shape an admin would save from the retry-settings form.
fn demo_settings() -> Result<RetrySettings> {
    let settings = RetrySettings::new(
        true,
        RetryPolicy {
            retry1_days:  3,
            retry2_days:  5,
            retry3_days:  7,
            final_action: FinalAction::Pause,
        },
        vec![
            AmountBasedRetryPolicy {
                threshold: 500.0,
                policy: RetryPolicy {
                    retry1_days:  2,
                    retry2_days:  4,
                    retry3_days:  6,
                    final_action: FinalAction::Pause,
                },
            },
            AmountBasedRetryPolicy {
                threshold: 1000.0,
                policy: RetryPolicy {
                    retry1_days:  1,
                    retry2_days:  3,
                    retry3_days:  5,
                    final_action: FinalAction::KeepActive,
                },
            },
        ],
        3,
        vec!["billing@example.com".into()],
    )?;
    Ok(settings)
}

/// Build a deterministic mock portfolio: a spread of buckets, some
/// failed-payment histories, a couple of unscheduled records, one
/// manual suspension, and a few settled invoices.
fn build_portfolio(
    seed: u64,
    count: usize,
    as_of: NaiveDate,
) -> (Vec<MonetaryRecord>, Vec<MonetaryRecord>) {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let mut subscriptions = Vec::new();
    let mut invoices = Vec::new();

    for i in 0..count {
        let is_invoice = i % 3 == 2;
        let business = rng.gen_bool(0.5);
        let name_pool = if business { &BUSINESS_NAMES } else { &INDIVIDUAL_NAMES };
        let client_name = name_pool[rng.gen_range(0..name_pool.len())];
        let amount = PLAN_AMOUNTS[rng.gen_range(0..PLAN_AMOUNTS.len())];

        // Spread due dates from 20 days in the future to 130 days past.
        let due_offset: i64 = rng.gen_range(-20..=130);
        let due_date = if i % 11 == 10 {
            None // a record that was never scheduled
        } else if due_offset >= 0 {
            as_of.checked_sub_days(Days::new(due_offset as u64))
        } else {
            as_of.checked_add_days(Days::new((-due_offset) as u64))
        };

        let kind = if is_invoice {
            RecordKind::Invoice
        } else {
            RecordKind::Subscription
        };
        let prefix = if is_invoice { "inv" } else { "sub" };

        let mut record = MonetaryRecord::new(
            kind,
            format!("{prefix}-{seed}-{i:03}"),
            format!("client-{:03}", rng.gen_range(0..count.max(1))),
            client_name,
            if business {
                ClientType::Business
            } else {
                ClientType::Individual
            },
            amount,
            due_date,
        );

        if rng.gen_bool(0.8) {
            record.payment_method = Some(if business {
                PaymentMethod::Ach
            } else {
                PaymentMethod::CreditCard
            });
        }

        let overdue = due_date.map(|d| d < as_of).unwrap_or(false);
        if overdue && record.payment_method.is_some() {
            record.failed_attempts = rng.gen_range(0..=3);
            if record.failed_attempts > 0 {
                record.last_attempt_on =
                    due_date.and_then(|d| d.checked_add_days(Days::new(2)));
                record.retry_phase.current = record.failed_attempts.min(record.retry_phase.total);
                for retry_number in 0..record.failed_attempts {
                    record.history.push(PaymentAttempt {
                        attempted_on: record.last_attempt_on.unwrap_or(as_of),
                        amount,
                        outcome: AttemptOutcome::Failed,
                        failure_reason: Some("card declined".into()),
                        retry_number,
                    });
                }
            }
        }
        if overdue && !is_invoice {
            record.overdue_amount = Some(amount);
        }
        if is_invoice && !overdue && rng.gen_bool(0.3) {
            record.settled = true;
        }
        if i == 5 {
            record = record.apply_final_status_override(
                OverrideStatus::Suspended,
                Some("nonpayment, owner contacted".into()),
                Some("admin".into()),
                Some(as_of),
            );
        }
        if i == 7 {
            record = record.suspend_reminders(Some("payment plan agreed".into()));
        }

        if is_invoice {
            invoices.push(record);
        } else {
            subscriptions.push(record);
        }
    }

    (subscriptions, invoices)
}
