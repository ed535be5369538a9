//! Integration tests for subscout-core
//!
//! These tests exercise the full import → detect → aggregate → export workflow.

use std::collections::HashSet;

use subscout_core::{
    compute_aggregates, detect_subscriptions,
    export::{report_csv_string, to_json},
    import::read_rows,
    Verdict,
};

/// Sample statement with 3 subscriptions (Netflix, Spotify, Hulu), a coffee
/// habit with irregular gaps, a gym whose price jumped, a one-off purchase
/// and two broken rows.
fn statement_csv() -> &'static str {
    r#"date,description,amount,category
2024-07-15,Netflix,15.49,Entertainment
2024-07-20,Spotify,10.99,Music
2024-07-01,Hulu,17.99,Entertainment
2024-07-03,Corner Coffee,4.75,Food
2024-07-09,Corner Coffee,5.25,Food
2024-07-10,Iron Gym,29.99,Fitness
2024-08-14,Netflix,15.49,Entertainment
2024-08-19,Spotify,10.99,Music
2024-07-31,Hulu,17.99,Entertainment
2024-08-11,Corner Coffee,4.75,Food
2024-08-09,Iron Gym,39.99,Fitness
2024-08-22,Garden Center,63.20,Home
2024-09-13,Netflix,15.49,Entertainment
2024-09-18,Spotify,10.99,Music
2024-08-30,Hulu,17.99,Streaming
2024-09-31,Hulu,17.99,Streaming
2024-09-20,   ,12.00,Misc"#
}

#[test]
fn test_full_detection_workflow() {
    let rows = read_rows(statement_csv().as_bytes()).expect("Failed to parse CSV");
    assert_eq!(rows.len(), 17);

    let report = detect_subscriptions(&rows).expect("Detection failed");

    // 2024-09-31 does not exist; the blank merchant fails validation
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(report.accepted_rows, 15);

    let keys: Vec<_> = report
        .subscriptions
        .iter()
        .map(|s| s.merchant_key.as_str())
        .collect();
    assert_eq!(keys, vec!["Netflix", "Spotify", "Hulu"]);

    let hulu = &report.subscriptions[2];
    assert_eq!(hulu.occurrence_count, 3);
    assert_eq!(hulu.category, "Streaming");
    assert_eq!(hulu.frequency_label(), "Every ~30 days");

    let one_time: Vec<_> = report
        .one_time_charges
        .iter()
        .map(|c| c.merchant_key.as_str())
        .collect();
    assert_eq!(one_time, vec!["Garden Center"]);

    // Coffee: 6 and 33 day gaps; gym: $10 price jump
    assert_eq!(report.verdict_for_row(3), Some(Verdict::IrregularInterval));
    assert_eq!(report.verdict_for_row(5), Some(Verdict::AmountInconsistent));
}

#[test]
fn test_savings_calculator_workflow() {
    let rows = read_rows(statement_csv().as_bytes()).unwrap();
    let report = detect_subscriptions(&rows).unwrap();

    let baseline = compute_aggregates(&report.subscriptions, &HashSet::new());
    let expected_monthly = 15.49 + 10.99 + 17.99;
    assert!((baseline.total_monthly_cost - expected_monthly).abs() < 1e-9);
    assert!((baseline.total_annual_cost - expected_monthly * 12.0).abs() < 1e-9);

    let cancel: HashSet<String> = ["Hulu".to_string()].into_iter().collect();
    let summary = compute_aggregates(&report.subscriptions, &cancel);
    assert!((summary.potential_savings_monthly - 17.99).abs() < 1e-9);
    assert!((summary.total_monthly_cost - (15.49 + 10.99)).abs() < 1e-9);
    assert_eq!(summary.marked_for_cancellation.len(), 1);

    let all: HashSet<String> = report
        .subscriptions
        .iter()
        .map(|s| s.merchant_key.clone())
        .collect();
    let summary = compute_aggregates(&report.subscriptions, &all);
    assert_eq!(summary.total_monthly_cost, 0.0);
    assert!((summary.potential_savings_monthly - baseline.total_monthly_cost).abs() < 1e-9);
}

#[test]
fn test_export_workflow() {
    let rows = read_rows(statement_csv().as_bytes()).unwrap();
    let report = detect_subscriptions(&rows).unwrap();
    let summary = compute_aggregates(&report.subscriptions, &HashSet::new());

    let csv = report_csv_string(&report.subscriptions).unwrap();
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.contains("Spotify,$10.99,Every ~30 days,Music,3,2024-09-18,$131.88"));

    let json = to_json(&report, &summary).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["subscriptions"].as_array().unwrap().len(), 3);
    assert_eq!(value["one_time_charges"][0]["merchant_key"], "Garden Center");
}

#[test]
fn test_empty_file_workflow() {
    let rows = read_rows("date,description,amount,category\n".as_bytes()).unwrap();
    let report = detect_subscriptions(&rows).unwrap();

    assert!(report.is_empty_input());
    assert!(report.ensure_not_empty().is_err());

    let summary = compute_aggregates(&report.subscriptions, &HashSet::new());
    assert_eq!(summary.subscription_count, 0);
}
