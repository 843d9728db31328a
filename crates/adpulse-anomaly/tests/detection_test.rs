use adpulse_anomaly::detection::AnomalyDetector;
use adpulse_core::{DailyMetrics, Direction, Metric, Severity};

fn detector() -> AnomalyDetector {
    AnomalyDetector::new(1000.0, 100.0, 0.02, 0.03)
}

#[test]
fn test_detect_overspend_warning() {
    let metrics = vec![DailyMetrics::new(1, "paid_search", 1300.0, 100, 10)];
    let anomalies = detector().detect(&metrics);

    let spend: Vec<_> = anomalies.iter().filter(|a| a.metric == Metric::Spend).collect();
    assert_eq!(spend.len(), 1);
    assert_eq!(spend[0].direction, Direction::Up);
    assert_eq!(spend[0].severity, Severity::Warning);
    assert!((spend[0].deviation_pct - 30.0).abs() < 1e-9);
    assert_eq!(spend[0].baseline, 1000.0);
}

#[test]
fn test_detect_underspend_info() {
    let metrics = vec![DailyMetrics::new(1, "paid_search", 500.0, 50, 5)];
    let anomalies = detector().detect(&metrics);

    let spend: Vec<_> = anomalies.iter().filter(|a| a.metric == Metric::Spend).collect();
    assert_eq!(spend.len(), 1);
    assert_eq!(spend[0].direction, Direction::Down);
    assert_eq!(spend[0].severity, Severity::Info);
    assert_eq!(spend[0].deviation_pct, 50.0);
}

#[test]
fn test_detect_high_cpa() {
    // cpa = 1000 / 5 = 200, double the guardrail
    let metrics = vec![DailyMetrics::new(1, "paid_search", 1000.0, 50, 5)];
    let anomalies = detector().detect(&metrics);

    let cpa: Vec<_> = anomalies.iter().filter(|a| a.metric == Metric::Cpa).collect();
    assert_eq!(cpa.len(), 1);
    assert_eq!(cpa[0].severity, Severity::Critical);
    assert_eq!(cpa[0].direction, Direction::Up);
    assert_eq!(cpa[0].value, 200.0);
    assert_eq!(cpa[0].deviation_pct, 100.0);
}

#[test]
fn test_no_spend_anomaly_within_band() {
    let metrics = vec![DailyMetrics::new(1, "email", 950.0, 100, 10)];
    let anomalies = detector().detect(&metrics);
    assert!(anomalies.iter().all(|a| a.metric != Metric::Spend));
}

#[test]
fn test_ctr_rule_quiet_on_uniform_ctr() {
    // ctr is 0.1 for every record with clicks, so the relative drop never fires
    let metrics = vec![
        DailyMetrics::new(1, "email", 1000.0, 100, 10),
        DailyMetrics::new(2, "email", 1000.0, 80, 8),
        DailyMetrics::new(3, "email", 1000.0, 120, 12),
    ];
    let anomalies = detector().detect(&metrics);
    assert!(anomalies.iter().all(|a| a.metric != Metric::Ctr));
}

#[test]
fn test_cvr_floor() {
    // cvr = 2 / 100 = 0.02 below the 0.03 floor
    let metrics = vec![DailyMetrics::new(2, "paid_social", 1000.0, 100, 2)];
    let anomalies = detector().detect(&metrics);

    let cvr = anomalies.iter().find(|a| a.metric == Metric::Cvr).unwrap();
    assert_eq!(cvr.direction, Direction::Down);
    assert_eq!(cvr.severity, Severity::Warning);
    assert_eq!(cvr.baseline, 0.03);
    assert!((cvr.deviation_pct - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_empty_input() {
    assert!(detector().detect(&[]).is_empty());
}

#[test]
fn test_output_follows_input_order() {
    let metrics = vec![
        DailyMetrics::new(1, "email", 500.0, 100, 10),
        DailyMetrics::new(2, "paid_search", 2000.0, 100, 10),
        DailyMetrics::new(3, "paid_social", 400.0, 100, 10),
    ];
    let days: Vec<u32> = detector()
        .detect(&metrics)
        .iter()
        .filter(|a| a.metric == Metric::Spend)
        .map(|a| a.day)
        .collect();
    assert_eq!(days, vec![1, 2, 3]);
}

#[test]
fn test_detect_is_idempotent() {
    let metrics = vec![
        DailyMetrics::new(1, "email", 1300.0, 50, 5),
        DailyMetrics::new(1, "paid_search", 600.0, 0, 0),
        DailyMetrics::new(2, "paid_social", 900.0, 100, 1),
    ];
    let d = detector();
    assert_eq!(d.detect(&metrics), d.detect(&metrics));
}

#[test]
fn test_nonsensical_input_does_not_panic() {
    // negative spend and more conversions than clicks are not rejected
    let metrics = vec![
        DailyMetrics::new(1, "email", -50.0, 10, 20),
        DailyMetrics::new(2, "email", 0.0, 0, 5),
    ];
    let anomalies = detector().detect(&metrics);
    assert!(anomalies.iter().any(|a| a.metric == Metric::Spend && a.direction == Direction::Down));
}
