//! Rule-based pacing and efficiency anomaly detection

use crate::config::Thresholds;
use adpulse_core::{Anomaly, DailyMetrics, Direction, Metric, Severity};
use tracing::{debug, info};

// spend outside this band around the daily budget is flagged
const OVERSPEND_FACTOR: f64 = 1.25;
const UNDERSPEND_FACTOR: f64 = 0.75;

// overspend at or beyond this deviation escalates to critical
const CRITICAL_OVERSPEND_PCT: f64 = 50.0;

// ctr below this share of the corpus mean is flagged
const CTR_DROP_FACTOR: f64 = 0.7;

/// Averages over the whole batch handed to `detect`.
///
/// Each mean is 0 when its subset is empty. Only `ctr_avg` feeds a rule.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CorpusBaseline {
    pub spend_avg: f64, // over all records
    pub cpa_avg: f64,   // over records with conversions
    pub ctr_avg: f64,   // over records with clicks
    pub cvr_avg: f64,   // over records with clicks
}

impl CorpusBaseline {
    pub fn from_metrics(metrics: &[DailyMetrics]) -> Self {
        Self {
            spend_avg: mean(metrics.iter().map(|m| m.spend)),
            cpa_avg: mean(metrics.iter().filter(|m| m.conversions > 0).map(|m| m.cpa())),
            ctr_avg: mean(metrics.iter().filter(|m| m.clicks > 0).map(|m| m.ctr())),
            cvr_avg: mean(metrics.iter().filter(|m| m.clicks > 0).map(|m| m.cvr())),
        }
    }
}

// main pacing detector
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    daily_budget: f64,
    max_cpa: f64,
    min_ctr: f64,
    min_cvr: f64,
}

impl AnomalyDetector {
    pub fn new(daily_budget: f64, max_cpa: f64, min_ctr: f64, min_cvr: f64) -> Self {
        Self {
            daily_budget,
            max_cpa,
            min_ctr,
            min_cvr,
        }
    }

    pub fn from_thresholds(thresholds: &Thresholds) -> Self {
        Self::new(
            thresholds.daily_budget,
            thresholds.max_cpa,
            thresholds.min_ctr,
            thresholds.min_cvr,
        )
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            daily_budget: self.daily_budget,
            max_cpa: self.max_cpa,
            min_ctr: self.min_ctr,
            min_cvr: self.min_cvr,
        }
    }

    /// Run every rule over every record.
    ///
    /// Anomalies come back in input order, and within a record in rule order
    /// (spend, cpa, ctr, cvr). Never fails: an empty batch yields no anomalies.
    pub fn detect(&self, metrics: &[DailyMetrics]) -> Vec<Anomaly> {
        let baseline = CorpusBaseline::from_metrics(metrics);
        debug!(
            records = metrics.len(),
            spend_avg = baseline.spend_avg,
            cpa_avg = baseline.cpa_avg,
            ctr_avg = baseline.ctr_avg,
            cvr_avg = baseline.cvr_avg,
            "Computed corpus baseline"
        );

        let mut anomalies = Vec::new();

        for m in metrics {
            anomalies.extend(self.check_spend(m));
            anomalies.extend(self.check_cpa(m));
            anomalies.extend(self.check_ctr(m, baseline.ctr_avg));
            anomalies.extend(self.check_cvr(m));
        }

        info!(records = metrics.len(), anomalies = anomalies.len(), "Pacing check complete");
        anomalies
    }

    // spend pacing against the daily budget
    fn check_spend(&self, m: &DailyMetrics) -> Option<Anomaly> {
        if m.spend > self.daily_budget * OVERSPEND_FACTOR {
            let deviation_pct = (m.spend - self.daily_budget) / self.daily_budget * 100.0;
            let severity = if deviation_pct < CRITICAL_OVERSPEND_PCT {
                Severity::Warning
            } else {
                Severity::Critical
            };
            Some(anomaly(
                m,
                Metric::Spend,
                m.spend,
                self.daily_budget,
                deviation_pct,
                Direction::Up,
                severity,
                "Spend is above daily budget target.",
            ))
        } else if m.spend < self.daily_budget * UNDERSPEND_FACTOR {
            let deviation_pct = (self.daily_budget - m.spend) / self.daily_budget * 100.0;
            Some(anomaly(
                m,
                Metric::Spend,
                m.spend,
                self.daily_budget,
                deviation_pct,
                Direction::Down,
                Severity::Info,
                "Spend is below pacing target.",
            ))
        } else {
            None
        }
    }

    // hard CPA guardrail
    fn check_cpa(&self, m: &DailyMetrics) -> Option<Anomaly> {
        let cpa = m.cpa();
        if !(m.conversions > 0 && cpa > self.max_cpa) {
            return None;
        }
        Some(anomaly(
            m,
            Metric::Cpa,
            cpa,
            self.max_cpa,
            (cpa - self.max_cpa) / self.max_cpa * 100.0,
            Direction::Up,
            Severity::Critical,
            "CPA above guardrail threshold.",
        ))
    }

    // relative drop against the corpus mean; a zero mean never fires
    fn check_ctr(&self, m: &DailyMetrics, ctr_avg: f64) -> Option<Anomaly> {
        let ctr = m.ctr();
        if !(m.clicks > 0 && ctr < ctr_avg * CTR_DROP_FACTOR) {
            return None;
        }
        let deviation_pct = if ctr_avg > 0.0 {
            (ctr_avg - ctr) / ctr_avg * 100.0
        } else {
            0.0
        };
        Some(anomaly(
            m,
            Metric::Ctr,
            ctr,
            ctr_avg,
            deviation_pct,
            Direction::Down,
            Severity::Warning,
            "CTR significantly below rolling average.",
        ))
    }

    // conversion-rate floor
    fn check_cvr(&self, m: &DailyMetrics) -> Option<Anomaly> {
        let cvr = m.cvr();
        if !(m.clicks > 0 && cvr < self.min_cvr) {
            return None;
        }
        Some(anomaly(
            m,
            Metric::Cvr,
            cvr,
            self.min_cvr,
            (self.min_cvr - cvr) / self.min_cvr * 100.0,
            Direction::Down,
            Severity::Warning,
            "Conversion rate below minimum target.",
        ))
    }
}

#[allow(clippy::too_many_arguments)]
fn anomaly(
    m: &DailyMetrics,
    metric: Metric,
    value: f64,
    baseline: f64,
    deviation_pct: f64,
    direction: Direction,
    severity: Severity,
    reason: &str,
) -> Anomaly {
    debug!(day = m.day, channel = %m.channel, %metric, value, baseline, deviation_pct, "Rule fired");
    Anomaly {
        day: m.day,
        channel: m.channel.clone(),
        metric,
        value,
        baseline,
        deviation_pct,
        direction,
        severity,
        reason: reason.to_string(),
    }
}

// arithmetic mean, 0 for an empty sequence
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> AnomalyDetector {
        AnomalyDetector::new(1000.0, 100.0, 0.02, 0.03)
    }

    #[test]
    fn test_mean_of_empty_is_zero() {
        assert_eq!(mean(std::iter::empty()), 0.0);
        assert_eq!(mean([1.0, 2.0, 6.0].into_iter()), 3.0);
    }

    #[test]
    fn test_ctr_rule_fires_below_seventy_percent_of_mean() {
        let m = DailyMetrics::new(1, "email", 1000.0, 100, 10);
        let a = detector().check_ctr(&m, 0.5).unwrap();
        assert_eq!(a.metric, Metric::Ctr);
        assert!((a.value - 0.1).abs() < 1e-12);
        assert_eq!(a.baseline, 0.5);
        assert!((a.deviation_pct - 80.0).abs() < 1e-9);
        assert_eq!(a.direction, Direction::Down);
        assert_eq!(a.severity, Severity::Warning);
        assert_eq!(a.reason, "CTR significantly below rolling average.");
    }

    #[test]
    fn test_ctr_rule_silent_on_zero_mean_or_no_clicks() {
        let m = DailyMetrics::new(1, "email", 1000.0, 100, 10);
        assert!(detector().check_ctr(&m, 0.0).is_none());
        // at the mean, no drop
        assert!(detector().check_ctr(&m, 0.1).is_none());

        let idle = DailyMetrics::new(2, "email", 1000.0, 0, 0);
        assert!(detector().check_ctr(&idle, 0.5).is_none());
    }

    #[test]
    fn test_corpus_baseline_subsets() {
        let metrics = vec![
            DailyMetrics::new(1, "email", 100.0, 0, 0),
            DailyMetrics::new(2, "email", 300.0, 100, 10),
        ];
        let baseline = CorpusBaseline::from_metrics(&metrics);
        assert_eq!(baseline.spend_avg, 200.0);
        assert_eq!(baseline.cpa_avg, 30.0);
        assert!((baseline.ctr_avg - 0.1).abs() < 1e-12);
        assert!((baseline.cvr_avg - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_overspend_critical_at_fifty_percent() {
        let metrics = vec![DailyMetrics::new(1, "paid_search", 1500.0, 100, 10)];
        let anomalies = detector().detect(&metrics);
        let spend = anomalies.iter().find(|a| a.metric == Metric::Spend).unwrap();
        assert_eq!(spend.severity, Severity::Critical);
        assert_eq!(spend.deviation_pct, 50.0);
    }

    #[test]
    fn test_spend_band_edges_do_not_fire() {
        let metrics = vec![
            DailyMetrics::new(1, "email", 1250.0, 100, 10),
            DailyMetrics::new(2, "email", 750.0, 100, 10),
        ];
        let anomalies = detector().detect(&metrics);
        assert!(anomalies.iter().all(|a| a.metric != Metric::Spend));
    }

    #[test]
    fn test_cpa_skipped_without_conversions() {
        let metrics = vec![DailyMetrics::new(1, "email", 1000.0, 100, 0)];
        let anomalies = detector().detect(&metrics);
        assert!(anomalies.iter().all(|a| a.metric != Metric::Cpa));
        // cvr floor still applies
        assert!(anomalies.iter().any(|a| a.metric == Metric::Cvr));
    }

    #[test]
    fn test_ctr_rule_suppressed_when_mean_is_zero() {
        // every record without clicks: the ctr mean is 0 and the rule never fires
        let metrics = vec![
            DailyMetrics::new(1, "display", 1000.0, 0, 0),
            DailyMetrics::new(2, "display", 1000.0, 0, 0),
        ];
        let anomalies = detector().detect(&metrics);
        assert!(anomalies.is_empty());
    }

    #[test]
    fn test_min_ctr_is_kept_but_unused() {
        let strict = AnomalyDetector::new(1000.0, 100.0, 0.99, 0.03);
        let metrics = vec![DailyMetrics::new(1, "email", 1000.0, 100, 10)];
        assert!(strict.detect(&metrics).is_empty());
        assert_eq!(strict.thresholds().min_ctr, 0.99);
    }

    #[test]
    fn test_rule_order_within_record() {
        // overspend, cpa breach and cvr breach on one record
        let metrics = vec![DailyMetrics::new(4, "paid_social", 2000.0, 100, 2)];
        let metrics_found: Vec<Metric> = detector().detect(&metrics).iter().map(|a| a.metric).collect();
        assert_eq!(metrics_found, vec![Metric::Spend, Metric::Cpa, Metric::Cvr]);
    }
}
