//! Benchmarks for pacing detection and report formatting
//! Run: cargo bench -p adpulse-anomaly --bench detection

use adpulse_anomaly::detection::AnomalyDetector;
use adpulse_anomaly::reporting::{build_narrative_prompt, slack_message};
use adpulse_core::DailyMetrics;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

const CHANNELS: &[&str] = &["email", "paid_search", "paid_social", "display", "affiliate"];

// deterministic batch with a few overspend and low-conversion days mixed in
fn sample_metrics(days: u32) -> Vec<DailyMetrics> {
    let mut metrics = Vec::with_capacity(days as usize * CHANNELS.len());
    for day in 1..=days {
        for (i, channel) in CHANNELS.iter().enumerate() {
            let spend = 700.0 + ((day as usize * 37 + i * 91) % 700) as f64;
            let clicks = (spend / (1.0 + (i as f64) * 0.5)) as u64;
            let conversions = if (day as usize + i) % 6 == 0 { 1 } else { clicks / 25 };
            metrics.push(DailyMetrics::new(day, *channel, spend, clicks, conversions));
        }
    }
    metrics
}

fn bench_detect(c: &mut Criterion) {
    let detector = AnomalyDetector::new(1000.0, 120.0, 0.02, 0.03);
    let mut group = c.benchmark_group("detect");

    for days in [14u32, 90, 365] {
        let metrics = sample_metrics(days);
        group.throughput(Throughput::Elements(metrics.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(days), &metrics, |b, metrics| {
            b.iter(|| detector.detect(black_box(metrics)))
        });
    }

    group.finish();
}

fn bench_formatting(c: &mut Criterion) {
    let detector = AnomalyDetector::new(1000.0, 120.0, 0.02, 0.03);
    let anomalies = detector.detect(&sample_metrics(90));

    let mut group = c.benchmark_group("format");
    group.bench_function("slack_message", |b| b.iter(|| slack_message(black_box(&anomalies))));
    group.bench_function("narrative_prompt", |b| {
        b.iter(|| build_narrative_prompt(black_box(&anomalies)))
    });
    group.finish();
}

criterion_group!(benches, bench_detect, bench_formatting);
criterion_main!(benches);
