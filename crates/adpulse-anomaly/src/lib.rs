//! AdPulse pacing anomaly detection & reporting

pub mod config;
pub mod detection;
pub mod reporting;
pub mod runner;

pub use config::{AnomalyConfig, Thresholds, load_config};
pub use detection::{AnomalyDetector, CorpusBaseline};
pub use reporting::AnomalyReportingAgent;
pub use runner::{AnomalyRunner, PacingReport};
