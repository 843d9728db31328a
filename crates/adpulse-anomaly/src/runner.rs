use crate::config::{AnomalyConfig, ConfigError, load_config};
use crate::detection::AnomalyDetector;
use crate::reporting::AnomalyReportingAgent;
use adpulse_core::{Anomaly, DailyMetrics};
use adpulse_llm::{GenerationOptions, LlmError, TextGenerator, build_generator};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Everything one pacing check produces
#[derive(Debug, Clone, Serialize)]
pub struct PacingReport {
    pub anomalies: Vec<Anomaly>,
    pub slack_message: String,
    pub narrative: String,
}

// main runner that wires detection and reporting together
pub struct AnomalyRunner<G> {
    detector: AnomalyDetector,
    generator: G,
    options: GenerationOptions,
}

impl AnomalyRunner<Box<dyn TextGenerator>> {
    // create a runner from a config file, building the configured generator
    pub fn from_config_file<P: AsRef<Path>>(config_path: P) -> Result<Self, RunnerError> {
        let config = load_config(config_path)?;
        let generator = build_generator(&config.llm)?;
        Ok(Self::new(&config, generator))
    }
}

impl<G: TextGenerator> AnomalyRunner<G> {
    pub fn new(config: &AnomalyConfig, generator: G) -> Self {
        Self {
            detector: AnomalyDetector::from_thresholds(&config.thresholds),
            generator,
            options: config.llm.options(),
        }
    }

    pub fn detector(&self) -> &AnomalyDetector {
        &self.detector
    }

    /// Detect, format the chat-ops message, then ask for the narrative
    pub async fn run(&self, metrics: &[DailyMetrics]) -> Result<PacingReport, LlmError> {
        let anomalies = self.detector.detect(metrics);
        info!(anomalies = anomalies.len(), "Building pacing report");

        let agent = AnomalyReportingAgent::with_options(&self.detector, &self.generator, self.options.clone());
        let slack_message = agent.build_slack_message(&anomalies);
        let narrative = agent.explain_anomalies(&anomalies).await?;

        Ok(PacingReport {
            anomalies,
            slack_message,
            narrative,
        })
    }
}
