//! Configuration parsing for pacing thresholds and the narrative generator

use adpulse_llm::LlmConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

// Main config structure
#[derive(Debug, Clone, Deserialize)]
pub struct AnomalyConfig {
    // pacing and efficiency guardrails
    pub thresholds: Thresholds,

    // narrative generator settings (defaults to openai)
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Fixed guardrails the detector compares daily records against.
///
/// Values are taken as-is. Non-positive budgets or guardrails are not
/// rejected and simply produce meaningless deviations.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Thresholds {
    pub daily_budget: f64, // planned spend per channel per day
    pub max_cpa: f64,      // CPA guardrail
    pub min_ctr: f64,      // stored, no rule reads it yet
    pub min_cvr: f64,      // conversion-rate floor
}

// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AnomalyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<AnomalyConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}
