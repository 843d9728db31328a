//! Narrative and chat-ops reporting for detected anomalies

use crate::detection::AnomalyDetector;
use adpulse_core::Anomaly;
use adpulse_llm::{GenerationOptions, LlmError, TextGenerator};
use tracing::{info, warn};

pub const ALL_CLEAR_NARRATIVE: &str =
    "No material anomalies detected. Campaign pacing and efficiency are within guardrails.";

pub const ALL_CLEAR_SLACK: &str = ":white_check_mark: Pacing check complete. No anomalies detected today.";

const SLACK_HEADER: &str = ":warning: Daily Pacing and KPI Anomalies";

/// Turns anomaly lists into text.
///
/// The detector is only held for context; callers run detection themselves
/// and pass the results in.
pub struct AnomalyReportingAgent<'a, G> {
    detector: &'a AnomalyDetector,
    generator: G,
    options: GenerationOptions,
}

impl<'a, G: TextGenerator> AnomalyReportingAgent<'a, G> {
    pub fn new(detector: &'a AnomalyDetector, generator: G) -> Self {
        Self::with_options(detector, generator, GenerationOptions::default())
    }

    pub fn with_options(detector: &'a AnomalyDetector, generator: G, options: GenerationOptions) -> Self {
        Self {
            detector,
            generator,
            options,
        }
    }

    pub fn detector(&self) -> &AnomalyDetector {
        self.detector
    }

    /// Ask the generator for an executive narrative.
    ///
    /// Returns the generator's text verbatim. Generator failures are passed
    /// through untouched.
    pub async fn explain_anomalies(&self, anomalies: &[Anomaly]) -> Result<String, LlmError> {
        if anomalies.is_empty() {
            return Ok(ALL_CLEAR_NARRATIVE.to_string());
        }

        let prompt = build_narrative_prompt(anomalies);
        info!(
            provider = self.generator.provider(),
            anomalies = anomalies.len(),
            "Requesting anomaly narrative"
        );

        self.generator
            .generate(&prompt, &self.options)
            .await
            .inspect_err(|e| warn!(error = %e, "Narrative generation failed"))
    }

    /// Plain chat-ops message, built locally without calling the generator
    pub fn build_slack_message(&self, anomalies: &[Anomaly]) -> String {
        slack_message(anomalies)
    }
}

pub fn slack_message(anomalies: &[Anomaly]) -> String {
    if anomalies.is_empty() {
        return ALL_CLEAR_SLACK.to_string();
    }

    let mut lines = vec![SLACK_HEADER.to_string()];
    lines.extend(anomalies.iter().map(|a| {
        format!(
            "- Day {}, {}: {} {} {:.1}% vs baseline. {}",
            a.day,
            a.channel,
            a.metric.label(),
            a.direction,
            a.deviation_pct,
            a.reason
        )
    }));
    lines.join("\n")
}

// one bullet per anomaly, in detection order
fn narrative_bullet(a: &Anomaly) -> String {
    format!(
        "- Day {}, {}: {} is {:.1}% {} baseline. {}",
        a.day,
        a.channel,
        a.metric.label(),
        a.deviation_pct,
        a.direction.relation(),
        a.reason
    )
}

pub fn build_narrative_prompt(anomalies: &[Anomaly]) -> String {
    let anomalies_text = anomalies.iter().map(narrative_bullet).collect::<Vec<_>>().join("\n");

    format!(
        r#"
You are a performance marketing manager. You received the following anomaly summary:

{}

Write:
1. A short executive summary (2 to 3 sentences).
2. Three recommended actions with clear priorities.
3. A note on what to monitor for the next 48 hours.

Keep the tone practical and focused on decision making.
"#,
        anomalies_text
    )
}
