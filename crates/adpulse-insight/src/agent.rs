// Campaign insight agent
// Brief -> similar past campaigns -> prompt with KPI dictionary -> LLM answer

use adpulse_llm::{GenerationOptions, LlmError, TextGenerator};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::campaign::{load_campaign_history, load_kpi_dictionary, KpiDictionary};
use crate::corpus::{CampaignCorpus, ScoredCampaign};
use crate::vectorizer::{TfidfVectorizer, Vectorizer};

/// Campaigns quoted in each insight prompt
pub const DEFAULT_TOP_N: usize = 3;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid campaign history: {0}")]
    History(#[from] serde_json::Error),

    #[error("invalid KPI dictionary: {0}")]
    KpiDictionary(#[from] serde_yaml::Error),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

pub struct InsightAgent<G, V = TfidfVectorizer> {
    corpus: CampaignCorpus<V>,
    kpi_dict: KpiDictionary,
    generator: G,
    options: GenerationOptions,
    top_n: usize,
}

impl<G: TextGenerator> InsightAgent<G> {
    /// Load the history JSON and KPI YAML and index them with TF-IDF
    pub fn from_paths<P: AsRef<Path>, Q: AsRef<Path>>(
        history_path: P,
        kpi_path: Q,
        generator: G,
    ) -> Result<Self, InsightError> {
        let campaigns = load_campaign_history(history_path)?;
        let kpi_dict = load_kpi_dictionary(kpi_path)?;
        Ok(Self::new(CampaignCorpus::new(campaigns), kpi_dict, generator))
    }
}

impl<G: TextGenerator, V: Vectorizer> InsightAgent<G, V> {
    pub fn new(corpus: CampaignCorpus<V>, kpi_dict: KpiDictionary, generator: G) -> Self {
        Self {
            corpus,
            kpi_dict,
            generator,
            options: GenerationOptions::default(),
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn corpus(&self) -> &CampaignCorpus<V> {
        &self.corpus
    }

    pub fn kpi_dictionary(&self) -> &KpiDictionary {
        &self.kpi_dict
    }

    pub fn build_prompt(&self, brief: &str, similar: &[ScoredCampaign<'_>]) -> String {
        let mut lines: Vec<String> = vec![
            "You are a marketing analytics strategist.".to_string(),
            "You will analyze a new campaign brief using similar past campaigns.".to_string(),
            String::new(),
            "New campaign brief:".to_string(),
            brief.to_string(),
            String::new(),
            "Relevant past campaigns:".to_string(),
        ];

        for scored in similar {
            let c = scored.campaign;
            lines.push(format!("- ID: {} (similarity {:.2})", c.id, scored.score));
            lines.push(format!("  Name: {}", c.name));
            lines.push(format!("  Channel: {}", c.channel));
            lines.push(format!("  Audience: {}", c.audience));
            lines.push(format!("  Objective: {}", c.objective));
            lines.push(format!("  KPIs: {}", c.kpi_summary()));
            lines.push(format!("  Summary: {}", c.summary));
            lines.push(String::new());
        }

        lines.push("KPI dictionary:".to_string());
        lines.extend(self.kpi_dict.iter().map(|(kpi, desc)| format!("- {}: {}", kpi, desc)));
        lines.push(String::new());

        lines.extend(
            [
                "Tasks:",
                "1. Summarize the main pattern across the similar campaigns.",
                "2. Suggest three specific recommendations for this new campaign.",
                "3. Call out any KPI risks or tradeoffs to monitor.",
                "Return a concise answer suitable for an internal GTM update.",
            ]
            .map(String::from),
        );

        lines.join("\n")
    }

    /// Retrieve the closest campaigns and ask the generator for an insight.
    /// The reply is returned unchanged.
    pub async fn generate_insight(&self, brief: &str) -> Result<String, LlmError> {
        let similar = self.corpus.most_similar(brief, self.top_n);
        let prompt = self.build_prompt(brief, &similar);

        info!(
            provider = self.generator.provider(),
            campaigns = similar.len(),
            top_score = similar.first().map(|s| s.score).unwrap_or_default(),
            "Requesting campaign insight"
        );
        self.generator.generate(&prompt, &self.options).await
    }
}
