// AdPulse Insight - retrieval-augmented briefing on past campaign performance

pub mod agent;
pub mod campaign;
pub mod corpus;
pub mod vectorizer;

pub use agent::{InsightAgent, InsightError, DEFAULT_TOP_N};
pub use campaign::{
    load_campaign_history, load_kpi_dictionary, parse_campaign_history, parse_kpi_dictionary, Campaign,
    KpiDictionary,
};
pub use corpus::{CampaignCorpus, ScoredCampaign};
pub use vectorizer::{cosine_similarity, TfidfVectorizer, Vectorizer};
