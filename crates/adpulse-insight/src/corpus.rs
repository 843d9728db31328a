// Campaign corpus - similarity search over past campaigns

use serde::Serialize;
use tracing::debug;

use crate::campaign::Campaign;
use crate::vectorizer::{cosine_similarity, TfidfVectorizer, Vectorizer};

#[derive(Debug, Clone, Serialize)]
pub struct ScoredCampaign<'a> {
    pub campaign: &'a Campaign,
    pub score: f64, // cosine similarity to the brief
}

/// Campaigns indexed once at construction. The vectorizer is fitted on
/// every campaign's `corpus_text` and reused for each query.
pub struct CampaignCorpus<V = TfidfVectorizer> {
    campaigns: Vec<Campaign>,
    vectorizer: V,
    matrix: Vec<Vec<f64>>,
}

impl CampaignCorpus {
    pub fn new(campaigns: Vec<Campaign>) -> Self {
        Self::with_vectorizer(campaigns, TfidfVectorizer::new())
    }
}

impl<V: Vectorizer> CampaignCorpus<V> {
    pub fn with_vectorizer(campaigns: Vec<Campaign>, mut vectorizer: V) -> Self {
        let texts: Vec<String> = campaigns.iter().map(Campaign::corpus_text).collect();
        let matrix = vectorizer.fit_transform(&texts);
        debug!(campaigns = campaigns.len(), "Indexed campaign corpus");
        Self {
            campaigns,
            vectorizer,
            matrix,
        }
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn vectorizer(&self) -> &V {
        &self.vectorizer
    }

    /// Up to `top_n` campaigns by descending similarity to `brief`.
    /// Equal scores keep corpus order.
    pub fn most_similar(&self, brief: &str, top_n: usize) -> Vec<ScoredCampaign<'_>> {
        let query = self.vectorizer.transform(brief);

        let mut ranked: Vec<ScoredCampaign<'_>> = self
            .campaigns
            .iter()
            .zip(&self.matrix)
            .map(|(campaign, row)| ScoredCampaign {
                campaign,
                score: cosine_similarity(&query, row),
            })
            .collect();

        // stable sort, so ties stay in corpus order
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(top_n);
        ranked
    }
}
