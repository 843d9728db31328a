//! Marketing taxonomy the UTM checks validate against

use indexmap::IndexMap;
use serde::Deserialize;

const BUILTIN_TAXONOMY: &str = include_str!("../utm_taxonomy.json");

/// Required parameters, allowed values and per-channel defaults.
///
/// Channel order follows the source document, and `guess_channel` picks the
/// first channel whose default medium matches.
#[derive(Debug, Clone, Deserialize)]
pub struct Taxonomy {
    pub required_params: Vec<String>,
    pub allowed_values: AllowedValues,
    pub channel_defaults: IndexMap<String, IndexMap<String, String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AllowedValues {
    pub utm_source: Vec<String>,
    pub utm_medium: Vec<String>,
    #[serde(default)]
    pub utm_campaign_prefixes: Vec<String>,
}

impl Taxonomy {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Taxonomy shipped with the crate
    pub fn builtin() -> Result<Self, serde_json::Error> {
        Self::from_json(BUILTIN_TAXONOMY)
    }

    pub fn channel(&self, name: &str) -> Option<&IndexMap<String, String>> {
        self.channel_defaults.get(name)
    }
}
