//! Past campaign records and the KPI dictionary the insight prompt cites

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::agent::InsightError;

/// One historical campaign, as stored in the history JSON array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub channel: String,
    pub audience: String,
    pub objective: String,
    pub kpis: IndexMap<String, f64>, // document order
    pub summary: String,
}

/// KPI name -> plain-language definition, in document order
pub type KpiDictionary = IndexMap<String, String>;

impl Campaign {
    /// Text the corpus indexes: descriptive fields, KPIs as JSON, then the summary
    pub fn corpus_text(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.name,
            self.channel,
            self.audience,
            self.objective,
            format_kpis(&self.kpis, '"'),
            self.summary
        )
    }

    /// KPIs as they appear in the prompt, e.g. `{'ctr': 0.05, 'cpl': 45.0}`
    pub fn kpi_summary(&self) -> String {
        format_kpis(&self.kpis, '\'')
    }
}

// `{"k": v, ...}` with floats always carrying a fractional part
fn format_kpis(kpis: &IndexMap<String, f64>, quote: char) -> String {
    let pairs: Vec<String> = kpis
        .iter()
        .map(|(name, value)| format!("{q}{}{q}: {:?}", name, value, q = quote))
        .collect();
    format!("{{{}}}", pairs.join(", "))
}

pub fn parse_campaign_history(json: &str) -> Result<Vec<Campaign>, serde_json::Error> {
    serde_json::from_str(json)
}

pub fn load_campaign_history<P: AsRef<Path>>(path: P) -> Result<Vec<Campaign>, InsightError> {
    let content = fs::read_to_string(path)?;
    Ok(parse_campaign_history(&content)?)
}

pub fn parse_kpi_dictionary(yaml: &str) -> Result<KpiDictionary, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

pub fn load_kpi_dictionary<P: AsRef<Path>>(path: P) -> Result<KpiDictionary, InsightError> {
    let content = fs::read_to_string(path)?;
    Ok(parse_kpi_dictionary(&content)?)
}
