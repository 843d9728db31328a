// UTM QA agent
// Parse -> guess channel -> rule checks -> suggested fix -> LLM summary

use adpulse_llm::{GenerationOptions, LlmError, TextGenerator};
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use url::{form_urlencoded, Url};

use crate::taxonomy::Taxonomy;

// query strings without a host are attached to this placeholder page
const LANDING_PAGE: &str = "https://example.com/landing-page";

/// Query parameters in first-seen order; a repeated key keeps its slot and
/// takes the later value.
pub type Params = IndexMap<String, String>;

#[derive(Error, Debug)]
pub enum UtmError {
    #[error("invalid URL '{input}': {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid taxonomy: {0}")]
    Taxonomy(#[from] serde_json::Error),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingParam,
    InvalidValue,
    NamingConvention,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Info,
    Warning,
    Error,
}

impl IssueSeverity {
    pub fn label(&self) -> &'static str {
        match self {
            IssueSeverity::Info => "INFO",
            IssueSeverity::Warning => "WARNING",
            IssueSeverity::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtmCheckIssue {
    pub kind: IssueKind,
    pub param: Option<String>,
    pub message: String,
    pub severity: IssueSeverity,
}

impl UtmCheckIssue {
    fn new(kind: IssueKind, param: &str, message: String, severity: IssueSeverity) -> Self {
        Self {
            kind,
            param: Some(param.to_string()),
            message,
            severity,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UtmCheckResult {
    pub original_url: String,
    pub normalized_url: String,
    pub issues: Vec<UtmCheckIssue>,
    pub channel_guess: Option<String>,
    pub is_pass: bool, // no error-level issue
    pub suggested_url: String,
    pub explanation: String,
}

pub struct UtmQaAgent<G> {
    taxonomy: Taxonomy,
    generator: G,
    options: GenerationOptions,
}

impl<G: TextGenerator> UtmQaAgent<G> {
    pub fn new(taxonomy: Taxonomy, generator: G) -> Self {
        Self {
            taxonomy,
            generator,
            options: GenerationOptions::default(),
        }
    }

    /// Agent over the taxonomy shipped with the crate
    pub fn with_builtin_taxonomy(generator: G) -> Result<Self, UtmError> {
        Ok(Self::new(Taxonomy::builtin()?, generator))
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Accepts a full URL or a bare query-string block.
    /// Returns the normalized URL and the parsed params.
    pub fn parse_url_or_params(&self, input: &str) -> Result<(String, Params), UtmError> {
        let input = input.trim();

        // only a leading scheme marks a URL; query values may embed one
        if input.starts_with("http://") || input.starts_with("https://") {
            let mut url = Url::parse(input).map_err(|source| UtmError::InvalidUrl {
                input: input.to_string(),
                source,
            })?;
            let params = parse_params(url.query().unwrap_or_default());
            if params.is_empty() {
                url.set_query(None);
            } else {
                url.set_query(Some(&encode_params(&params)));
            }
            Ok((url.to_string(), params))
        } else {
            let params = parse_params(input);
            Ok((format!("{}?{}", LANDING_PAGE, encode_params(&params)), params))
        }
    }

    pub fn guess_channel(&self, params: &Params) -> Option<String> {
        let source = param_lower(params, "utm_source");
        if self.taxonomy.channel_defaults.contains_key(&source) {
            return Some(source);
        }

        let medium = param_lower(params, "utm_medium");
        self.taxonomy
            .channel_defaults
            .iter()
            .find(|(_, defaults)| defaults.get("utm_medium").map(String::as_str) == Some(medium.as_str()))
            .map(|(channel, _)| channel.clone())
    }

    pub fn check_required_params(&self, params: &Params) -> Vec<UtmCheckIssue> {
        self.taxonomy
            .required_params
            .iter()
            .filter(|req| params.get(req.as_str()).is_none_or(|v| v.is_empty()))
            .map(|req| {
                UtmCheckIssue::new(
                    IssueKind::MissingParam,
                    req,
                    format!("Missing required parameter: {}", req),
                    IssueSeverity::Error,
                )
            })
            .collect()
    }

    pub fn check_allowed_values(&self, params: &Params) -> Vec<UtmCheckIssue> {
        let allowed = &self.taxonomy.allowed_values;
        let mut issues = Vec::new();

        let source = param_lower(params, "utm_source");
        if !source.is_empty() && !allowed.utm_source.contains(&source) {
            issues.push(UtmCheckIssue::new(
                IssueKind::InvalidValue,
                "utm_source",
                format!(
                    "utm_source '{}' is not in allowed list {}",
                    source,
                    format_list(&allowed.utm_source)
                ),
                IssueSeverity::Warning,
            ));
        }

        let medium = param_lower(params, "utm_medium");
        if !medium.is_empty() && !allowed.utm_medium.contains(&medium) {
            issues.push(UtmCheckIssue::new(
                IssueKind::InvalidValue,
                "utm_medium",
                format!(
                    "utm_medium '{}' is not in allowed list {}",
                    medium,
                    format_list(&allowed.utm_medium)
                ),
                IssueSeverity::Warning,
            ));
        }

        // prefixes are case sensitive
        let campaign = params.get("utm_campaign").map(String::as_str).unwrap_or_default();
        if !campaign.is_empty()
            && !allowed.utm_campaign_prefixes.is_empty()
            && !allowed
                .utm_campaign_prefixes
                .iter()
                .any(|prefix| campaign.starts_with(prefix.as_str()))
        {
            issues.push(UtmCheckIssue::new(
                IssueKind::NamingConvention,
                "utm_campaign",
                format!(
                    "utm_campaign '{}' does not start with any allowed prefix {}",
                    campaign,
                    format_list(&allowed.utm_campaign_prefixes)
                ),
                IssueSeverity::Info,
            ));
        }

        issues
    }

    /// Fill absent or empty params from the guessed channel's defaults
    pub fn build_suggested_params(&self, params: &Params, channel_guess: Option<&str>) -> Params {
        let mut updated = params.clone();
        if let Some(defaults) = channel_guess.and_then(|channel| self.taxonomy.channel(channel)) {
            for (key, value) in defaults {
                if updated.get(key).is_none_or(|v| v.is_empty()) {
                    updated.insert(key.clone(), value.clone());
                }
            }
        }
        updated
    }

    pub async fn build_explanation(&self, issues: &[UtmCheckIssue], suggested_url: &str) -> Result<String, LlmError> {
        let prompt = build_explanation_prompt(issues, suggested_url);
        info!(provider = self.generator.provider(), issues = issues.len(), "Requesting UTM QA summary");
        self.generator.generate(&prompt, &self.options).await
    }

    pub async fn run_check(&self, input: &str) -> Result<UtmCheckResult, UtmError> {
        let (normalized_url, params) = self.parse_url_or_params(input)?;
        let channel_guess = self.guess_channel(&params);

        let mut issues = self.check_required_params(&params);
        issues.extend(self.check_allowed_values(&params));

        let suggested_params = self.build_suggested_params(&params, channel_guess.as_deref());
        let base = normalized_url.split('?').next().unwrap_or_default();
        let suggested_url = format!("{}?{}", base, encode_params(&suggested_params));

        let is_pass = issues.iter().all(|issue| issue.severity != IssueSeverity::Error);
        debug!(
            url = %normalized_url,
            channel = ?channel_guess,
            issues = issues.len(),
            is_pass,
            "UTM checks complete"
        );

        let explanation = self.build_explanation(&issues, &suggested_url).await?;

        Ok(UtmCheckResult {
            original_url: input.to_string(),
            normalized_url,
            issues,
            channel_guess,
            is_pass,
            suggested_url,
            explanation,
        })
    }
}

pub fn build_explanation_prompt(issues: &[UtmCheckIssue], suggested_url: &str) -> String {
    let issues_text = if issues.is_empty() {
        "No issues detected.".to_string()
    } else {
        issues
            .iter()
            .map(|issue| format!("- [{}] {}", issue.severity.label(), issue.message))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"
You are a marketing operations specialist. Summarize this UTM QA result in simple language.

Issues:
{}

Suggested URL: {}

Provide:
1. A one paragraph summary for a marketer.
2. A short list of recommended next steps.
"#,
        issues_text, suggested_url
    )
}

// blank values are dropped, later duplicates overwrite earlier ones
fn parse_params(query: &str) -> Params {
    let mut params = Params::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if !value.is_empty() {
            params.insert(key.into_owned(), value.into_owned());
        }
    }
    params
}

fn encode_params(params: &Params) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish()
}

fn param_lower(params: &Params, key: &str) -> String {
    params.get(key).map(|v| v.to_lowercase()).unwrap_or_default()
}

fn format_list(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("'{}'", v)).collect();
    format!("[{}]", quoted.join(", "))
}
