// Provider selection from configuration

use serde::Deserialize;

use crate::llm_client::{GenerationOptions, LlmError, TextGenerator};
use crate::ollama_client::OllamaClient;
use crate::openai_client::OpenAiClient;

/// LLM Provider selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenAi,
    Ollama,
}

impl LlmProvider {
    /// Model used when `[llm]` names none
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "gpt-4o-mini",
            LlmProvider::Ollama => "llama3.2:3b",
        }
    }
}

/// `[llm]` section of the agent configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProvider,

    // falls back to the provider's default model (OLLAMA_MODEL for ollama)
    pub model: Option<String>,
    pub temperature: f32,
    pub max_output_tokens: u32,

    // overrides the provider's default endpoint
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        let options = GenerationOptions::default();
        Self {
            provider: LlmProvider::default(),
            model: None,
            temperature: options.temperature,
            max_output_tokens: options.max_output_tokens,
            base_url: None,
        }
    }
}

impl LlmConfig {
    pub fn model(&self) -> String {
        if let Some(model) = &self.model {
            return model.clone();
        }
        match self.provider {
            LlmProvider::OpenAi => self.provider.default_model().to_string(),
            LlmProvider::Ollama => std::env::var("OLLAMA_MODEL")
                .unwrap_or_else(|_| self.provider.default_model().to_string()),
        }
    }

    pub fn options(&self) -> GenerationOptions {
        GenerationOptions {
            model: self.model(),
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        }
    }
}

/// Build the configured client. OpenAI reads its key from OPENAI_API_KEY.
pub fn build_generator(config: &LlmConfig) -> Result<Box<dyn TextGenerator>, LlmError> {
    let generator: Box<dyn TextGenerator> = match config.provider {
        LlmProvider::OpenAi => {
            let client = OpenAiClient::from_env()?;
            match &config.base_url {
                Some(url) => Box::new(client.with_endpoint(url.clone())),
                None => Box::new(client),
            }
        }
        LlmProvider::Ollama => match &config.base_url {
            Some(url) => Box::new(OllamaClient::new(url.clone())),
            None => Box::new(OllamaClient::from_env()),
        },
    };
    Ok(generator)
}
