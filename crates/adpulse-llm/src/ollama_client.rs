// Ollama Local LLM client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::llm_client::{GenerationOptions, LlmError, TextGenerator};

const PROVIDER: &str = "ollama";

#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: SamplingOptions,
}

#[derive(Serialize)]
struct SamplingOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    pub const DEFAULT_URL: &'static str = "http://localhost:11434";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create from OLLAMA_URL (default: http://localhost:11434)
    pub fn from_env() -> Self {
        let base_url = std::env::var("OLLAMA_URL").unwrap_or_else(|_| Self::DEFAULT_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.base_url);

        let request = GenerateRequest {
            model: &options.model,
            prompt,
            stream: false,
            options: SamplingOptions {
                temperature: options.temperature,
                num_predict: options.max_output_tokens,
            },
        };

        info!(provider = PROVIDER, model = %options.model, prompt_len = prompt.len(), "Requesting completion");

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError {
                provider: PROVIDER,
                message: error_text,
            });
        }

        let result: GenerateResponse = response.json().await?;
        let text = result.response.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyResponse(PROVIDER));
        }
        Ok(text.to_string())
    }

    fn provider(&self) -> &str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OllamaClient::new("http://localhost:11434/");
        assert_eq!(client.base_url(), "http://localhost:11434");
        assert_eq!(client.provider(), "ollama");
    }
}
