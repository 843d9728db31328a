// Text generation abstraction
// Agents only see this trait, concrete clients are injected by the caller

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("{provider} API error: {message}")]
    ApiError { provider: &'static str, message: String },

    #[error("{0} returned no completion")]
    EmptyResponse(&'static str),

    #[error("Missing API key (set {0})")]
    MissingApiKey(&'static str),
}

/// Per-request generation settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerationOptions {
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            max_output_tokens: 400,
        }
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for a single user prompt
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, LlmError>;

    /// Provider name for logging ("openai", "ollama")
    fn provider(&self) -> &str;
}

// let agents hold borrowed, boxed or shared generators
#[async_trait]
impl<'a, T: TextGenerator + ?Sized> TextGenerator for &'a T {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, LlmError> {
        (**self).generate(prompt, options).await
    }

    fn provider(&self) -> &str {
        (**self).provider()
    }
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, LlmError> {
        (**self).generate(prompt, options).await
    }

    fn provider(&self) -> &str {
        (**self).provider()
    }
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for std::sync::Arc<T> {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, LlmError> {
        (**self).generate(prompt, options).await
    }

    fn provider(&self) -> &str {
        (**self).provider()
    }
}
