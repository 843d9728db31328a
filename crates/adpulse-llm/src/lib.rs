// AdPulse LLM - text generation clients shared by the marketing agents

pub mod llm_client;
pub mod ollama_client;
pub mod openai_client;
pub mod provider;

pub use llm_client::{GenerationOptions, LlmError, TextGenerator};
pub use ollama_client::OllamaClient;
pub use openai_client::OpenAiClient;
pub use provider::{build_generator, LlmConfig, LlmProvider};
