use adpulse_llm::{GenerationOptions, LlmError, TextGenerator};
use async_trait::async_trait;
use std::sync::Mutex;

// records every prompt and replies with a canned answer
pub struct RecordingGenerator {
    reply: Result<String, String>,
    pub prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    async fn generate(&self, prompt: &str, _options: &GenerationOptions) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(|message| LlmError::ApiError {
            provider: "mock",
            message,
        })
    }

    fn provider(&self) -> &str {
        "mock"
    }
}
