//! Plain-language summaries backed by an [`LlmClient`].
//!
//! The instruction template is the only control over output shape: there is
//! no retry, no chunking of long input, and the model's text is returned as-is.
use crate::traits::{LlmClient, LlmError};
use async_trait::async_trait;
use std::sync::Arc;

pub const SUMMARY_INSTRUCTIONS: &str = "Summarize the following text in simple language that an elderly person can understand.\nUse 2–4 short sentences, no jargon.";

/// Wrap `text` in the fixed summary template.
pub fn summary_prompt(text: &str) -> String {
    format!("{SUMMARY_INSTRUCTIONS}\n\nTEXT:\n{text}\n")
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String, LlmError>;
}

pub struct LlmSummarizer {
    llm: Arc<dyn LlmClient>,
}

impl LlmSummarizer {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, LlmError> {
        let prompt = summary_prompt(text);
        let response = self.llm.generate(&prompt, None, None, None).await?;

        if response.text.trim().is_empty() {
            return Err(LlmError::Api("empty summary".to_string()));
        }

        tracing::debug!(
            model = self.llm.model_name(),
            input_len = text.len(),
            summary_len = response.text.len(),
            tokens_used = ?response.tokens_used,
            "summarizer.done"
        );
        Ok(response.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_text_after_instructions() {
        let prompt = summary_prompt("Flu shots are free.");
        assert!(prompt.starts_with("Summarize the following text in simple language"));
        assert!(prompt.contains("2–4 short sentences, no jargon."));
        assert!(prompt.ends_with("TEXT:\nFlu shots are free.\n"));
    }
}
