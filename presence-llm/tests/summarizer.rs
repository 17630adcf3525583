mod common;

use async_trait::async_trait;
use presence_llm::summarizer::{LlmSummarizer, Summarizer};
use presence_llm::traits::{LlmClient, LlmError, LlmResponse};
use std::sync::{Arc, Mutex};

/// Records prompts and answers with a canned reply.
struct CannedLlm {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl CannedLlm {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl LlmClient for CannedLlm {
    async fn generate(
        &self,
        prompt: &str,
        _system_prompt: Option<&str>,
        _max_tokens: Option<u32>,
        _temperature: Option<f32>,
    ) -> Result<LlmResponse, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(LlmResponse {
            text: self.reply.clone(),
            model: Some("canned".into()),
            tokens_used: None,
        })
    }

    fn model_name(&self) -> &str {
        "canned"
    }
}

#[tokio::test]
async fn summary_is_the_oracle_text_verbatim() {
    common::init_test_tracing();
    let llm = CannedLlm::new("  Flu shots are free.\nAsk your clinic.  ");
    let summarizer = LlmSummarizer::new(llm.clone());

    let summary = summarizer
        .summarize("Long article about influenza vaccination.")
        .await
        .unwrap();

    assert_eq!(summary, "  Flu shots are free.\nAsk your clinic.  ");

    let prompts = llm.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("simple language that an elderly person can understand"));
    assert!(prompts[0].contains("TEXT:\nLong article about influenza vaccination."));
}

#[tokio::test]
async fn blank_oracle_text_is_an_error() {
    common::init_test_tracing();
    let summarizer = LlmSummarizer::new(CannedLlm::new("   "));

    let err = summarizer.summarize("anything").await.unwrap_err();
    assert!(matches!(err, LlmError::Api(_)));
}
