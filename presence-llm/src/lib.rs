//! Provider-agnostic LLM integration for Presence.
//!
//! This crate exposes the [`traits::LlmClient`] interface, the Gemini
//! provider, and the [`summarizer`] that turns extracted page text into a
//! short plain-language summary.
//!
//! # Examples
//! ```no_run
//! use presence_config::PresenceConfigLoader;
//! use presence_llm::{build_llm_client, summarizer::{LlmSummarizer, Summarizer}};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = PresenceConfigLoader::new().load()?;
//! let summarizer = LlmSummarizer::new(build_llm_client(&cfg.llm)?);
//! let summary = summarizer.summarize("Flu shots are offered free at clinics.").await?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```
pub mod gemini;
pub mod summarizer;
pub mod traits;

use gemini::GeminiClient;
use presence_config::LlmConfig;
use std::sync::Arc;
use traits::{LlmClient, LlmError};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro";

/// Build the configured LLM client.
pub fn build_llm_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    match config {
        LlmConfig::Gemini {
            endpoint,
            api_key,
            model,
            temperature,
            max_tokens,
            ..
        } => {
            if api_key.is_none() {
                tracing::warn!("Gemini API key not configured; summaries will fail");
            }
            let model = if model.trim().is_empty() {
                DEFAULT_GEMINI_MODEL
            } else {
                model.as_str()
            };
            let client = GeminiClient::with_endpoint(endpoint, api_key.clone(), model)?
                .with_sampling(*temperature, *max_tokens)
                .with_timeout(config.timeout());
            Ok(Arc::new(client))
        }
    }
}
