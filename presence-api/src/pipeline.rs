//! Question → trusted source → summary.
//!
//! Stages run strictly in order; the first failure aborts the request and
//! later stages are never invoked.
use presence_common::{PresenceError, Result, Stage};
use presence_config::PresenceConfig;
use presence_llm::build_llm_client;
use presence_llm::summarizer::{LlmSummarizer, Summarizer};
use presence_web::{
    ContentExtractor, ExtractedContent, GoogleSearchApi, SearchResolver, SearchResult,
    WebContentExtractor,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;

pub const DAILY_HISTORY_URL: &str = "https://www.onthisday.com/today/events.php";
pub const DAILY_HISTORY_FALLBACK_TITLE: &str = "Today in history";

/// Terminal output of a full pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerBundle {
    pub title: String,
    pub summary: String,
    pub url: String,
}

/// Upper bound on each stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTimeouts {
    pub search: Duration,
    pub extract: Duration,
    pub summarize: Duration,
}

impl Default for StageTimeouts {
    fn default() -> Self {
        Self {
            search: Duration::from_secs(15),
            extract: Duration::from_secs(20),
            summarize: Duration::from_secs(60),
        }
    }
}

impl StageTimeouts {
    pub fn from_config(cfg: &PresenceConfig) -> Self {
        Self {
            search: cfg.search.timeout(),
            extract: cfg.extract.timeout(),
            summarize: cfg.llm.timeout(),
        }
    }

    fn for_stage(&self, stage: Stage) -> Duration {
        match stage {
            Stage::Search => self.search,
            Stage::Extract => self.extract,
            Stage::Summarize => self.summarize,
        }
    }
}

pub struct Pipeline {
    search: Arc<dyn SearchResolver>,
    extractor: Arc<dyn ContentExtractor>,
    summarizer: Arc<dyn Summarizer>,
    timeouts: StageTimeouts,
    daily_url: String,
    daily_fallback_title: String,
}

impl Pipeline {
    pub fn new(
        search: Arc<dyn SearchResolver>,
        extractor: Arc<dyn ContentExtractor>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            search,
            extractor,
            summarizer,
            timeouts: StageTimeouts::default(),
            daily_url: DAILY_HISTORY_URL.to_string(),
            daily_fallback_title: DAILY_HISTORY_FALLBACK_TITLE.to_string(),
        }
    }

    /// Wire the production collaborators from configuration.
    pub fn from_config(cfg: &PresenceConfig) -> Result<Self> {
        let search = GoogleSearchApi::from_config(&cfg.search)?;
        let extractor = WebContentExtractor::from_config(&cfg.extract)?;
        let summarizer = LlmSummarizer::new(build_llm_client(&cfg.llm)?);

        Ok(Self::new(Arc::new(search), Arc::new(extractor), Arc::new(summarizer))
            .with_timeouts(StageTimeouts::from_config(cfg))
            .with_daily_history(&cfg.daily_history.url, &cfg.daily_history.fallback_title))
    }

    pub fn with_timeouts(mut self, timeouts: StageTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_daily_history(mut self, url: &str, fallback_title: &str) -> Self {
        self.daily_url = url.to_string();
        self.daily_fallback_title = fallback_title.to_string();
        self
    }

    pub async fn search(&self, query: &str) -> Result<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PresenceError::Validation("query is empty".to_string()));
        }
        self.stage(Stage::Search, self.search.resolve(query)).await
    }

    pub async fn extract(&self, url: &str) -> Result<ExtractedContent> {
        self.stage(Stage::Extract, self.extractor.extract(url)).await
    }

    pub async fn summarize(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(PresenceError::Validation("text is empty".to_string()));
        }
        self.stage(Stage::Summarize, self.summarizer.summarize(text))
            .await
    }

    /// Run search, extraction and summarization for one question.
    pub async fn answer(&self, question: &str) -> Result<AnswerBundle> {
        let question = question.trim();
        if question.is_empty() {
            return Err(PresenceError::Validation("question is empty".to_string()));
        }
        let span = tracing::info_span!("answer", question = %question);
        async {
            let hit = self.search(question).await?;
            let page = self.extract(&hit.url).await?;
            let summary = self.summarize(&page.content_text).await?;
            tracing::info!(url = %hit.url, title = %page.title, "answer.done");
            Ok(AnswerBundle {
                title: page.title,
                summary,
                url: hit.url,
            })
        }
        .instrument(span)
        .await
    }

    /// Summarize the configured "on this day" page.
    pub async fn daily_history(&self) -> Result<AnswerBundle> {
        let span = tracing::info_span!("daily_history", url = %self.daily_url);
        async {
            let page = self.extract(&self.daily_url).await?;
            let summary = self.summarize(&page.content_text).await?;
            let title = if page.title.trim().is_empty() {
                self.daily_fallback_title.clone()
            } else {
                page.title
            };
            Ok(AnswerBundle {
                title,
                summary,
                url: self.daily_url.clone(),
            })
        }
        .instrument(span)
        .await
    }

    async fn stage<T, E, F>(&self, stage: Stage, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, E>>,
        E: Into<PresenceError>,
    {
        let limit = self.timeouts.for_stage(stage);
        let started = Instant::now();
        let outcome = tokio::time::timeout(limit, fut).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(Ok(value)) => {
                tracing::info!(stage = %stage, elapsed_ms, "stage.ok");
                Ok(value)
            }
            Ok(Err(err)) => {
                let err = err.into();
                tracing::warn!(stage = %stage, elapsed_ms, error = %err, "stage.failed");
                Err(err)
            }
            Err(_) => {
                tracing::warn!(stage = %stage, elapsed_ms, "stage.timeout");
                Err(PresenceError::Timeout {
                    stage,
                    after_ms: limit.as_millis() as u64,
                })
            }
        }
    }
}
