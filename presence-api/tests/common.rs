#![allow(dead_code)]

use async_trait::async_trait;
use presence_api::Pipeline;
use presence_common::observability::{LogConfig, LogFormat};
use presence_llm::summarizer::Summarizer;
use presence_llm::traits::LlmError;
use presence_web::{
    ContentExtractor, ExtractError, ExtractedContent, SearchError, SearchResolver, SearchResult,
    extract_main_content,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::time::Duration;

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "presence-tests",
            log_dir: Some(std::env::temp_dir().join("presence-tests")),
            emit_stderr: true,
            format: if std::env::var("PRESENCE_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            default_filter: "debug".to_string(),
        };

        presence_common::observability::init_logging(config).unwrap_or_default()
    });
}

pub const PAGE_URL: &str = "https://example.gov/page";
pub const PAGE_HTML: &str =
    "<html><head><title>X</title></head><body><p>A.</p><p>B.</p></body></html>";

#[derive(Default)]
pub struct Calls(AtomicUsize);

impl Calls {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct FakeSearch {
    pub calls: Calls,
    pub fail: bool,
}

#[async_trait]
impl SearchResolver for FakeSearch {
    async fn resolve(&self, _query: &str) -> Result<SearchResult, SearchError> {
        self.calls.hit();
        if self.fail {
            return Err(SearchError::NoResults);
        }
        Ok(SearchResult {
            url: PAGE_URL.to_string(),
            title: "X".to_string(),
        })
    }
}

/// Runs the real extraction over a canned page.
pub struct FakeExtractor {
    pub calls: Calls,
    pub html: &'static str,
    pub delay: Option<Duration>,
}

#[async_trait]
impl ContentExtractor for FakeExtractor {
    async fn extract(&self, url: &str) -> Result<ExtractedContent, ExtractError> {
        self.calls.hit();
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        extract_main_content(url, self.html, 40)
    }
}

pub struct FakeSummarizer {
    pub calls: Calls,
    pub inputs: std::sync::Mutex<Vec<String>>,
    pub fail: bool,
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, LlmError> {
        self.calls.hit();
        self.inputs.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(LlmError::RateLimit);
        }
        Ok("Simple summary.".to_string())
    }
}

pub struct Fixture {
    pub search: Arc<FakeSearch>,
    pub extractor: Arc<FakeExtractor>,
    pub summarizer: Arc<FakeSummarizer>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_page(PAGE_HTML)
    }

    pub fn with_page(html: &'static str) -> Self {
        Self {
            search: Arc::new(FakeSearch {
                calls: Calls::default(),
                fail: false,
            }),
            extractor: Arc::new(FakeExtractor {
                calls: Calls::default(),
                html,
                delay: None,
            }),
            summarizer: Arc::new(FakeSummarizer {
                calls: Calls::default(),
                inputs: Default::default(),
                fail: false,
            }),
        }
    }

    pub fn failing_search(mut self) -> Self {
        self.search = Arc::new(FakeSearch {
            calls: Calls::default(),
            fail: true,
        });
        self
    }

    pub fn failing_summarizer(mut self) -> Self {
        self.summarizer = Arc::new(FakeSummarizer {
            calls: Calls::default(),
            inputs: Default::default(),
            fail: true,
        });
        self
    }

    pub fn slow_extractor(mut self, delay: Duration) -> Self {
        self.extractor = Arc::new(FakeExtractor {
            calls: Calls::default(),
            html: self.extractor.html,
            delay: Some(delay),
        });
        self
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(
            self.search.clone(),
            self.extractor.clone(),
            self.summarizer.clone(),
        )
    }
}
