use crate::extract::{DEFAULT_MAX_LIST_ITEMS, ExtractError, ExtractedContent, extract_main_content};
use async_trait::async_trait;
use presence_config::ExtractConfig;
use presence_http::{ClientOptions, HttpClient, RequestOpts, TextResponse};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "PresenceCircleBot/1.0 (+https://example.com)";
pub const DEFAULT_MAX_REDIRECTS: usize = 5;
const HTML_ACCEPT: &str = "text/html,application/xhtml+xml";

/// Retrieves a document by absolute URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<TextResponse, ExtractError>;
}

/// URL → [`ExtractedContent`].
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<ExtractedContent, ExtractError>;
}

/// [`PageFetcher`] over the shared HTTP client.
#[derive(Clone)]
pub struct HttpPageFetcher {
    http: HttpClient,
}

impl HttpPageFetcher {
    pub fn new(user_agent: &str, max_redirects: usize) -> Result<Self, ExtractError> {
        let http = HttpClient::unanchored(ClientOptions {
            user_agent: Some(user_agent.to_string()),
            max_redirects,
            ..Default::default()
        })?;
        Ok(Self { http })
    }

    pub fn from_config(cfg: &ExtractConfig) -> Result<Self, ExtractError> {
        Ok(Self::new(&cfg.user_agent, cfg.max_redirects)?.with_timeout(cfg.timeout()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &Url) -> Result<TextResponse, ExtractError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(HTML_ACCEPT));
        let page = self
            .http
            .get_text(
                url.as_str(),
                RequestOpts {
                    headers: Some(headers),
                    ..Default::default()
                },
            )
            .await?;
        Ok(page)
    }
}

/// Fetch-then-extract over any [`PageFetcher`].
pub struct WebContentExtractor {
    fetcher: Arc<dyn PageFetcher>,
    max_list_items: usize,
}

impl WebContentExtractor {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            max_list_items: DEFAULT_MAX_LIST_ITEMS,
        }
    }

    pub fn from_config(cfg: &ExtractConfig) -> Result<Self, ExtractError> {
        let fetcher = HttpPageFetcher::from_config(cfg)?;
        Ok(Self::new(Arc::new(fetcher)).with_max_list_items(cfg.max_list_items))
    }

    pub fn with_max_list_items(mut self, n: usize) -> Self {
        self.max_list_items = n;
        self
    }
}

#[async_trait]
impl ContentExtractor for WebContentExtractor {
    async fn extract(&self, url: &str) -> Result<ExtractedContent, ExtractError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ExtractError::MissingUrl);
        }
        let parsed = Url::parse(url).map_err(|e| ExtractError::InvalidUrl(e.to_string()))?;

        let started = Instant::now();
        let page = self.fetcher.fetch(&parsed).await?;
        tracing::debug!(
            target: "web.extract",
            url = %url,
            final_url = %page.url,
            status = %page.status,
            content_type = page.content_type.as_deref().unwrap_or("-"),
            bytes = page.body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "extract.fetched"
        );

        let content = extract_main_content(url, &page.body, self.max_list_items)?;
        tracing::info!(
            target: "web.extract",
            url = %url,
            title = %content.title,
            text_len = content.content_text.len(),
            "extract.done"
        );
        Ok(content)
    }
}
