use presence_http::{HttpClient, HttpError, RequestOpts};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5050";

/// `{ title, summary, url }` as returned by the answer endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub title: String,
    pub summary: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content_text: String,
    #[serde(default)]
    pub content_html: String,
}

#[derive(Debug, Clone, Deserialize)]
struct SummaryBody {
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Clone, Deserialize)]
struct HealthBody {
    status: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("Please enter a question.")]
    EmptyQuestion,

    /// The server answered with an `{error}` body.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// A success response without the field the next step needs.
    #[error("{0}")]
    Incomplete(&'static str),

    #[error("could not reach the server: {0}")]
    Http(HttpError),
}

impl From<HttpError> for ClientError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Api {
                status, message, ..
            } => ClientError::Server {
                status: status.as_u16(),
                message,
            },
            other => ClientError::Http(other),
        }
    }
}

/// Typed client for the Presence HTTP API.
#[derive(Clone)]
pub struct PresenceApi {
    http: HttpClient,
}

impl PresenceApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        // Summaries can take most of a minute upstream.
        let http = HttpClient::new(&base)?.with_timeout(Duration::from_secs(120));
        Ok(Self { http })
    }

    /// `true` when the health endpoint answers `ok`.
    pub async fn health(&self) -> bool {
        match self
            .http
            .get_json::<HealthBody>(
                "api/health",
                RequestOpts {
                    timeout: Some(Duration::from_secs(5)),
                    ..Default::default()
                },
            )
            .await
        {
            Ok(body) => body.status == "ok",
            Err(e) => {
                tracing::debug!(error = %e, "health check failed");
                false
            }
        }
    }

    pub async fn search(&self, query: &str) -> Result<SearchHit, ClientError> {
        let hit: SearchHit = self
            .http
            .post_json("api/search", &json!({ "query": query }), RequestOpts::default())
            .await?;
        Ok(hit)
    }

    pub async fn fetch_and_extract(&self, url: &str) -> Result<PageContent, ClientError> {
        let page: PageContent = self
            .http
            .post_json(
                "api/fetch-and-extract",
                &json!({ "url": url }),
                RequestOpts::default(),
            )
            .await?;
        Ok(page)
    }

    pub async fn summarize(&self, text: &str) -> Result<String, ClientError> {
        let body: SummaryBody = self
            .http
            .post_json("api/summarize", &json!({ "text": text }), RequestOpts::default())
            .await?;
        Ok(body.summary)
    }

    pub async fn daily_history(&self) -> Result<Answer, ClientError> {
        Ok(self
            .http
            .get_json("api/daily-history", RequestOpts::default())
            .await?)
    }

    /// Single-call variant of [`crate::flow::run_search_flow`].
    pub async fn answer(&self, question: &str) -> Result<Answer, ClientError> {
        Ok(self
            .http
            .post_json(
                "api/answer",
                &json!({ "question": question }),
                RequestOpts::default(),
            )
            .await?)
    }
}
