use super::types::CseResponse;
use crate::search::{SearchError, SearchResolver, SearchResult, restrict_to_trusted};
use async_trait::async_trait;
use presence_config::SearchConfig;
use presence_http::{Auth, HttpClient, RequestOpts};
use std::borrow::Cow;
use std::time::{Duration, Instant};

pub const GOOGLE_SEARCH_BASE_URL: &str = "https://www.googleapis.com";
const SEARCH_PATH: &str = "customsearch/v1";

/// Minimal client for the Custom Search JSON API.
///
/// Credentials are optional at construction; a resolver without them fails
/// every lookup with [`SearchError::Config`] and never touches the network.
#[derive(Clone)]
pub struct GoogleSearchApi {
    http: HttpClient,
    api_key: Option<String>,
    engine_id: Option<String>,
}

impl GoogleSearchApi {
    pub fn new(
        endpoint: &str,
        api_key: Option<String>,
        engine_id: Option<String>,
    ) -> Result<Self, SearchError> {
        let base = if endpoint.ends_with('/') {
            endpoint.to_string()
        } else {
            format!("{endpoint}/")
        };
        let http = HttpClient::new(&base)?;
        Ok(Self {
            http,
            api_key,
            engine_id,
        })
    }

    pub fn from_config(cfg: &SearchConfig) -> Result<Self, SearchError> {
        Ok(Self::new(&cfg.endpoint, cfg.api_key.clone(), cfg.engine_id.clone())?
            .with_timeout(cfg.timeout()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    fn credentials(&self) -> Result<(&str, &str), SearchError> {
        match (self.api_key.as_deref(), self.engine_id.as_deref()) {
            (Some(key), Some(cx)) => Ok((key, cx)),
            _ => Err(SearchError::Config(
                "Google API key or CSE ID is not configured.".to_string(),
            )),
        }
    }
}

#[async_trait]
impl SearchResolver for GoogleSearchApi {
    async fn resolve(&self, query: &str) -> Result<SearchResult, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        let (key, cx) = self.credentials()?;
        let q = restrict_to_trusted(query);

        let started = Instant::now();
        tracing::info!(target: "web.google", query = %query, "google.search.start");

        let resp: CseResponse = match self
            .http
            .get_json(
                SEARCH_PATH,
                RequestOpts {
                    auth: Some(Auth::Query {
                        name: "key",
                        value: Cow::Borrowed(key),
                    }),
                    query: Some(vec![("q", Cow::Owned(q)), ("cx", Cow::Borrowed(cx))]),
                    retries: Some(0),
                    ..Default::default()
                },
            )
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(
                    target: "web.google",
                    query = %query,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %e,
                    "google.search.error"
                );
                return Err(e.into());
            }
        };

        let first = resp
            .items
            .and_then(|items| items.into_iter().next())
            .ok_or(SearchError::NoResults)?;

        tracing::info!(
            target: "web.google",
            query = %query,
            url = %first.link,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "google.search.success"
        );

        Ok(SearchResult {
            url: first.link,
            title: first.title,
        })
    }
}
