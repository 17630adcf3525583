use async_trait::async_trait;
use presence_common::{PresenceError, Stage};
use presence_http::HttpError;
use serde::{Deserialize, Serialize};

/// Restriction appended to every query sent to the search oracle.
pub const TRUSTED_SITES: &str = " site:.gov OR site:.org OR site:.edu";

/// Top hit returned by a [`SearchResolver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
}

#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error("Query cannot be empty.")]
    EmptyQuery,

    #[error("search is not configured: {0}")]
    Config(String),

    #[error("No results found.")]
    NoResults,

    #[error("search request failed: {0}")]
    Http(#[from] HttpError),
}

impl From<SearchError> for PresenceError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::EmptyQuery => PresenceError::Validation(err.to_string()),
            SearchError::NoResults => PresenceError::not_found(Stage::Search, err.to_string()),
            SearchError::Config(_) | SearchError::Http(_) => {
                PresenceError::upstream(Stage::Search, err.to_string())
            }
        }
    }
}

/// Query → single candidate URL on a trusted domain.
#[async_trait]
pub trait SearchResolver: Send + Sync {
    async fn resolve(&self, query: &str) -> Result<SearchResult, SearchError>;
}

/// Append the trusted-domain restriction to a user query.
pub fn restrict_to_trusted(query: &str) -> String {
    format!("{query}{TRUSTED_SITES}")
}
