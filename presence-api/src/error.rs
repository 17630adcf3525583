use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use presence_common::{PresenceError, Stage};
use serde::{Deserialize, Serialize};

/// Failure payload returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Client-facing failure of one endpoint.
///
/// Messages are short and fixed per endpoint; the underlying
/// [`PresenceError`] is logged server side when the error is built.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("{message}")]
    Upstream {
        stage: Option<Stage>,
        message: String,
    },

    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    /// Map a pipeline failure to this endpoint's messages.
    ///
    /// `missing` is used when the pipeline itself rejects the input, `message`
    /// for every other failure.
    pub fn from_pipeline(
        err: PresenceError,
        missing: &'static str,
        message: impl FnOnce(&PresenceError) -> String,
    ) -> Self {
        tracing::error!(error = %err, stage = ?err.stage(), "request failed");
        let message = message(&err);
        match err {
            PresenceError::Validation(_) => ApiError::Validation(missing),
            PresenceError::NotFound { .. } => ApiError::NotFound(message),
            PresenceError::Upstream { stage, .. } | PresenceError::Timeout { stage, .. } => {
                ApiError::Upstream {
                    stage: Some(stage),
                    message,
                }
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { .. } | ApiError::NotFound(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
