//! HTTP surface of the Presence answer service.
//!
//! - [`pipeline::Pipeline`]: search → extract → summarize orchestration
//! - [`routes::build_router`]: axum router exposing the JSON endpoints
//! - [`serve`]: bind, serve, and shut down when cancelled
pub mod error;
pub mod pipeline;
pub mod routes;

pub use error::{ApiError, ErrorBody};
pub use pipeline::{AnswerBundle, Pipeline, StageTimeouts};
pub use routes::{AppState, build_router};

use presence_common::PresenceError;
use presence_config::PresenceConfig;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(thiserror::Error, Debug)]
pub enum ServeError {
    #[error("failed to build pipeline: {0}")]
    Pipeline(#[from] PresenceError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serve the API on the configured address until `cancel` fires.
pub async fn serve(cfg: &PresenceConfig, cancel: CancellationToken) -> Result<(), ServeError> {
    let pipeline = Pipeline::from_config(cfg)?;
    let router = build_router(
        AppState::new(pipeline),
        Duration::from_secs(cfg.server.request_timeout_secs),
    );

    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!(%addr, "presence api listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
            tracing::info!("shutting down gracefully");
        })
        .await?;
    Ok(())
}
