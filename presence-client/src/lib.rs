//! Presentation layer for the Presence answer service.
//!
//! Talks to the server only over HTTP ([`api::PresenceApi`]) and keeps all
//! view state in explicit values owned by the caller:
//!
//! - [`flow::run_search_flow`]: the shared search → extract → summarize calls
//! - [`view`]: `ElderView` history and `TeenSession` counters
//! - [`session`]: line commands for an interactive session
//! - [`render`]: plain-text output wrapped to the terminal width
pub mod api;
pub mod flow;
pub mod render;
pub mod session;
pub mod view;

pub use api::{Answer, ClientError, PresenceApi};
pub use flow::run_search_flow;
pub use view::{ElderView, Mode, SearchKind, TeenSession};
