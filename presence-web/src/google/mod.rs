//! Google Custom Search JSON API.
pub mod client;
pub mod types;

pub use client::GoogleSearchApi;
