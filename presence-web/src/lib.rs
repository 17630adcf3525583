//! Web discovery and acquisition for the answer pipeline.
//!
//! - Trusted-domain search resolver backed by Google Custom Search (`google`, `search`)
//! - Page fetching behind the [`fetch::PageFetcher`] seam (`fetch`)
//! - Heuristic main-content extraction over parsed HTML (`extract`)

pub mod extract;
pub mod fetch;
pub mod google;
pub mod search;

pub use extract::{ExtractError, ExtractedContent, extract_main_content};
pub use fetch::{ContentExtractor, HttpPageFetcher, PageFetcher, WebContentExtractor};
pub use google::GoogleSearchApi;
pub use search::{SearchError, SearchResolver, SearchResult};
