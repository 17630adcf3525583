//! Heuristic main-content extraction.
//!
//! No readability scoring: noise elements are dropped, a main container is
//! picked by a fixed priority list, and paragraphs (or list items, for
//! list-shaped pages) are collected as text blocks.
use presence_common::{PresenceError, Stage};
use presence_http::HttpError;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

/// List-item blocks kept when a page has no paragraphs.
pub const DEFAULT_MAX_LIST_ITEMS: usize = 40;

const NOISE: &str = "script, style, noscript, nav, footer, header, aside";
const CONTAINERS: [&str; 3] = ["article", "main", "#content"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedContent {
    pub title: String,
    pub content_text: String,
    pub content_html: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    #[error("Missing URL")]
    MissingUrl,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Fetch(#[from] HttpError),

    #[error("No readable content found")]
    NoContent,
}

impl From<ExtractError> for PresenceError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::MissingUrl => PresenceError::Validation(err.to_string()),
            ExtractError::NoContent => PresenceError::not_found(Stage::Extract, err.to_string()),
            ExtractError::InvalidUrl(_) | ExtractError::Fetch(_) => {
                PresenceError::upstream(Stage::Extract, err.to_string())
            }
        }
    }
}

/// Extract title and body text from an HTML document.
///
/// `url` is only used as the title of last resort.
pub fn extract_main_content(
    url: &str,
    html: &str,
    max_list_items: usize,
) -> Result<ExtractedContent, ExtractError> {
    let mut doc = Html::parse_document(html);
    strip_noise(&mut doc);

    let root = doc.root_element();
    let container = CONTAINERS
        .iter()
        .find_map(|css| first_match(root, css))
        .or_else(|| first_match(root, "body"))
        .unwrap_or(root);

    let mut blocks = text_blocks(container, "p");
    if blocks.is_empty() {
        blocks = text_blocks(container, "li");
        blocks.truncate(max_list_items);
    }
    if blocks.is_empty() {
        return Err(ExtractError::NoContent);
    }

    // The heading is only trimmed; the document title also collapses whitespace.
    let heading =
        first_match(root, "h1").map(|el| el.text().collect::<String>().trim().to_string());
    let doc_title = first_match(root, "title").map(|el| {
        el.text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    });
    let title = [heading, doc_title]
        .into_iter()
        .flatten()
        .find(|t| !t.is_empty())
        .unwrap_or_else(|| url.to_string());

    let content_html = blocks
        .iter()
        .map(|b| format!("<p>{}</p>", escape_html(b)))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(ExtractedContent {
        title,
        content_text: blocks.join("\n\n"),
        content_html,
    })
}

/// Detach noise subtrees so later selections never see them.
fn strip_noise(doc: &mut Html) {
    let Ok(sel) = Selector::parse(NOISE) else {
        return;
    };
    // `Html::select` walks the whole arena, detached nodes included; walk
    // from the root element instead.
    let ids: Vec<_> = doc.root_element().select(&sel).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn first_match<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let sel = Selector::parse(css).ok()?;
    scope.select(&sel).next()
}

fn text_blocks(scope: ElementRef<'_>, css: &str) -> Vec<String> {
    let Ok(sel) = Selector::parse(css) else {
        return Vec::new();
    };
    scope
        .select(&sel)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
