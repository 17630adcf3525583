use crate::api::{Answer, ClientError, PresenceApi};

/// Search, extract and summarize through the three granular endpoints.
///
/// The question is trimmed first; the first failing call aborts the flow and
/// its `{error}` message is surfaced as-is.
pub async fn run_search_flow(api: &PresenceApi, question: &str) -> Result<Answer, ClientError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(ClientError::EmptyQuestion);
    }

    let hit = api.search(question).await?;
    if hit.url.is_empty() {
        return Err(ClientError::Incomplete("Search failed."));
    }

    let page = api.fetch_and_extract(&hit.url).await?;
    if page.content_text.is_empty() {
        return Err(ClientError::Incomplete("Failed to extract website content."));
    }

    let summary = api.summarize(&page.content_text).await?;
    if summary.is_empty() {
        return Err(ClientError::Incomplete("Summarization failed."));
    }

    Ok(Answer {
        title: page.title,
        summary,
        url: hit.url,
    })
}
