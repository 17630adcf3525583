mod common;

use presence_web::fetch::{DEFAULT_MAX_REDIRECTS, DEFAULT_USER_AGENT};
use presence_web::{
    ContentExtractor, ExtractError, HttpPageFetcher, PageFetcher, WebContentExtractor,
};
use std::sync::Arc;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn extractor() -> WebContentExtractor {
    let fetcher = HttpPageFetcher::new(DEFAULT_USER_AGENT, DEFAULT_MAX_REDIRECTS).unwrap();
    WebContentExtractor::new(Arc::new(fetcher))
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html; charset=utf-8")
}

#[tokio::test]
async fn fetches_with_bot_headers_and_extracts() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .and(header("accept", "text/html,application/xhtml+xml"))
        .respond_with(html(
            "<html><head><title>X</title></head><body><p>A.</p><p>B.</p></body></html>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let out = extractor()
        .extract(&format!("{}/page", server.uri()))
        .await
        .unwrap();
    assert_eq!(out.title, "X");
    assert_eq!(out.content_text, "A.\n\nB.");
}

#[tokio::test]
async fn fetcher_reports_html_content_type() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html("<p>A.</p>"))
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new(DEFAULT_USER_AGENT, DEFAULT_MAX_REDIRECTS).unwrap();
    let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
    let page = fetcher.fetch(&url).await.unwrap();
    assert_eq!(page.body, "<p>A.</p>");
    assert!(page.content_type.unwrap().starts_with("text/html"));
}

#[tokio::test]
async fn follows_redirects_to_the_article() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(html("<article><h1>Moved</h1><p>Here now.</p></article>"))
        .mount(&server)
        .await;

    let out = extractor()
        .extract(&format!("{}/old", server.uri()))
        .await
        .unwrap();
    assert_eq!(out.title, "Moved");
    assert_eq!(out.content_text, "Here now.");
}

#[tokio::test]
async fn http_failure_is_a_fetch_error() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&server)
        .await;

    let err = extractor()
        .extract(&format!("{}/missing", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::Fetch(_)), "got {err:?}");
}

#[tokio::test]
async fn blank_url_fails_before_fetching() {
    common::init_test_tracing();
    let err = extractor().extract("   ").await.unwrap_err();
    assert!(matches!(err, ExtractError::MissingUrl));

    let err = extractor().extract("not a url").await.unwrap_err();
    assert!(matches!(err, ExtractError::InvalidUrl(_)));
}

#[tokio::test]
async fn empty_page_is_no_content() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html("<html><body><nav><p>Menu</p></nav></body></html>"))
        .mount(&server)
        .await;

    let err = extractor().extract(&server.uri()).await.unwrap_err();
    assert_eq!(err.to_string(), "No readable content found");
}
