mod common;

use presence_web::{GoogleSearchApi, SearchError, SearchResolver};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api(server: &MockServer) -> GoogleSearchApi {
    GoogleSearchApi::new(&server.uri(), Some("secret-key".into()), Some("engine-1".into()))
        .expect("client builds")
}

#[tokio::test]
async fn returns_first_item_verbatim() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param(
            "q",
            "flu shots for seniors site:.gov OR site:.org OR site:.edu",
        ))
        .and(query_param("key", "secret-key"))
        .and(query_param("cx", "engine-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "title": "Flu & You | CDC", "link": "https://www.cdc.gov/flu/highrisk/65over.htm" },
                { "title": "Second", "link": "https://example.org/second" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let hit = api(&server).resolve("flu shots for seniors").await.unwrap();
    assert_eq!(hit.url, "https://www.cdc.gov/flu/highrisk/65over.htm");
    assert_eq!(hit.title, "Flu & You | CDC");
}

#[tokio::test]
async fn no_items_is_no_results() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let err = api(&server).resolve("nothing here").await.unwrap_err();
    assert!(matches!(err, SearchError::NoResults), "got {err:?}");
}

#[tokio::test]
async fn upstream_error_is_not_retried() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": { "code": 503, "message": "Backend unavailable" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = api(&server).resolve("flu").await.unwrap_err();
    match err {
        SearchError::Http(e) => assert_eq!(e.status().map(|s| s.as_u16()), Some(503)),
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_credentials_skip_the_network() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let api = GoogleSearchApi::new(&server.uri(), None, Some("engine-1".into())).unwrap();
    let err = api.resolve("flu").await.unwrap_err();
    assert!(matches!(err, SearchError::Config(_)), "got {err:?}");
}
