//! Minimal HTTP client with safe logging, bounded retries, and flexible auth.
//!
//! - JSON helpers ([`HttpClient::get_json`], [`HttpClient::post_json`]) for API oracles
//! - A text helper ([`HttpClient::get_text`]) for fetching HTML documents
//! - Request options: headers, [`Auth`], query params, timeout, retries
//! - Client options: connect timeout, `User-Agent`, redirect cap
//! - Redacts sensitive query params and headers; never logs secret values
//! - Retries 429/5xx with exponential backoff and `Retry-After` support when a
//!   retry budget is configured (the default budget is zero)
//! - Optional *raw* request/response logging via `PRESENCE_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust,no_run
//! # async fn demo() -> Result<(), presence_http::HttpError> {
//! let client = presence_http::HttpClient::new("https://api.example.com")?;
//! let got: serde_json::Value = client
//!     .get_json("v1/items", presence_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), retries, and final errors,
//! plus raw request/response lines (target `http.raw`) when enabled.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use reqwest::{Client, Method, StatusCode, Url, redirect};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::env;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::sleep;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "PRESENCE_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const SNIPPET_MAX: usize = 500;

const SECRET_PARAMS: &[&str] = &[
    "access_token",
    "authorization",
    "auth",
    "key",
    "api_key",
    "apikey",
    "token",
    "secret",
    "client_secret",
    "bearer",
];

const SECRET_HEADERS: &[&str] = &[
    "authorization",
    "x-goog-api-key",
    "x-api-key",
    "x-subscription-token",
];

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

fn is_secret_param(name: &str) -> bool {
    SECRET_PARAMS.contains(&name.to_ascii_lowercase().as_str())
}

fn is_secret_header(name: &str) -> bool {
    SECRET_HEADERS.contains(&name.to_ascii_lowercase().as_str())
}

/// Copy of `url` with secret query values replaced by `<redacted>`.
pub fn redact_url(url: &Url) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if is_secret_param(&k) {
                "<redacted>".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();

    let mut out = url.clone();
    if pairs.is_empty() {
        return out;
    }
    out.query_pairs_mut().clear().extend_pairs(pairs);
    out
}

/// Render a best-effort curl command for repro/debug, with secrets redacted.
fn make_curl(method: &Method, url: &Url, headers: &HeaderMap, body: Option<&[u8]>) -> String {
    let mut parts = vec!["curl".to_string(), format!("-X{}", method)];
    for (name, val) in redact_headers(headers) {
        parts.push(format!("-H '{}: {}'", name, val.replace('\'', r"'\''")));
    }
    if let Some(bytes) = body {
        match std::str::from_utf8(bytes) {
            Ok(s) => {
                let mut s = s.to_string();
                if s.len() > RAW_MAX_BODY {
                    s.truncate(floor_char_boundary(&s, RAW_MAX_BODY));
                    s.push('…');
                }
                parts.push(format!("-d '{}'", s.replace('\'', r"'\''")));
            }
            Err(_) => parts.push(format!("--data-binary @- # ({} bytes)", bytes.len())),
        }
    }
    parts.push(format!("'{}'", redact_url(url).as_str()));
    parts.join(" ")
}

fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let val = if is_secret_header(&key) {
                "<redacted>".to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (key, val)
        })
        .collect()
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}, request_id={request_id}")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
    },
}

impl HttpError {
    /// HTTP status of an [`HttpError::Api`] failure.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    fn from_send(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else {
            HttpError::Network(err.to_string())
        }
    }
}

// ==============================
// Auth & Request Options
// ==============================

/// Authentication strategies supported by the HTTP client helpers.
///
/// ```
/// use presence_http::Auth;
/// use std::borrow::Cow;
///
/// let auth = Auth::Query { name: "key", value: Cow::Borrowed("secret") };
/// match auth {
///     Auth::Query { name, .. } => assert_eq!(name, "key"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// Custom header (e.g., Gemini: `x-goog-api-key`)
    Header {
        name: HeaderName,
        value: HeaderValue,
    },
    /// Auth via query param (e.g., Google Custom Search: `key`)
    Query {
        name: &'a str,
        value: Cow<'a, str>,
    },
    None,
}

impl Auth<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Auth::Header { .. } => "header",
            Auth::Query { .. } => "query",
            Auth::None => "none",
        }
    }
}

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use presence_http::{Auth, RequestOpts};
/// use std::borrow::Cow;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     retries: Some(0),
///     auth: Some(Auth::Query {
///         name: "key",
///         value: Cow::Borrowed("demo"),
///     }),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(!opts.allow_absolute);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub retries: Option<usize>,
    pub auth: Option<Auth<'a>>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
    /// If true and `path` is an absolute URL, use it as-is (ignore base).
    pub allow_absolute: bool,
}

/// Construction-time settings baked into the underlying `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct ClientOptions {
    pub connect_timeout: Duration,
    /// Sent as `User-Agent` on every request when set.
    pub user_agent: Option<String>,
    /// Redirects followed before the request fails.
    pub max_redirects: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            user_agent: None,
            max_redirects: 10,
        }
    }
}

/// Successful text response, after redirects.
#[derive(Clone, Debug)]
pub struct TextResponse {
    /// Final URL once redirects were followed.
    pub url: Url,
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

struct RawResponse {
    url: Url,
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    req_id: String,
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Option<Url>,
    inner: Client,
    pub default_timeout: Duration,
    pub max_retries: usize,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// ```no_run
    /// use presence_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// assert_eq!(client.max_retries, 0);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        Self::with_options(base, ClientOptions::default())
    }

    /// Construct a client anchored to a base URL with custom client options.
    pub fn with_options(base: &str, options: ClientOptions) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        Self::build(Some(base), options)
    }

    /// Construct a client for absolute URLs only (arbitrary web pages).
    pub fn unanchored(options: ClientOptions) -> Result<Self, HttpError> {
        Self::build(None, options)
    }

    fn build(base: Option<Url>, options: ClientOptions) -> Result<Self, HttpError> {
        let mut builder = Client::builder()
            .connect_timeout(options.connect_timeout)
            .redirect(redirect::Policy::limited(options.max_redirects));
        if let Some(ua) = &options.user_agent {
            builder = builder.user_agent(ua.as_str());
        }
        let inner = builder.build().map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
            max_retries: 0,
        })
    }

    /// Override the default per-request timeout.
    ///
    /// ```no_run
    /// use presence_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?
    ///     .with_timeout(Duration::from_secs(2));
    /// assert_eq!(client.default_timeout, Duration::from_secs(2));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// Override the default retry budget (zero unless set).
    pub fn with_retries(mut self, n: usize) -> Self {
        self.max_retries = n;
        self
    }

    /// GET JSON with per-request options.
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let raw = self.send::<()>(Method::GET, path, None, opts).await?;
        decode_json(raw)
    }

    /// POST a JSON body and decode a JSON response.
    pub async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let raw = self.send(Method::POST, path, Some(body), opts).await?;
        decode_json(raw)
    }

    /// GET a textual document (HTML, plain text). Non-UTF-8 bytes are replaced.
    pub async fn get_text(
        &self,
        path: &str,
        opts: RequestOpts<'_>,
    ) -> Result<TextResponse, HttpError> {
        let raw = self.send::<()>(Method::GET, path, None, opts).await?;
        let content_type = raw
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Ok(TextResponse {
            url: raw.url,
            status: raw.status,
            content_type,
            body: String::from_utf8_lossy(&raw.body).into_owned(),
        })
    }

    fn resolve_url(&self, path: &str, allow_absolute: bool) -> Result<Url, HttpError> {
        if allow_absolute || self.base.is_none() {
            if let Ok(abs) = Url::parse(path) {
                return Ok(abs);
            }
        }
        match &self.base {
            Some(base) => base.join(path).map_err(|e| HttpError::Url(e.to_string())),
            None => Err(HttpError::Url(format!("not an absolute URL: {path}"))),
        }
    }

    // ==============================
    // Core request implementation
    // ==============================

    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        opts: RequestOpts<'_>,
    ) -> Result<RawResponse, HttpError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.resolve_url(path, opts.allow_absolute)?;
        let max_retries = opts.retries.unwrap_or(self.max_retries);
        let timeout = opts.timeout.unwrap_or(self.default_timeout);

        let mut query: Vec<(&str, Cow<'_, str>)> = opts.query.clone().unwrap_or_default();
        if let Some(Auth::Query { name, value }) = &opts.auth {
            query.push((*name, value.clone()));
        }
        let pairs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_ref())).collect();

        let body_bytes = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| HttpError::Build(e.to_string()))?;

        let redacted_q: Vec<(String, String)> = query
            .iter()
            .map(|(k, v)| {
                let v = if is_secret_param(k) {
                    "<redacted>".to_string()
                } else {
                    v.to_string()
                };
                ((*k).to_string(), v)
            })
            .collect();
        let auth_kind = opts.auth.as_ref().map(Auth::kind).unwrap_or("none");
        let req_id = uuid::Uuid::new_v4().simple().to_string();

        let mut attempt = 0usize;
        loop {
            // ----- Build request -----
            let mut rb = self
                .inner
                .request(method.clone(), url.clone())
                .timeout(timeout);
            if !pairs.is_empty() {
                rb = rb.query(&pairs);
            }
            if let Some(bytes) = &body_bytes {
                rb = rb
                    .header(CONTENT_TYPE, "application/json")
                    .body(bytes.clone());
            }
            if let Some(hdrs) = &opts.headers {
                rb = rb.headers(hdrs.clone());
            }
            if let Some(Auth::Header { name, value }) = &opts.auth {
                rb = rb.header(name, value);
            }

            tracing::debug!(
                req_id = %req_id,
                attempt = attempt + 1,
                max_retries,
                method = %method,
                host_path = %format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
                query = ?redacted_q,
                timeout_ms = timeout.as_millis() as u64,
                auth_kind,
                has_body = body_bytes.is_some(),
                "http.request.start"
            );

            if raw_enabled() {
                let mut shown = url.clone();
                if !pairs.is_empty() {
                    shown.query_pairs_mut().extend_pairs(&pairs);
                }
                let curl = make_curl(
                    &method,
                    &shown,
                    opts.headers.as_ref().unwrap_or(&HeaderMap::new()),
                    body_bytes.as_deref(),
                );
                tracing::debug!(target: "http.raw", %req_id, %curl, "request");
            }

            // ----- Send -----
            let t0 = Instant::now();
            let sent = match rb.send().await {
                Ok(resp) => {
                    let final_url = resp.url().clone();
                    let status = resp.status();
                    let headers = resp.headers().clone();
                    resp.bytes()
                        .await
                        .map(|b| (final_url, status, headers, b.to_vec()))
                }
                Err(err) => Err(err),
            };
            let (final_url, status, headers, bytes) = match sent {
                Ok(parts) => parts,
                Err(err) => {
                    let error = HttpError::from_send(err);
                    if attempt < max_retries {
                        attempt += 1;
                        let delay = backoff(attempt);
                        tracing::warn!(
                            req_id = %req_id,
                            attempt,
                            max_retries,
                            backoff_ms = delay.as_millis() as u64,
                            error = %error,
                            "http.retrying.network"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    tracing::warn!(req_id = %req_id, attempt, error = %error, "http.network_error");
                    return Err(error);
                }
            };
            let dur_ms = t0.elapsed().as_millis() as u64;

            let upstream_id = headers
                .get("x-request-id")
                .or_else(|| headers.get("x-correlation-id"))
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-")
                .to_string();

            tracing::debug!(
                req_id = %req_id,
                %status,
                duration_ms = dur_ms,
                body_len = bytes.len(),
                x_request_id = %upstream_id,
                "http.response.headers"
            );
            if final_url != url {
                tracing::debug!(
                    req_id = %req_id,
                    from = %redact_url(&url),
                    to = %redact_url(&final_url),
                    "http.redirected"
                );
            }

            if raw_enabled() {
                let end = bytes.len().min(RAW_MAX_BODY);
                let text = String::from_utf8_lossy(&bytes[..end]);
                tracing::info!(
                    target: "http.raw",
                    %req_id,
                    status = %status,
                    duration_ms = dur_ms,
                    headers = ?redact_headers(&headers),
                    body = %text,
                    truncated = bytes.len() > RAW_MAX_BODY
                );
            }

            let snippet = snip_body(&bytes);
            tracing::trace!(req_id = %req_id, body_snippet = %snippet, "http.response.body_snippet");

            if status.is_success() {
                return Ok(RawResponse {
                    url: final_url,
                    status,
                    headers,
                    body: bytes,
                    req_id,
                });
            }

            // ----- Non-success: maybe retry -----
            let is_429 = status == StatusCode::TOO_MANY_REQUESTS;
            if (is_429 || status.is_server_error()) && attempt < max_retries {
                attempt += 1;
                let delay = match retry_after_delay_secs(&headers) {
                    Some(secs) => Duration::from_secs(secs),
                    None if is_429 => backoff(attempt).max(Duration::from_millis(1100)),
                    None => backoff(attempt),
                };
                tracing::warn!(
                    req_id = %req_id,
                    %status,
                    attempt,
                    max_retries,
                    backoff_ms = delay.as_millis() as u64,
                    body_snippet = %snippet,
                    "http.retrying"
                );
                sleep(delay).await;
                continue;
            }

            let message = extract_error_message(&bytes)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            tracing::warn!(
                req_id = %req_id,
                %status,
                message = %message,
                x_request_id = %upstream_id,
                body_snippet = %snippet,
                "http.error"
            );
            return Err(HttpError::Api {
                status,
                message,
                request_id: upstream_id,
            });
        }
    }
}

// ==============================
// Helpers
// ==============================

fn decode_json<T: DeserializeOwned>(raw: RawResponse) -> Result<T, HttpError> {
    serde_json::from_slice::<T>(&raw.body).map_err(|e| {
        let snippet = snip_body(&raw.body);
        tracing::warn!(
            req_id = %raw.req_id,
            serde_line = e.line(),
            serde_col = e.column(),
            serde_err = %e,
            body_snippet = %snippet,
            "http.response.decode_error"
        );
        HttpError::Decode(e.to_string(), snippet)
    })
}

fn backoff(attempt: usize) -> Duration {
    let shift = attempt.saturating_sub(1).min(10) as u32;
    Duration::from_millis(200u64.saturating_mul(1u64 << shift))
}

/// Pull a human-readable message out of a JSON error body.
///
/// Understands `{"error":{"message":..}}` (Google APIs, OpenAI style) and
/// flat `{"error"|"message"|"detail": ".."}` bodies.
fn extract_error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    let nested = value
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str());
    let flat = ["error", "message", "detail"]
        .iter()
        .find_map(|k| value.get(*k).and_then(|v| v.as_str()));
    nested
        .or(flat)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

fn retry_after_delay_secs(h: &HeaderMap) -> Option<u64> {
    h.get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())?
        .trim()
        .parse()
        .ok()
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).into_owned();
    if snip.len() > SNIPPET_MAX {
        snip.truncate(floor_char_boundary(&snip, SNIPPET_MAX));
        snip.push_str("...");
    }
    snip
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    let mut end = max.min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_url_hides_secret_params_only() {
        let url = Url::parse("https://www.googleapis.com/customsearch/v1?q=flu+shots&key=abc&cx=123")
            .unwrap();
        let redacted = redact_url(&url);
        let pairs: Vec<(String, String)> = redacted
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("q".into(), "flu shots".into())));
        assert!(pairs.contains(&("key".into(), "<redacted>".into())));
        assert!(pairs.contains(&("cx".into(), "123".into())));
        assert!(!redacted.as_str().contains("abc"));
    }

    #[test]
    fn curl_never_contains_secrets() {
        let url = Url::parse("https://example.org/v1?key=topsecret&q=x").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-goog-api-key", HeaderValue::from_static("hunter2"));
        headers.insert("accept", HeaderValue::from_static("text/html"));
        let curl = make_curl(&Method::GET, &url, &headers, None);
        assert!(!curl.contains("topsecret"));
        assert!(!curl.contains("hunter2"));
        assert!(curl.contains("accept: text/html"));
    }

    #[test]
    fn error_message_prefers_nested_google_shape() {
        let body = br#"{"error":{"code":403,"message":"API key not valid","status":"PERMISSION_DENIED"}}"#;
        assert_eq!(extract_error_message(body).as_deref(), Some("API key not valid"));
        assert_eq!(
            extract_error_message(br#"{"error":"Missing query"}"#).as_deref(),
            Some("Missing query")
        );
        assert_eq!(extract_error_message(b"<html>nope</html>"), None);
    }

    #[test]
    fn snippets_respect_char_boundaries() {
        let body = "é".repeat(400);
        let snip = snip_body(body.as_bytes());
        assert!(snip.ends_with("..."));
        assert!(snip.len() <= SNIPPET_MAX + 3);
    }

    #[test]
    fn backoff_grows_and_saturates() {
        assert_eq!(backoff(1), Duration::from_millis(200));
        assert_eq!(backoff(2), Duration::from_millis(400));
        assert!(backoff(64) >= backoff(11));
    }

    #[test]
    fn unanchored_client_rejects_relative_paths() {
        let client = HttpClient::unanchored(ClientOptions::default()).unwrap();
        assert!(client.resolve_url("relative/path", false).is_err());
        assert!(client.resolve_url("https://example.edu/a", false).is_ok());
    }
}
