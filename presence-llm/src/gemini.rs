use crate::traits::{LlmClient, LlmError, LlmResponse};
use async_trait::async_trait;
use presence_http::{Auth, HttpClient, HttpError, RequestOpts};
use reqwest::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    total_token_count: Option<u32>,
}

/// Google Gemini `generateContent` client.
///
/// A missing API key is reported when generating, not at construction, so a
/// server without credentials can still start and answer health checks.
pub struct GeminiClient {
    http: HttpClient,
    api_key: Option<String>,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl GeminiClient {
    /// Create a client against the public Gemini endpoint.
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_endpoint(GEMINI_BASE_URL, api_key, model)
    }

    /// Create a client against a custom endpoint (proxies, tests).
    pub fn with_endpoint(
        endpoint: &str,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Result<Self, LlmError> {
        // `Url::join` drops the last segment unless the base ends with '/'.
        let base = if endpoint.ends_with('/') {
            endpoint.to_string()
        } else {
            format!("{endpoint}/")
        };
        let http = HttpClient::new(&base)
            .map_err(|e| LlmError::Config(format!("HttpClient init failed: {e}")))?
            .with_timeout(Duration::from_secs(60));

        Ok(Self {
            http,
            api_key,
            model: model.into(),
            temperature: None,
            max_tokens: None,
        })
    }

    /// Sampling defaults used when a call does not pass its own.
    pub fn with_sampling(mut self, temperature: Option<f32>, max_tokens: Option<u32>) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    fn auth(&self) -> Result<Auth<'static>, LlmError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::Config("Gemini API key is not configured".to_string()))?;
        let value = HeaderValue::from_str(key)
            .map_err(|e| LlmError::Config(format!("invalid Gemini API key: {e}")))?;
        Ok(Auth::Header {
            name: HeaderName::from_static(API_KEY_HEADER),
            value,
        })
    }

    fn map_http_error(&self, err: HttpError) -> LlmError {
        match err.status().map(|s| s.as_u16()) {
            Some(429) => LlmError::RateLimit,
            Some(401) => LlmError::Config("Invalid API key".to_string()),
            Some(403) => LlmError::Config("API access forbidden".to_string()),
            Some(404) => LlmError::ModelNotAvailable(self.model.clone()),
            _ => LlmError::Http(err),
        }
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse, LlmError> {
        let auth = self.auth()?;
        let path = format!("models/{}:generateContent", self.model);

        let temperature = temperature.or(self.temperature);
        let max_output_tokens = max_tokens.or(self.max_tokens);
        let generation_config = (temperature.is_some() || max_output_tokens.is_some()).then_some(
            GeminiGenerationConfig {
                temperature,
                max_output_tokens,
            },
        );

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config,
            system_instruction: system_prompt.map(|sys| GeminiContent {
                parts: vec![GeminiPart {
                    text: sys.to_string(),
                }],
            }),
        };

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "gemini.generate");

        let resp: GeminiResponse = self
            .http
            .post_json(
                &path,
                &request,
                RequestOpts {
                    auth: Some(auth),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| self.map_http_error(e))?;

        let tokens_used = resp.usage_metadata.and_then(|u| u.total_token_count);

        let Some(candidate) = resp.candidates.into_iter().next() else {
            let reason = resp
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(LlmError::Blocked(reason));
        };

        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            return Err(LlmError::Blocked(
                "response stopped by Gemini safety filters".to_string(),
            ));
        }

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(LlmError::Api("No content parts in Gemini response".to_string()));
        }

        Ok(LlmResponse {
            text,
            model: Some(self.model.clone()),
            tokens_used,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_uses_camel_case_wire_names() {
        let req = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: "hi".into() }],
            }],
            generation_config: Some(GeminiGenerationConfig {
                temperature: None,
                max_output_tokens: Some(64),
            }),
            system_instruction: None,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(
            v,
            json!({
                "contents": [{ "parts": [{ "text": "hi" }] }],
                "generationConfig": { "maxOutputTokens": 64 }
            })
        );
    }

    #[test]
    fn model_name_reports_configured_model() {
        let client = GeminiClient::with_endpoint("http://localhost:9/v1beta", None, "m").unwrap();
        assert_eq!(client.model_name(), "m");
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let client = GeminiClient::new(None, "gemini-2.5-pro").unwrap();
        assert!(matches!(client.auth(), Err(LlmError::Config(_))));
    }
}
