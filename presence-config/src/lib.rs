//! Loader for service configuration with YAML + environment overlays.
//!
//! Sources are merged in this order, later ones winning:
//!
//! 1. built-in defaults ([`DEFAULTS_YAML`])
//! 2. YAML files or snippets attached with [`PresenceConfigLoader::with_file`],
//!    [`PresenceConfigLoader::with_optional_file`] or
//!    [`PresenceConfigLoader::with_yaml_str`]
//! 3. `PRESENCE__`-prefixed environment variables, `__` separating sections
//!    (`PRESENCE__SERVER__PORT=8080`)
//!
//! String values then go through `${VAR}` expansion. The defaults read the
//! oracle credentials from `GOOGLE_API_KEY`, `GOOGLE_CSE_ID` and `API_KEY`;
//! a placeholder that stays unresolved is treated as a missing credential.
use config::{Config, ConfigError, Environment, File, FileFormat};
use presence_common::observability::LogFormat;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "PRESENCE";

/// Built-in defaults, merged underneath every other source.
pub const DEFAULTS_YAML: &str = r#"
server:
  host: "0.0.0.0"
  port: 5050
  request_timeout_secs: 120
search:
  endpoint: "https://www.googleapis.com"
  api_key: "${GOOGLE_API_KEY}"
  engine_id: "${GOOGLE_CSE_ID}"
  timeout_secs: 15
llm:
  provider: gemini
  endpoint: "https://generativelanguage.googleapis.com/v1beta"
  api_key: "${API_KEY}"
  model: "gemini-2.5-pro"
  timeout_secs: 60
extract:
  user_agent: "PresenceCircleBot/1.0 (+https://example.com)"
  max_redirects: 5
  timeout_secs: 20
  max_list_items: 40
daily_history:
  url: "https://www.onthisday.com/today/events.php"
  fallback_title: "Today in history"
log:
  format: text
  emit_stderr: true
  filter: "info"
"#;

#[derive(Debug, Clone, Deserialize)]
pub struct PresenceConfig {
    pub server: ServerConfig,
    pub search: SearchConfig,
    pub llm: LlmConfig,
    pub extract: ExtractConfig,
    pub daily_history: DailyHistoryConfig,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Outer bound on any single HTTP request handled by the server.
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Google Custom Search credentials and endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub endpoint: String,
    #[serde(default, deserialize_with = "optional_secret")]
    pub api_key: Option<String>,
    #[serde(default, deserialize_with = "optional_secret")]
    pub engine_id: Option<String>,
    pub timeout_secs: u64,
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// The tag is `provider`; the remaining keys are provider specific.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum LlmConfig {
    Gemini {
        endpoint: String,
        #[serde(default, deserialize_with = "optional_secret")]
        api_key: Option<String>,
        model: String,
        #[serde(default)]
        temperature: Option<f32>,
        #[serde(default)]
        max_tokens: Option<u32>,
        timeout_secs: u64,
    },
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        match self {
            LlmConfig::Gemini { timeout_secs, .. } => Duration::from_secs(*timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    pub user_agent: String,
    pub max_redirects: usize,
    pub timeout_secs: u64,
    pub max_list_items: usize,
}

impl ExtractConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyHistoryConfig {
    pub url: String,
    pub fallback_title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub emit_stderr: bool,
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            emit_stderr: false,
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".into()
}

/// Blank values and placeholders left over from `${VAR}` expansion count as unset.
fn optional_secret<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        let s = s.trim();
        if s.is_empty() || s.starts_with('$') || s.contains("${") {
            None
        } else {
            Some(s.to_string())
        }
    }))
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring.
pub struct PresenceConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for PresenceConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PresenceConfigLoader {
    /// Start from the built-in defaults.
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(File::from_str(DEFAULTS_YAML, FileFormat::Yaml));
        Self { builder }
    }

    /// Attach a required YAML/TOML/JSON file; the format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when it does not exist.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet (tests, CLI overrides).
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Apply environment overrides, expand `${VAR}` placeholders, and
    /// deserialize into [`PresenceConfig`].
    ///
    /// ```
    /// use presence_config::{LlmConfig, PresenceConfigLoader};
    ///
    /// let config = PresenceConfigLoader::new()
    ///     .with_yaml_str("server:\n  port: 6060\nllm:\n  provider: gemini\n  model: gemini-2.5-flash\n")
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.server.port, 6060);
    /// assert_eq!(config.extract.max_list_items, 40);
    /// let LlmConfig::Gemini { model, .. } = &config.llm;
    /// assert_eq!(model, "gemini-2.5-flash");
    /// ```
    pub fn load(self) -> Result<PresenceConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
