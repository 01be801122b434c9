//! Loader for Inkstand configuration with YAML + environment overlays.
//!
//! Sources are merged in this order, later ones winning:
//!
//! 1. built-in defaults (which read `MEDIUM_ACCESS_TOKEN`, `MEDIUM_POST_STATUS`
//!    and `MEDIUM_POST_LICENSE` through `${VAR:-default}` placeholders)
//! 2. YAML files / inline snippets, in the order they were attached
//! 3. `INKSTAND__`-prefixed environment variables, `__` separating sections
//!    (`INKSTAND__MEDIUM__TIMEOUT_MS=2000`)
//!
//! `${VAR}` placeholders anywhere in the merged tree are expanded afterwards.
//! Values stay plain strings and numbers here; turning them into typed client
//! settings (and rejecting bad spellings) is up to the binary.
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

const DEFAULTS_YAML: &str = r#"
medium:
  access_token: "${MEDIUM_ACCESS_TOKEN:-}"
  post_status: "${MEDIUM_POST_STATUS:-draft}"
  post_license: "${MEDIUM_POST_LICENSE:-all-rights-reserved}"
  content_format: "markdown"
  api_base: "https://api.medium.com"
  graphql_base: "https://medium.com"
  timeout_ms: 5000
  max_pages: 1000
article:
  timeout_ms: 30000
  user_agent: "Mozilla/5.0 (compatible; Inkstand/0.1)"
logging:
  level: "info"
  format: "text"
  stderr: false
"#;

#[derive(Debug, Clone, Deserialize)]
pub struct InkstandConfig {
    pub medium: MediumSettings,
    pub article: ArticleSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediumSettings {
    /// Empty when neither the file nor the environment supplies one.
    #[serde(default, deserialize_with = "string_or_number")]
    pub access_token: String,
    pub post_status: String,
    pub post_license: String,
    pub content_format: String,
    pub api_base: String,
    pub graphql_base: String,
    pub timeout_ms: u64,
    /// `0` disables the page guard.
    pub max_pages: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArticleSettings {
    pub timeout_ms: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub format: String,
    #[serde(default)]
    pub dir: Option<String>,
    pub stderr: bool,
}

/// Environment values are parsed eagerly, so an all-digit token arrives as a number.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string, found {other}"
        ))),
    }
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

/// Builder hides the `config` crate wiring (defaults + YAML + env overrides).
pub struct InkstandConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for InkstandConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl InkstandConfigLoader {
    /// Start from the built-in defaults.
    ///
    /// ```
    /// use inkstand_config::InkstandConfigLoader;
    ///
    /// let config = InkstandConfigLoader::new().load().expect("defaults load");
    /// assert_eq!(config.medium.timeout_ms, 5000);
    /// assert_eq!(config.medium.content_format, "markdown");
    /// ```
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULTS_YAML, FileFormat::Yaml));
        Self { builder }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use inkstand_config::InkstandConfigLoader;
    ///
    /// let cfg = InkstandConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// medium:
    ///   access_token: "example"
    ///   post_status: "public"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.medium.access_token, "example");
    /// assert_eq!(cfg.medium.post_status, "public");
    /// assert_eq!(cfg.article.timeout_ms, 30000);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// `INKSTAND__` environment variables are layered last, then `${VAR}`
    /// placeholders are expanded before the typed structs are materialised.
    pub fn load(self) -> Result<InkstandConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("INKSTAND")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
