//! Turns loosely typed config values into the typed settings each crate takes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use inkstand_common::{LogConfig, LogFormat};
use inkstand_config::{ArticleSettings, InkstandConfig, InkstandConfigLoader, LoggingSettings, MediumSettings};
use inkstand_medium::ClientConfig;
use inkstand_web::HtmlExtractor;

const DEFAULT_CONFIG_FILE: &str = "inkstand.yaml";

/// An explicit file must exist; the implicit `inkstand.yaml` may not.
pub fn load(explicit: Option<&Path>) -> Result<InkstandConfig> {
    let loader = match explicit {
        Some(path) => InkstandConfigLoader::new().with_file(path),
        None => InkstandConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    loader.load().context("failed to load configuration")
}

pub fn log_config(settings: &LoggingSettings, verbose: bool) -> Result<LogConfig> {
    let format: LogFormat = settings.format.parse()?;
    Ok(LogConfig {
        app_name: "inkstand",
        log_dir: settings.dir.as_deref().map(PathBuf::from),
        emit_stderr: settings.stderr || verbose,
        format,
        default_filter: if verbose {
            "debug".to_string()
        } else {
            settings.level.clone()
        },
    })
}

/// Rejects misspelled status, license or format values before any request is made.
pub fn client_config(settings: &MediumSettings) -> Result<ClientConfig> {
    let mut config = ClientConfig::new(settings.access_token.trim());
    config.default_publish_status = settings
        .post_status
        .parse()
        .context("medium.post_status")?;
    config.default_license = settings
        .post_license
        .parse()
        .context("medium.post_license")?;
    config.default_content_format = settings
        .content_format
        .parse()
        .context("medium.content_format")?;
    config.api_base = settings.api_base.clone();
    config.graphql_base = settings.graphql_base.clone();
    config.timeout = Duration::from_millis(settings.timeout_ms);
    config.max_pages = (settings.max_pages > 0).then_some(settings.max_pages);
    Ok(config)
}

pub fn extractor(settings: &ArticleSettings) -> Result<HtmlExtractor> {
    HtmlExtractor::new(&settings.user_agent, Duration::from_millis(settings.timeout_ms))
        .context("failed to build the article extractor")
}
