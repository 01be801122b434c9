use inkstand_config::InkstandConfigLoader;
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn defaults_follow_the_legacy_environment() {
    temp_env::with_vars(
        [
            ("MEDIUM_ACCESS_TOKEN", Some("from-env")),
            ("MEDIUM_POST_STATUS", None::<&str>),
            ("MEDIUM_POST_LICENSE", Some("cc-40-zero")),
        ],
        || {
            let config = InkstandConfigLoader::new().load().expect("defaults load");

            assert_eq!(config.medium.access_token, "from-env");
            assert_eq!(config.medium.post_status, "draft");
            assert_eq!(config.medium.post_license, "cc-40-zero");
            assert_eq!(config.medium.api_base, "https://api.medium.com");
            assert_eq!(config.medium.max_pages, 1000);
            assert_eq!(config.logging.format, "text");
        },
    );
}

#[test]
#[serial]
fn missing_token_is_empty() {
    temp_env::with_var_unset("MEDIUM_ACCESS_TOKEN", || {
        let config = InkstandConfigLoader::new().load().expect("defaults load");
        assert!(config.medium.access_token.is_empty());
    });
}

#[test]
#[serial]
fn file_overrides_defaults_and_env_overrides_file() {
    let tmp = TempDir::new().unwrap();
    let file_yaml = r#"
medium:
  access_token: "${PUBLISH_TOKEN}"
  post_status: unlisted
  timeout_ms: 2500
logging:
  level: debug
  dir: /tmp/inkstand-logs
"#;
    let p = write_yaml(&tmp, "inkstand.yaml", file_yaml);

    temp_env::with_vars(
        [
            ("PUBLISH_TOKEN", Some("file-token")),
            ("INKSTAND__MEDIUM__TIMEOUT_MS", Some("750")),
            ("INKSTAND__ARTICLE__USER_AGENT", Some("test-agent")),
        ],
        || {
            let config = InkstandConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load layered config");

            assert_eq!(config.medium.access_token, "file-token");
            assert_eq!(config.medium.post_status, "unlisted");
            assert_eq!(config.medium.timeout_ms, 750);
            assert_eq!(config.article.user_agent, "test-agent");
            assert_eq!(config.logging.level, "debug");
            assert_eq!(config.logging.dir.as_deref(), Some("/tmp/inkstand-logs"));
        },
    );
}

#[test]
#[serial]
fn numeric_tokens_stay_strings() {
    temp_env::with_var("INKSTAND__MEDIUM__ACCESS_TOKEN", Some("20201234"), || {
        let config = InkstandConfigLoader::new().load().expect("load");
        assert_eq!(config.medium.access_token, "20201234");
    });
}

#[test]
#[serial]
fn optional_file_may_be_missing_but_required_may_not() {
    let tmp = TempDir::new().unwrap();
    let absent = tmp.path().join("absent.yaml");

    assert!(
        InkstandConfigLoader::new()
            .with_optional_file(&absent)
            .load()
            .is_ok()
    );
    assert!(InkstandConfigLoader::new().with_file(&absent).load().is_err());
}
