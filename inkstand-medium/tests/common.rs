use std::sync::OnceLock;

use inkstand_common::observability::{LogConfig, LogFormat};
use inkstand_medium::{ClientConfig, MediumClient};
use wiremock::MockServer;

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "inkstand-tests",
            emit_stderr: true,
            format: if std::env::var("INKSTAND_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            default_filter: "debug".to_string(),
            ..LogConfig::default()
        };

        inkstand_common::observability::init_logging(config).unwrap_or_default()
    });
}

pub fn client_for(server: &MockServer) -> MediumClient {
    init_test_tracing();
    MediumClient::new(ClientConfig::new("test-token").with_base(server.uri())).unwrap()
}
