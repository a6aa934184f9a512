use std::fs;
use std::sync::OnceLock;

use ponder_agent_core::ReactConfig;
use serde::Deserialize;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ponder_home::{PonderHome, CONFIG_FILE_NAME};

const LOG_FILE_NAME: &str = "ponder.log";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PonderConfig {
    #[serde(default)]
    pub agent: ReactConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl PonderConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, String> {
        toml::from_str(raw).map_err(|error| format!("parse {CONFIG_FILE_NAME} failed: {error}"))
    }

    /// Loads `<home>/ponder.toml`, falling back to defaults when the file is absent.
    pub fn load(home: &PonderHome) -> Result<Self, String> {
        let path = home.config_file();
        if !path.is_file() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)
            .map_err(|error| format!("read {} failed: {error}", path.display()))?;
        Self::from_toml_str(&raw)
    }
}

pub fn init_tracing(home: &PonderHome, config: &LogConfig) {
    static TRACE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

    let log_dir = home.log_dir();
    if let Err(error) = fs::create_dir_all(&log_dir) {
        eprintln!(
            "warning: failed to create log dir {}: {error}",
            log_dir.display()
        );
        return;
    }

    let appender = tracing_appender::rolling::never(&log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = TRACE_GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.clone()));
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .try_init();
}
