use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::CatalogSource;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub calculation: CalculationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Origin serving both the catalog and the calculation endpoint
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    pub path: String,
    /// Local catalog file; takes precedence over `path` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CalculationConfig {
    pub path: String,
    /// 0 disables the timeout
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Log file used while the interactive form owns the terminal
    pub file: PathBuf,
}

impl Config {
    pub fn catalog_source(&self) -> CatalogSource {
        match &self.catalog.file {
            Some(file) => CatalogSource::File(file.clone()),
            None => CatalogSource::Http(join_url(&self.server.base_url, &self.catalog.path)),
        }
    }

    pub fn calculation_url(&self) -> String {
        join_url(&self.server.base_url, &self.calculation.path)
    }

    pub fn calculation_timeout(&self) -> Option<Duration> {
        match self.calculation.timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Load configuration from defaults, an optional TOML file and the environment
///
/// Environment variables use the `COST_ESTIMATOR` prefix with `__` as the
/// section separator, e.g. `COST_ESTIMATOR_SERVER__BASE_URL`.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .set_default("server.base_url", "http://localhost:5000")?
        .set_default("catalog.path", "/data/pricing.json")?
        .set_default("calculation.path", "/api/calc")?
        .set_default("calculation.timeout_seconds", 0)?
        .set_default("logging.level", "info")?
        .set_default("logging.file", "estimator.log")?
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("COST_ESTIMATOR")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    let base_url = &cfg.server.base_url;
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        anyhow::bail!("server.base_url must start with http:// or https://, got '{}'", base_url);
    }

    if cfg.catalog.file.is_none() && cfg.catalog.path.trim().is_empty() {
        anyhow::bail!("catalog.path cannot be empty when catalog.file is not set");
    }

    if cfg.calculation.path.trim().is_empty() {
        anyhow::bail!("calculation.path cannot be empty");
    }

    match cfg.logging.level.to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        other => anyhow::bail!(
            "Invalid logging.level: '{}'. Must be one of: trace, debug, info, warn, error",
            other
        ),
    }

    Ok(())
}
