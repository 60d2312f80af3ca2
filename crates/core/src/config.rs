use std::env;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "tierwise.toml";
const ENV_CONFIG_PATH: &str = "TIERWISE_CONFIG";
const ENV_DATABASE_URL: &str = "TIERWISE_DATABASE_URL";
const ENV_LOG_LEVEL: &str = "TIERWISE_LOG_LEVEL";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub engine: EngineConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

/// Tunables for the intelligence components. Defaults reproduce the
/// documented production behavior exactly; override via `tierwise.toml`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub analyzer: AnalyzerConfig,
    pub segmentation: SegmentationConfig,
    pub pricing: PricingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Recent-window mean must exceed older-window mean by this ratio to
    /// classify as increasing.
    pub trend_up_ratio: f64,
    /// Recent-window mean below older-window mean times this ratio
    /// classifies as decreasing.
    pub trend_down_ratio: f64,
    /// Projection multiplier applied to current usage on an upward trend.
    pub growth_projection: f64,
    /// Projection multiplier applied on a downward trend.
    pub decline_projection: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    pub new_user_age_days: i64,
    /// Total current usage across the five resources above which an
    /// established account classifies as a power user.
    pub power_user_usage_signal: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub pro_monthly_price: Decimal,
    pub pro_yearly_price: Decimal,
    /// Fixed reduced monthly price used by the at-risk retention offer.
    pub retention_price: Decimal,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            trend_up_ratio: 1.1,
            trend_down_ratio: 0.9,
            growth_projection: 1.3,
            decline_projection: 0.8,
        }
    }
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self { new_user_age_days: 30, power_user_usage_signal: 500 }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            pro_monthly_price: Decimal::new(2900, 2),
            pro_yearly_price: Decimal::new(29000, 2),
            retention_price: Decimal::new(1900, 2),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            analyzer: AnalyzerConfig::default(),
            segmentation: SegmentationConfig::default(),
            pricing: PricingConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    database: RawDatabase,
    logging: RawLogging,
    engine: EngineConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawDatabase {
    url: String,
    max_connections: u32,
    timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawLogging {
    level: String,
    format: LogFormat,
}

impl Default for RawDatabase {
    fn default() -> Self {
        Self { url: "sqlite://tierwise.db".to_owned(), max_connections: 5, timeout_secs: 30 }
    }
}

impl Default for RawLogging {
    fn default() -> Self {
        Self { level: "info".to_owned(), format: LogFormat::Compact }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let path = options
            .config_path
            .or_else(|| env::var(ENV_CONFIG_PATH).ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let raw = match fs::read_to_string(&path) {
            Ok(contents) => toml::from_str::<RawConfig>(&contents)
                .map_err(|source| ConfigError::ParseFile { path: path.clone(), source })?,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                if options.require_file {
                    return Err(ConfigError::MissingConfigFile(path));
                }
                RawConfig::default()
            }
            Err(source) => return Err(ConfigError::ReadFile { path, source }),
        };

        let database_url = options
            .overrides
            .database_url
            .or_else(|| env::var(ENV_DATABASE_URL).ok())
            .unwrap_or(raw.database.url);
        let log_level = options
            .overrides
            .log_level
            .or_else(|| env::var(ENV_LOG_LEVEL).ok())
            .unwrap_or(raw.logging.level);

        let config = Self {
            database: DatabaseConfig {
                url: database_url,
                max_connections: raw.database.max_connections,
                timeout_secs: raw.database.timeout_secs,
            },
            logging: LoggingConfig { level: log_level, format: raw.logging.format },
            engine: raw.engine,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Validation("database.url must not be empty".to_owned()));
        }
        self.engine.validate()
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let analyzer = &self.analyzer;
        if analyzer.trend_up_ratio <= 1.0 {
            return Err(ConfigError::Validation(
                "analyzer.trend_up_ratio must be greater than 1".to_owned(),
            ));
        }
        if !(0.0..1.0).contains(&analyzer.trend_down_ratio) {
            return Err(ConfigError::Validation(
                "analyzer.trend_down_ratio must be in (0, 1)".to_owned(),
            ));
        }
        if analyzer.growth_projection <= 0.0 || analyzer.decline_projection <= 0.0 {
            return Err(ConfigError::Validation(
                "analyzer projection multipliers must be positive".to_owned(),
            ));
        }

        if self.segmentation.new_user_age_days <= 0 {
            return Err(ConfigError::Validation(
                "segmentation.new_user_age_days must be positive".to_owned(),
            ));
        }

        let pricing = &self.pricing;
        let zero = Decimal::ZERO;
        if pricing.pro_monthly_price <= zero
            || pricing.pro_yearly_price <= zero
            || pricing.retention_price <= zero
        {
            return Err(ConfigError::Validation("pricing amounts must be positive".to_owned()));
        }
        if pricing.retention_price >= pricing.pro_monthly_price {
            return Err(ConfigError::Validation(
                "pricing.retention_price must undercut pro_monthly_price".to_owned(),
            ));
        }
        Ok(())
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => {
                Err(ConfigError::Validation(format!("unknown logging.format `{other}`")))
            }
        }
    }
}
