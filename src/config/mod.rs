//! Configuration management for sharpline
//!
//! Loads built-in defaults, then optional config files, then environment
//! variables (`SHARPLINE__SECTION__KEY`), with `.env` read first.

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::detector::{DetectorConfig, MAX_ALERT_COOLDOWN_SECS};

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub kelly: KellyConfig,
    pub arbitrage: ArbitrageConfig,
    pub detector: DetectorConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KellyConfig {
    /// Multiplier on full Kelly, in (0, 1]
    pub default_fraction: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArbitrageConfig {
    /// Stake used when none is given on the command line
    pub default_stake: f64,
    /// Ceiling when no sportsbook limit applies
    pub default_max_stake: f64,
}

impl AppConfig {
    /// Load configuration from defaults, `config/default`, `config/local`
    /// and the environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("SHARPLINE").separator("__"));

        Self::finish(builder)
    }

    /// Load from one explicit file on top of the defaults
    pub fn load_from(path: &str) -> Result<Self> {
        dotenvy::dotenv().ok();

        let builder = Self::defaults()?
            .add_source(File::with_name(path).required(true))
            .add_source(Environment::with_prefix("SHARPLINE").separator("__"));

        Self::finish(builder)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let detector = DetectorConfig::default();
        Ok(Config::builder()
            // Logging defaults
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Kelly defaults
            .set_default("kelly.default_fraction", crate::value::DEFAULT_KELLY_FRACTION)?
            // Arbitrage defaults
            .set_default("arbitrage.default_stake", crate::arbitrage::DEFAULT_ANALYSIS_STAKE)?
            .set_default("arbitrage.default_max_stake", crate::arbitrage::DEFAULT_MAX_STAKE)?
            // Detector defaults
            .set_default(
                "detector.min_arbitrage_profit_percent",
                detector.min_arbitrage_profit_percent,
            )?
            .set_default("detector.min_ev_percent", detector.min_ev_percent)?
            .set_default("detector.alert_cooldown_secs", detector.alert_cooldown_secs)?
            .set_default(
                "detector.max_recent_alerts",
                detector.max_recent_alerts as u64,
            )?)
    }

    fn finish(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let config = builder.build().context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<()> {
        let fraction = self.kelly.default_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            bail!("kelly.default_fraction must be in (0, 1], got {}", fraction);
        }
        if !(self.arbitrage.default_stake > 0.0) {
            bail!(
                "arbitrage.default_stake must be positive, got {}",
                self.arbitrage.default_stake
            );
        }
        if !(self.arbitrage.default_max_stake > 0.0) {
            bail!(
                "arbitrage.default_max_stake must be positive, got {}",
                self.arbitrage.default_max_stake
            );
        }
        if self.detector.max_recent_alerts == 0 {
            bail!("detector.max_recent_alerts must be at least 1");
        }
        let cooldown = self.detector.alert_cooldown_secs;
        if !(0..=MAX_ALERT_COOLDOWN_SECS).contains(&cooldown) {
            bail!(
                "detector.alert_cooldown_secs must be in [0, {}], got {}",
                MAX_ALERT_COOLDOWN_SECS,
                cooldown
            );
        }
        Ok(())
    }

    /// One-line summary for logging
    pub fn digest(&self) -> String {
        format!(
            "kelly={:.2} stake={:.2} max_stake={:.2} min_arb={:.2}% min_ev={:.2}% cooldown={}s",
            self.kelly.default_fraction,
            self.arbitrage.default_stake,
            self.arbitrage.default_max_stake,
            self.detector.min_arbitrage_profit_percent,
            self.detector.min_ev_percent,
            self.detector.alert_cooldown_secs
        )
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            kelly: KellyConfig {
                default_fraction: crate::value::DEFAULT_KELLY_FRACTION,
            },
            arbitrage: ArbitrageConfig {
                default_stake: crate::arbitrage::DEFAULT_ANALYSIS_STAKE,
                default_max_stake: crate::arbitrage::DEFAULT_MAX_STAKE,
            },
            detector: DetectorConfig::default(),
        }
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}

impl LoggingConfig {
    /// Install the global tracing subscriber. RUST_LOG wins over `level`.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => fmt().json().with_env_filter(filter).with_writer(std::io::stderr).init(),
            _ => fmt().with_env_filter(filter).with_writer(std::io::stderr).init(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}
