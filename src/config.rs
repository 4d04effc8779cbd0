use std::fmt;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use reqwest::Url;
use tracing::trace;

use crate::alert::AVAILABILITY_THRESHOLD;
use crate::metrics::{Timeframe, Timeframes};

/// Errors found while validating a configuration
#[derive(Debug)]
pub enum ConfigError {
    /// No website to monitor
    NoTargets,

    /// URL is malformed or misses a scheme/host
    InvalidUrl { url: String, reason: String },

    /// Sampling interval of zero seconds
    ZeroInterval(String),

    /// Same URL configured twice
    DuplicateTarget(String),

    /// Timeframe set violates its invariants
    InvalidTimeframe(String),

    /// Threshold outside of 0..=100
    InvalidThreshold(f64),

    /// Probe timeout of zero seconds
    ZeroTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoTargets => write!(f, "no website configured for monitoring"),
            ConfigError::InvalidUrl { url, reason } => {
                write!(f, "incorrect URL address '{}': {}", url, reason)
            }
            ConfigError::ZeroInterval(url) => {
                write!(f, "interval for '{}' must be at least one second", url)
            }
            ConfigError::DuplicateTarget(url) => write!(f, "'{}' is configured twice", url),
            ConfigError::InvalidTimeframe(msg) => write!(f, "invalid timeframe: {}", msg),
            ConfigError::InvalidThreshold(threshold) => {
                write!(f, "alert threshold {} is not a percentage", threshold)
            }
            ConfigError::ZeroTimeout => write!(f, "probe timeout must be at least one second"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub monitor: Vec<TargetConfig>,

    /// Probe timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Render interval in seconds (defaults to the smallest target interval)
    pub refresh_rate: Option<u64>,

    /// Timeframes (defaults to 2min, 10min and 1h)
    pub timeframes: Option<Vec<TimeframeConfig>>,

    #[serde(default)]
    pub alert: AlertConfig,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct TargetConfig {
    pub website: String,
    #[serde(default = "default_interval")]
    pub interval: u64,
}

impl TargetConfig {
    pub fn new(website: impl Into<String>, interval: Option<u64>) -> Self {
        Self {
            website: website.into(),
            interval: interval.unwrap_or_else(default_interval),
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct TimeframeConfig {
    pub label: Option<String>,
    /// Window in seconds
    pub window: u64,
    /// Refresh interval in seconds
    pub refresh: u64,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    pub webhook: Option<Webhook>,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            webhook: None,
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Webhook {
    pub url: String,
}

fn default_timeout() -> u64 {
    5
}

fn default_interval() -> u64 {
    5
}

fn default_threshold() -> f64 {
    AVAILABILITY_THRESHOLD
}

impl Config {
    /// Configuration for the given targets with every other setting defaulted
    pub fn for_targets(monitor: Vec<TargetConfig>) -> Self {
        Self {
            monitor,
            timeout: default_timeout(),
            refresh_rate: None,
            timeframes: None,
            alert: AlertConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monitor.is_empty() {
            return Err(ConfigError::NoTargets);
        }

        for (i, target) in self.monitor.iter().enumerate() {
            check_url(&target.website)?;
            if target.interval == 0 {
                return Err(ConfigError::ZeroInterval(target.website.clone()));
            }
            if self.monitor[..i].iter().any(|t| t.website == target.website) {
                return Err(ConfigError::DuplicateTarget(target.website.clone()));
            }
        }

        if self.timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        if !(0.0..=100.0).contains(&self.alert.threshold) {
            return Err(ConfigError::InvalidThreshold(self.alert.threshold));
        }

        if let Some(webhook) = &self.alert.webhook {
            check_url(&webhook.url)?;
        }

        self.timeframes().map(|_| ())
    }

    pub fn timeframes(&self) -> Result<Timeframes, ConfigError> {
        let Some(timeframes) = &self.timeframes else {
            return Ok(Timeframes::default());
        };

        Timeframes::new(
            timeframes
                .iter()
                .map(|tf| {
                    Timeframe::new(
                        tf.label.clone().unwrap_or_else(|| format!("{}s", tf.window)),
                        Duration::from_secs(tf.window),
                        Duration::from_secs(tf.refresh),
                    )
                })
                .collect(),
        )
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// How often the renderer runs
    pub fn render_interval(&self) -> Duration {
        let secs = self.refresh_rate.filter(|rate| *rate > 0).unwrap_or_else(|| {
            self.monitor
                .iter()
                .map(|target| target.interval)
                .min()
                .unwrap_or_else(default_interval)
        });
        Duration::from_secs(secs.max(1))
    }
}

/// Accept only absolute http(s) URLs with a host
pub fn check_url(value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidUrl {
        url: value.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(value).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("the URL must use the http or https protocol"));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("the URL is missing a host"));
    }
    Ok(url)
}

pub fn read_config_file(path: impl AsRef<Path>) -> anyhow::Result<Config> {
    let path = path.as_ref();
    let file_content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str::<Config>(&file_content)
        .with_context(|| format!("Invalid configuration file: {}", path.display()))
        .inspect(|config| trace!("loaded config: {config:?}"))
}
