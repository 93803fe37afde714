use crate::domain::error::ConfigurationError;
use crate::domain::metrics::ThresholdConfig;
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_PERIOD_MS: u64 = 500;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub period_ms: u64,
    pub thresholds: ThresholdConfig,
    pub target_distance_override: Option<f64>,
    pub source: SourceConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Synthetic,
    Http,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub url: Option<String>,
    pub timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            period_ms: DEFAULT_PERIOD_MS,
            thresholds: ThresholdConfig::default(),
            target_distance_override: None,
            source: SourceConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Synthetic,
            url: None,
            timeout_ms: 250,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigurationError> {
        self.server
            .bind
            .parse()
            .map_err(|_| ConfigurationError::Load(format!("invalid bind address '{}'", self.server.bind)))
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.period_ms == 0 {
            return Err(ConfigurationError::InvalidPeriod);
        }

        let t = &self.thresholds;
        if !(t.battery_min_volts.is_finite()
            && t.battery_max_volts.is_finite()
            && t.battery_min_volts < t.battery_max_volts)
        {
            return Err(ConfigurationError::InvalidBatteryRange {
                min: t.battery_min_volts,
                max: t.battery_max_volts,
            });
        }
        if !(t.temperature_warn_celsius.is_finite()
            && t.temperature_critical_celsius.is_finite()
            && t.temperature_warn_celsius < t.temperature_critical_celsius)
        {
            return Err(ConfigurationError::InvalidTemperatureBands {
                warn: t.temperature_warn_celsius,
                critical: t.temperature_critical_celsius,
            });
        }
        if !(t.stability_limit.is_finite() && t.stability_limit > 0.0) {
            return Err(ConfigurationError::InvalidStabilityLimit(t.stability_limit));
        }

        if let Some(target) = self.target_distance_override {
            if !target.is_finite() || target < 0.0 {
                return Err(ConfigurationError::InvalidTargetOverride(target));
            }
        }

        if self.source.timeout_ms == 0 {
            return Err(ConfigurationError::InvalidSourceTimeout);
        }

        if self.source.kind == SourceKind::Http {
            let url = self
                .source
                .url
                .as_deref()
                .ok_or_else(|| ConfigurationError::InvalidSourceUrl("missing url".to_string()))?;
            reqwest::Url::parse(url)
                .map_err(|e| ConfigurationError::InvalidSourceUrl(format!("{}: {}", url, e)))?;
        }

        self.bind_addr()?;
        Ok(())
    }
}

/// Load `config/dashboard.toml` (optional) overlaid with `WALKER_*` environment variables.
pub fn load_dashboard_config() -> Result<DashboardConfig, ConfigurationError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("WALKER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    finish(builder)
}

#[cfg(test)]
fn parse_dashboard_config(toml: &str) -> Result<DashboardConfig, ConfigurationError> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml));

    finish(builder)
}

fn finish(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<DashboardConfig, ConfigurationError> {
    let settings = builder.build()?;
    let config: DashboardConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
