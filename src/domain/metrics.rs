// Derived metrics - normalisation and health classification of a raw sample
use super::telemetry::TelemetrySample;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BATTERY_MIN_VOLTS: f64 = 10.5;
pub const DEFAULT_BATTERY_MAX_VOLTS: f64 = 12.6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub battery_min_volts: f64,
    pub battery_max_volts: f64,
    /// Temperatures below this are OK.
    pub temperature_warn_celsius: f64,
    /// Temperatures above this are CRITICAL.
    pub temperature_critical_celsius: f64,
    /// Stability index above this is unstable (lower is better).
    pub stability_limit: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            battery_min_volts: DEFAULT_BATTERY_MIN_VOLTS,
            battery_max_volts: DEFAULT_BATTERY_MAX_VOLTS,
            temperature_warn_celsius: 40.0,
            temperature_critical_celsius: 55.0,
            stability_limit: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemperatureStatus {
    Ok,
    Warn,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilityStatus {
    Normal,
    Unstable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub battery_percent: f64,
    pub exercise_percent: f64,
    pub temperature_status: TemperatureStatus,
    pub stability_status: StabilityStatus,
}

/// Compute presentation metrics from a single sample.
///
/// Percentages are clamped to `[0, 100]` here so no consumer ever sees an
/// out-of-range value. A zero distance target yields 0% progress.
pub fn derive(sample: &TelemetrySample, config: &ThresholdConfig) -> DerivedMetrics {
    let battery_span = config.battery_max_volts - config.battery_min_volts;
    let battery_percent =
        clamp_percent((sample.supply_voltage - config.battery_min_volts) / battery_span * 100.0);

    let exercise_percent = if sample.distance_target_meters == 0.0 {
        0.0
    } else {
        clamp_percent(sample.distance_current_meters / sample.distance_target_meters * 100.0)
    };

    DerivedMetrics {
        battery_percent,
        exercise_percent,
        temperature_status: classify_temperature(sample.temperature_celsius, config),
        stability_status: classify_stability(sample.stability_index, config),
    }
}

fn clamp_percent(value: f64) -> f64 {
    // NaN only arises from a degenerate sample; show it as empty rather than leak it
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

fn classify_temperature(celsius: f64, config: &ThresholdConfig) -> TemperatureStatus {
    if celsius > config.temperature_critical_celsius {
        TemperatureStatus::Critical
    } else if celsius >= config.temperature_warn_celsius {
        TemperatureStatus::Warn
    } else {
        TemperatureStatus::Ok
    }
}

fn classify_stability(index: f64, config: &ThresholdConfig) -> StabilityStatus {
    if index > config.stability_limit {
        StabilityStatus::Unstable
    } else {
        StabilityStatus::Normal
    }
}
