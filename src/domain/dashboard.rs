// Dashboard domain model - tab selection and the render model handed to presenters
use super::metrics::DerivedMetrics;
use super::telemetry::TelemetrySample;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Controls,
    Therapy,
    Health,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Controls => "controls",
            Tab::Therapy => "therapy",
            Tab::Health => "health",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTab(pub String);

impl fmt::Display for UnknownTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tab '{}'", self.0)
    }
}

impl FromStr for Tab {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "controls" => Ok(Tab::Controls),
            "therapy" => Ok(Tab::Therapy),
            "health" => Ok(Tab::Health),
            _ => Err(UnknownTab(s.to_string())),
        }
    }
}

/// A sample paired with the metrics derived from it. Never split.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub sample: TelemetrySample,
    pub metrics: DerivedMetrics,
    pub acquired_at: DateTime<Utc>,
}

/// Fully resolved view of the dashboard. Holds no references into live state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderModel {
    pub active_tab: Tab,
    /// `None` until the first successful acquisition.
    pub reading: Option<Reading>,
    /// The most recent poll failed, so `reading` is older than the last attempt.
    pub stale: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
}
