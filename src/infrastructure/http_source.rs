// HTTP device link - polls the walker controller's JSON telemetry endpoint
use crate::application::telemetry_source::TelemetrySource;
use crate::domain::error::AcquisitionError;
use crate::domain::telemetry::TelemetrySample;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpTelemetrySource {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

/// Payload as reported by the walker firmware.
#[derive(Debug, Deserialize)]
struct DeviceFeed {
    fsr_grip: f64,
    servo_height: i32,
    teensy_v: f64,
    stability: f64,
    dist_curr: f64,
    dist_target: f64,
    temp: f64,
}

impl From<DeviceFeed> for TelemetrySample {
    fn from(feed: DeviceFeed) -> Self {
        TelemetrySample {
            grip_force_newtons: feed.fsr_grip,
            height_millimeters: feed.servo_height,
            supply_voltage: feed.teensy_v,
            stability_index: feed.stability,
            distance_current_meters: feed.dist_curr,
            distance_target_meters: feed.dist_target,
            temperature_celsius: feed.temp,
        }
    }
}

impl HttpTelemetrySource {
    pub fn new(url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn classify(&self, err: reqwest::Error) -> AcquisitionError {
        if err.is_timeout() {
            AcquisitionError::Timeout(self.timeout)
        } else if err.is_decode() {
            AcquisitionError::Malformed(err.to_string())
        } else {
            AcquisitionError::Disconnected(err.to_string())
        }
    }
}

#[async_trait]
impl TelemetrySource for HttpTelemetrySource {
    async fn poll(&self) -> Result<TelemetrySample, AcquisitionError> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            return Err(AcquisitionError::Disconnected(format!(
                "walker responded with status {}",
                response.status()
            )));
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        let feed: DeviceFeed = serde_json::from_slice(&body)
            .map_err(|e| AcquisitionError::Malformed(e.to_string()))?;

        let sample = TelemetrySample::from(feed);
        tracing::trace!("Polled walker telemetry: {:?}", sample);
        Ok(sample)
    }
}
