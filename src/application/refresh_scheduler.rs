// Refresh scheduler - Fixed-rate acquire -> derive -> publish loop
use crate::application::dashboard_service::DashboardService;
use crate::application::telemetry_source::TelemetrySource;
use crate::domain::error::AcquisitionError;
use crate::domain::metrics::{derive, ThresholdConfig};
use crate::domain::telemetry::TelemetrySample;
use crate::infrastructure::config::DashboardConfig;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerPhase {
    Idle,
    Polling,
    Deriving,
    Publishing,
    Stopped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub cycles: u64,
    pub successes: u64,
    pub failures: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Published,
    Stale { consecutive_failures: u32 },
}

pub struct RefreshScheduler {
    source: Arc<dyn TelemetrySource>,
    service: DashboardService,
    thresholds: ThresholdConfig,
    target_distance_override: Option<f64>,
    period: Duration,
    phase: watch::Sender<SchedulerPhase>,
    stats: SchedulerStats,
}

impl RefreshScheduler {
    pub fn new(
        source: Arc<dyn TelemetrySource>,
        service: DashboardService,
        config: &DashboardConfig,
    ) -> Self {
        let (phase, _) = watch::channel(SchedulerPhase::Idle);
        Self {
            source,
            service,
            thresholds: config.thresholds.clone(),
            target_distance_override: config.target_distance_override,
            period: config.period(),
            phase,
            stats: SchedulerStats::default(),
        }
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<SchedulerPhase> {
        self.phase.subscribe()
    }

    /// Run one poll/derive/publish sequence.
    ///
    /// An acquisition failure leaves the previous reading in place and marks
    /// it stale; it is never propagated.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.stats.cycles += 1;
        self.phase.send_replace(SchedulerPhase::Polling);

        let outcome = match self.acquire().await {
            Ok(sample) => {
                self.phase.send_replace(SchedulerPhase::Deriving);
                let metrics = derive(&sample, &self.thresholds);

                self.phase.send_replace(SchedulerPhase::Publishing);
                self.service.publish_reading(sample, metrics);

                tracing::debug!("Cycle {} published", self.stats.cycles);
                self.stats.successes += 1;
                CycleOutcome::Published
            }
            Err(e) => {
                self.phase.send_replace(SchedulerPhase::Publishing);
                let consecutive_failures = self.service.publish_failure(&e);
                self.stats.failures += 1;
                tracing::warn!(
                    "Telemetry acquisition failed ({} consecutive): {}",
                    consecutive_failures,
                    e
                );
                CycleOutcome::Stale {
                    consecutive_failures,
                }
            }
        };

        self.phase.send_replace(SchedulerPhase::Idle);
        outcome
    }

    async fn acquire(&self) -> Result<TelemetrySample, AcquisitionError> {
        let sample = self
            .source
            .poll()
            .await?
            .with_target_override(self.target_distance_override);

        if let Some(field) = sample.first_non_finite() {
            return Err(AcquisitionError::Malformed(format!("{} is not a finite number", field)));
        }
        Ok(sample)
    }

    /// Loop until `stop` flips to true (or its sender is dropped).
    ///
    /// Cycles start on a fixed-rate schedule anchored to the previous start.
    /// A cycle that overruns the period is followed immediately by the next
    /// one. The stop signal interrupts the wait but never an in-flight cycle.
    pub async fn run(mut self, mut stop: watch::Receiver<bool>) -> SchedulerStats {
        tracing::info!("Refresh loop started with period {:?}", self.period);

        let mut ticker = time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut failed_streak = 0;

        loop {
            if *stop.borrow_and_update() {
                break;
            }

            tokio::select! {
                biased;
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                    continue;
                }
                _ = ticker.tick() => {}
            }

            match self.run_cycle().await {
                CycleOutcome::Published if failed_streak > 0 => {
                    tracing::info!(
                        "Telemetry feed recovered after {} failed polls",
                        failed_streak
                    );
                    failed_streak = 0;
                }
                CycleOutcome::Published => {}
                CycleOutcome::Stale {
                    consecutive_failures,
                } => failed_streak = consecutive_failures,
            }
        }

        self.phase.send_replace(SchedulerPhase::Stopped);
        tracing::info!(
            "Refresh loop stopped after {} cycles ({} ok, {} failed)",
            self.stats.cycles,
            self.stats.successes,
            self.stats.failures
        );
        self.stats
    }

    pub fn spawn(self) -> SchedulerHandle {
        let (stop, stop_rx) = watch::channel(false);
        let phase = self.subscribe_phase();
        let task = tokio::spawn(self.run(stop_rx));
        SchedulerHandle { stop, phase, task }
    }
}

pub struct SchedulerHandle {
    stop: watch::Sender<bool>,
    phase: watch::Receiver<SchedulerPhase>,
    task: JoinHandle<SchedulerStats>,
}

impl SchedulerHandle {
    pub fn subscribe_phase(&self) -> watch::Receiver<SchedulerPhase> {
        self.phase.clone()
    }

    /// Signal the loop to stop and wait for it to reach `Stopped`.
    pub async fn stop(self) -> Result<SchedulerStats, tokio::task::JoinError> {
        self.stop.send_replace(true);
        self.task.await
    }
}
