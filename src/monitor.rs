//! The traction monitor: shared state plus the tick and analysis entry points.
//!
//! All mutable state lives in one [`MonitorState`] behind a single mutex.
//! A tick takes the lock once, so buffer append, agent updates and the
//! recommendation change are observed together or not at all. Trailing
//! analysis snapshots the window under the lock, waits without it, and
//! publishes under it again.

use crate::agent::AgentRegistry;
use crate::analysis::{self, classify, Classification, SlipStats, TrailingAnalysis};
use crate::config::{Config, Thresholds};
use crate::error::TelemetryError;
use crate::models::{Agent, Sample, SessionSummary, SystemStatus};
use crate::telemetry::TelemetryBuffer;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Recommendation shown before the first sample arrives.
pub const INITIAL_RECOMMENDATION: &str = "All systems operating normally";

/// Tuning knobs for a monitor instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorSettings {
    pub thresholds: Thresholds,
    /// Samples retained in history.
    pub capacity: usize,
    /// Samples averaged by the trailing analysis.
    pub analysis_window: usize,
    /// Simulated latency before an analysis result is published.
    pub analysis_delay: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for MonitorSettings {
    fn from(config: &Config) -> Self {
        Self {
            thresholds: config.thresholds,
            capacity: config.buffer.capacity,
            analysis_window: config.buffer.analysis_window,
            analysis_delay: config.timing.analysis_delay(),
        }
    }
}

/// Everything a tick or an analysis may change.
#[derive(Debug)]
struct MonitorState {
    buffer: TelemetryBuffer,
    agents: AgentRegistry,
    status: SystemStatus,
    recommendation: String,
    processing: bool,
    summary: SessionSummary,
}

/// Point-in-time copy of the monitor for presentation.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorSnapshot {
    pub status: SystemStatus,
    pub recommendation: String,
    pub processing: bool,
    pub agents: Vec<Agent>,
    pub latest: Option<Sample>,
    pub history: Vec<Sample>,
    pub slip: Option<SlipStats>,
    pub summary: SessionSummary,
}

/// Handle to the shared monitor state. Clones share the same state.
#[derive(Debug, Clone)]
pub struct TractionMonitor {
    state: Arc<Mutex<MonitorState>>,
    settings: MonitorSettings,
}

impl TractionMonitor {
    /// Create a monitor with the seeded agents.
    pub fn new(settings: MonitorSettings) -> Self {
        Self::with_registry(settings, AgentRegistry::seeded())
    }

    /// Create a monitor over an explicit agent registry.
    pub fn with_registry(settings: MonitorSettings, agents: AgentRegistry) -> Self {
        info!(
            "Monitor ready: {} agents, history {}, analysis window {}",
            agents.len(),
            settings.capacity,
            settings.analysis_window
        );

        let state = MonitorState {
            buffer: TelemetryBuffer::with_capacity(settings.capacity),
            agents,
            status: SystemStatus::Normal,
            recommendation: INITIAL_RECOMMENDATION.to_string(),
            processing: false,
            summary: SessionSummary::default(),
        };

        Self {
            state: Arc::new(Mutex::new(state)),
            settings,
        }
    }

    /// Feed one sample: validate, buffer, classify and publish.
    ///
    /// An invalid sample is rejected before the lock is taken.
    pub fn on_tick(&self, sample: Sample) -> Result<Classification, TelemetryError> {
        if let Err(e) = sample.validate() {
            warn!("Rejected sample at {}: {}", sample.timestamp, e);
            return Err(e);
        }

        let classification = classify(&sample, &self.settings.thresholds);
        debug!(
            "Tick {}: slip {:.2}% -> {}",
            sample.timestamp, sample.slip_ratio, classification.status
        );

        let mut state = self.state.lock();
        for update in &classification.updates {
            if let Err(e) = state.agents.update(update) {
                warn!("Skipping agent update: {}", e);
            }
        }

        if state.status != classification.status {
            info!(
                "{} System status {} -> {}",
                classification.status.emoji(),
                state.status,
                classification.status
            );
        }

        state.buffer.append(sample);
        state.status = classification.status;
        state.recommendation = classification.recommendation.to_string();
        state.summary.record(classification.status);

        Ok(classification)
    }

    /// Run the trailing analysis and publish its advisory after the delay.
    ///
    /// The window is captured when the request is made. Dropping the
    /// returned future before it completes publishes nothing.
    pub async fn request_analysis(&self) -> Result<TrailingAnalysis, TelemetryError> {
        let window = {
            let mut state = self.state.lock();
            if state.processing {
                return Err(TelemetryError::AnalysisInProgress);
            }
            let window = state.buffer.window(self.settings.analysis_window);
            if window.is_empty() {
                warn!("Analysis requested with no telemetry");
                return Err(TelemetryError::EmptyBufferAnalysis);
            }
            state.processing = true;
            window
        };

        let mut guard = ProcessingGuard {
            state: &self.state,
            armed: true,
        };
        let result = analysis::analyze(&window, &self.settings.thresholds)?;
        info!(
            "Analyzing {} samples (avg slip {:.2}%)...",
            result.samples, result.avg_slip
        );

        tokio::time::sleep(self.settings.analysis_delay).await;

        {
            let mut state = self.state.lock();
            state.recommendation = result.advisory.to_string();
            state.summary.analyses += 1;
            state.processing = false;
            guard.armed = false;
        }
        info!("Analysis published: {:?} traction", result.level);

        Ok(result)
    }

    pub fn status(&self) -> SystemStatus {
        self.state.lock().status
    }

    /// Agents in registration order.
    pub fn agents(&self) -> Vec<Agent> {
        self.state.lock().agents.list().to_vec()
    }

    pub fn recommendation(&self) -> String {
        self.state.lock().recommendation.clone()
    }

    pub fn latest_sample(&self) -> Option<Sample> {
        self.state.lock().buffer.latest().cloned()
    }

    /// The last `n` buffered samples, oldest first.
    pub fn history(&self, n: usize) -> Vec<Sample> {
        self.state.lock().buffer.window(n)
    }

    /// Whether an analysis is waiting to publish.
    pub fn is_processing(&self) -> bool {
        self.state.lock().processing
    }

    pub fn summary(&self) -> SessionSummary {
        self.state.lock().summary.clone()
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        let state = self.state.lock();
        MonitorSnapshot {
            status: state.status,
            recommendation: state.recommendation.clone(),
            processing: state.processing,
            agents: state.agents.list().to_vec(),
            latest: state.buffer.latest().cloned(),
            history: state.buffer.window(state.buffer.capacity()),
            slip: analysis::slip_stats(state.buffer.iter()),
            summary: state.summary.clone(),
        }
    }
}

/// Clears the processing flag when an analysis is dropped before it
/// publishes. Disarmed by the publish itself.
struct ProcessingGuard<'a> {
    state: &'a Mutex<MonitorState>,
    armed: bool,
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.lock().processing = false;
        }
    }
}
