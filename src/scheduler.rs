//! Periodic tick loop.
//!
//! One task owns the loop, so ticks are serialized: each pulls a sample,
//! feeds it to the monitor, and optionally fires an operator analysis
//! request in the background. Shutdown is only observed between ticks.

use crate::monitor::TractionMonitor;
use crate::telemetry::SampleSource;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Scheduler settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerOptions {
    /// Time between ticks.
    pub interval: Duration,
    /// Stop after this many ticks.
    pub tick_limit: Option<u64>,
    /// Request a trailing analysis every N accepted samples.
    pub analyze_every: Option<u64>,
    /// Show a spinner while an analysis is pending.
    pub show_progress: bool,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1500),
            tick_limit: None,
            analyze_every: None,
            show_progress: false,
        }
    }
}

/// Counters kept by the tick loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickStats {
    /// Ticks attempted.
    pub ticks: u64,
    /// Samples accepted by the monitor.
    pub processed: u64,
    /// Samples rejected by validation.
    pub rejected: u64,
    /// Analyses started.
    pub analyses_requested: u64,
    /// Analysis triggers skipped because one was already pending.
    pub analyses_skipped: u64,
    /// Whether the loop ended on a shutdown signal.
    pub interrupted: bool,
}

pub struct Scheduler<S> {
    monitor: TractionMonitor,
    source: S,
    options: SchedulerOptions,
    stats: TickStats,
    pending: Option<JoinHandle<()>>,
    spinner: Option<ProgressBar>,
}

impl<S: SampleSource> Scheduler<S> {
    pub fn new(monitor: TractionMonitor, source: S, options: SchedulerOptions) -> Self {
        Self {
            monitor,
            source,
            options,
            stats: TickStats::default(),
            pending: None,
            spinner: None,
        }
    }

    pub fn stats(&self) -> TickStats {
        self.stats
    }

    /// Run one tick: pull a sample and hand it to the monitor.
    pub fn tick(&mut self) {
        self.stats.ticks += 1;
        let sample = self.source.next_sample();
        let label = sample.timestamp.clone();
        let slip = sample.slip_ratio;

        match self.monitor.on_tick(sample) {
            Ok(classification) => {
                self.stats.processed += 1;
                let line = format!(
                    "[{}] {} {:<8} slip {:>5.1}%",
                    label,
                    classification.status.emoji(),
                    classification.status.to_string(),
                    slip
                );
                match self.spinner.as_ref().filter(|pb| !pb.is_finished()) {
                    Some(pb) => pb.suspend(|| debug!("{}", line)),
                    None => debug!("{}", line),
                }

                if let Some(every) = self.options.analyze_every {
                    if every > 0 && self.stats.processed % every == 0 {
                        self.spawn_analysis();
                    }
                }
            }
            Err(e) => {
                self.stats.rejected += 1;
                debug!("Tick {} dropped: {}", self.stats.ticks, e);
            }
        }
    }

    /// Start an operator analysis unless one is already in flight.
    fn spawn_analysis(&mut self) {
        if let Some(handle) = &self.pending {
            if !handle.is_finished() {
                self.stats.analyses_skipped += 1;
                debug!("Analysis still pending, skipping trigger");
                return;
            }
        }

        self.stats.analyses_requested += 1;
        let monitor = self.monitor.clone();
        let spinner = self.options.show_progress.then(|| {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
                pb.set_style(style);
            }
            pb.set_message("Analyzing...");
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        self.spinner = spinner.clone();
        self.pending = Some(tokio::spawn(async move {
            let result = monitor.request_analysis().await;
            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }
            match result {
                Ok(analysis) => info!("💡 {}", analysis.advisory),
                Err(e) => warn!("Analysis failed: {}", e),
            }
        }));
    }

    /// Tick until the limit is reached or `shutdown` flips to `true`.
    ///
    /// A pending analysis is awaited on normal completion and aborted on
    /// shutdown, so an interrupted run never publishes a late advisory.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> TickStats {
        let mut ticker = tokio::time::interval(self.options.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "Tick loop started: every {}ms{}",
            self.options.interval.as_millis(),
            self.options
                .tick_limit
                .map(|n| format!(", {} ticks", n))
                .unwrap_or_default()
        );

        loop {
            if let Some(limit) = self.options.tick_limit {
                if self.stats.ticks >= limit {
                    break;
                }
            }

            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Shutdown requested, stopping tick loop");
                        self.stats.interrupted = true;
                        break;
                    }
                }
                _ = ticker.tick() => self.tick(),
            }
        }

        if let Some(handle) = self.pending.take() {
            if self.stats.interrupted {
                handle.abort();
                if let Some(pb) = &self.spinner {
                    pb.finish_and_clear();
                }
                debug!("Cancelled pending analysis");
            } else if let Err(e) = handle.await {
                warn!("Analysis task failed: {}", e);
            }
        }

        info!(
            "Tick loop finished: {} processed, {} rejected",
            self.stats.processed, self.stats.rejected
        );
        self.stats
    }
}
