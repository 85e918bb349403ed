//! Telemetry statistics for the session report.
//!
//! This module summarises buffered history and session counters; it
//! never feeds back into classification.

use crate::analysis::classifier::severity;
use crate::config::Thresholds;
use crate::models::{Sample, SessionSummary, SystemStatus};
use serde::Serialize;
use std::collections::HashMap;

/// Slip figures over a run of samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlipStats {
    pub mean: f64,
    pub peak: f64,
    pub min: f64,
}

/// Compute mean, peak and minimum slip ratio.
pub fn slip_stats<'a, I>(samples: I) -> Option<SlipStats>
where
    I: IntoIterator<Item = &'a Sample>,
{
    let mut count = 0usize;
    let mut total = 0.0;
    let mut peak = f64::MIN;
    let mut min = f64::MAX;

    for sample in samples {
        count += 1;
        total += sample.slip_ratio;
        peak = peak.max(sample.slip_ratio);
        min = min.min(sample.slip_ratio);
    }

    if count == 0 {
        return None;
    }

    Some(SlipStats {
        mean: total / count as f64,
        peak,
        min,
    })
}

/// Count how samples would classify under the given thresholds.
pub fn status_distribution<'a, I>(
    samples: I,
    thresholds: &Thresholds,
) -> HashMap<SystemStatus, usize>
where
    I: IntoIterator<Item = &'a Sample>,
{
    let mut dist: HashMap<SystemStatus, usize> = HashMap::new();

    for sample in samples {
        *dist.entry(severity(sample.slip_ratio, thresholds)).or_default() += 1;
    }

    dist
}

/// Generate a text summary of session counters.
pub fn generate_summary_text(summary: &SessionSummary) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Ticks: {}", summary.ticks));
    lines.push(format!(
        "- {} Normal: {}",
        SystemStatus::Normal.emoji(),
        summary.normal
    ));
    lines.push(format!(
        "- {} Warning: {}",
        SystemStatus::Warning.emoji(),
        summary.warning
    ));
    lines.push(format!(
        "- {} Critical: {}",
        SystemStatus::Critical.emoji(),
        summary.critical
    ));

    lines.push(format!("Analyses run: {}", summary.analyses));
    lines.push(format!(
        "Worst status: {} {}",
        summary.worst_status.emoji(),
        summary.worst_status
    ));

    lines.join("\n")
}
