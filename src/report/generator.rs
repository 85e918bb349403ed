//! Session report generation.
//!
//! Renders the final monitor snapshot as plain text for the terminal or
//! as JSON for other tools. Nothing is written to disk.

use crate::analysis::{generate_summary_text, status_distribution};
use crate::config::Thresholds;
use crate::models::{Agent, Sample, SystemStatus};
use crate::monitor::MonitorSnapshot;
use crate::scheduler::TickStats;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Run-level metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub started_at: DateTime<Utc>,
    pub duration_seconds: f64,
    pub version: String,
}

/// Everything printed at the end of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub metadata: ReportMetadata,
    pub monitor: MonitorSnapshot,
    pub ticks: TickStats,
    pub thresholds: Thresholds,
}

/// Generate the plain-text report.
pub fn generate_text_report(report: &SessionReport) -> String {
    let mut output = String::new();

    output.push_str(&generate_header(report));
    output.push_str(&generate_recommendation_section(&report.monitor));
    output.push_str(&generate_agents_section(&report.monitor.agents));
    output.push_str(&generate_metrics_section(report.monitor.latest.as_ref()));
    output.push_str(&generate_history_section(report));
    output.push_str(&generate_session_section(report));

    output
}

fn generate_header(report: &SessionReport) -> String {
    let status = report.monitor.status;
    format!(
        "=== Traction Monitor v{} ===\nStarted: {}\nDuration: {:.1}s\nStatus: {} {}\n\n",
        report.metadata.version,
        report.metadata.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.metadata.duration_seconds,
        status.emoji(),
        status.to_string().to_uppercase()
    )
}

fn generate_recommendation_section(monitor: &MonitorSnapshot) -> String {
    let mut section = String::from("Recommendation:\n");
    section.push_str(&format!("  {}\n", monitor.recommendation));
    if monitor.processing {
        section.push_str("  (analysis pending)\n");
    }
    section.push('\n');
    section
}

fn generate_agents_section(agents: &[Agent]) -> String {
    let mut section = String::from("Agents:\n");
    for agent in agents {
        section.push_str(&format!(
            "  {:<24} {:<7} {:>3}%  {}\n",
            agent.name,
            agent.status.to_string(),
            agent.confidence,
            agent.last_action
        ));
    }
    section.push('\n');
    section
}

/// The four live readings of the most recent sample.
fn generate_metrics_section(latest: Option<&Sample>) -> String {
    let (speed, slip, brake, throttle) = latest
        .map(|s| (s.wheel_speed, s.slip_ratio, s.brake_force, s.throttle_position))
        .unwrap_or((0.0, 0.0, 0.0, 0.0));

    format!(
        "Latest reading:\n  Wheel Speed: {:.1} km/h\n  Slip Ratio:  {:.1}%\n  Brake Force: {:.1}%\n  Throttle:    {:.1}%\n\n",
        speed, slip, brake, throttle
    )
}

fn generate_history_section(report: &SessionReport) -> String {
    let history = &report.monitor.history;
    let mut section = format!("History ({} samples):\n", history.len());

    if let Some(slip) = report.monitor.slip {
        section.push_str(&format!(
            "  Slip mean {:.2}% | peak {:.2}% | min {:.2}%\n",
            slip.mean, slip.peak, slip.min
        ));

        let dist = status_distribution(history, &report.thresholds);
        section.push_str(&format!(
            "  {} {} | {} {} | {} {}\n",
            SystemStatus::Normal.emoji(),
            dist.get(&SystemStatus::Normal).copied().unwrap_or(0),
            SystemStatus::Warning.emoji(),
            dist.get(&SystemStatus::Warning).copied().unwrap_or(0),
            SystemStatus::Critical.emoji(),
            dist.get(&SystemStatus::Critical).copied().unwrap_or(0),
        ));
    } else {
        section.push_str("  No telemetry received.\n");
    }

    section.push('\n');
    section
}

fn generate_session_section(report: &SessionReport) -> String {
    let mut section = String::from("Session:\n");
    section.push_str(&generate_summary_text(&report.monitor.summary));
    section.push('\n');
    if report.ticks.rejected > 0 {
        section.push_str(&format!("Rejected samples: {}\n", report.ticks.rejected));
    }
    if report.ticks.interrupted {
        section.push_str("Stopped by shutdown signal.\n");
    }
    section
}

/// Generate a JSON report.
pub fn generate_json_report(report: &SessionReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{MonitorSettings, TractionMonitor};

    fn create_test_report(slips: &[f64]) -> SessionReport {
        let monitor = TractionMonitor::new(MonitorSettings::default());
        for &slip in slips {
            monitor
                .on_tick(Sample::new("13:37:00", 88.0, slip, 41.0, 52.0))
                .unwrap();
        }

        SessionReport {
            metadata: ReportMetadata {
                started_at: Utc::now(),
                duration_seconds: 4.5,
                version: "1.0.0".to_string(),
            },
            monitor: monitor.snapshot(),
            ticks: TickStats {
                ticks: slips.len() as u64 + 1,
                processed: slips.len() as u64,
                rejected: 1,
                ..TickStats::default()
            },
            thresholds: Thresholds::default(),
        }
    }

    #[test]
    fn test_generate_text_report() {
        let report = create_test_report(&[3.0, 9.0, 13.5]);
        let text = generate_text_report(&report);

        assert!(text.contains("Status: 🔴 CRITICAL"));
        assert!(text.contains("Critical slip detected!"));
        assert!(text.contains("Slip Detection Agent"));
        assert!(text.contains("Throttle Manager Agent"));
        assert!(text.contains("Slip Ratio:  13.5%"));
        assert!(text.contains("History (3 samples)"));
        assert!(text.contains("Rejected samples: 1"));
    }

    #[test]
    fn test_text_report_without_samples() {
        let report = create_test_report(&[]);
        let text = generate_text_report(&report);

        assert!(text.contains("Status: 🟢 NORMAL"));
        assert!(text.contains("All systems operating normally"));
        assert!(text.contains("Wheel Speed: 0.0 km/h"));
        assert!(text.contains("No telemetry received."));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report(&[9.5]);
        let json = generate_json_report(&report).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["monitor"]["status"], "warning");
        assert_eq!(value["monitor"]["agents"][0]["id"], "slip-detection");
        assert_eq!(value["monitor"]["agents"][0]["confidence"], 90);
        assert_eq!(value["ticks"]["rejected"], 1);
        assert_eq!(value["thresholds"]["critical_slip"], 12.0);
    }
}
