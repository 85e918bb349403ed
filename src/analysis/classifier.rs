//! Per-tick severity classification.
//!
//! Slip ratio alone decides the outcome. Each bucket names the agents it
//! touches; agents left out keep whatever they had before.

use crate::agent::registry::{BRAKE_CONTROL, SLIP_DETECTION};
use crate::config::Thresholds;
use crate::models::{AgentStatus, AgentUpdate, Sample, SystemStatus};
use serde::Serialize;

pub const CRITICAL_RECOMMENDATION: &str =
    "Critical slip detected! Reducing throttle and applying optimal brake force.";
pub const WARNING_RECOMMENDATION: &str =
    "Moderate slip detected. Adjusting traction control parameters.";
pub const NORMAL_RECOMMENDATION: &str =
    "Optimal traction maintained. All agents functioning normally.";

/// Outcome of classifying one sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub status: SystemStatus,
    pub recommendation: &'static str,
    /// Agents to update; all others are left untouched.
    pub updates: Vec<AgentUpdate>,
}

/// Map a slip ratio onto a status using the instantaneous thresholds.
///
/// The critical bound is strict; the warning bound is inclusive toward
/// normal.
pub fn severity(slip_ratio: f64, thresholds: &Thresholds) -> SystemStatus {
    if slip_ratio > thresholds.critical_slip {
        SystemStatus::Critical
    } else if slip_ratio > thresholds.warning_slip {
        SystemStatus::Warning
    } else {
        SystemStatus::Normal
    }
}

/// Classify a sample into a status, recommendation and agent updates.
pub fn classify(sample: &Sample, thresholds: &Thresholds) -> Classification {
    let status = severity(sample.slip_ratio, thresholds);

    match status {
        SystemStatus::Critical => Classification {
            status,
            recommendation: CRITICAL_RECOMMENDATION,
            updates: vec![
                AgentUpdate {
                    id: SLIP_DETECTION,
                    status: AgentStatus::Alert,
                    last_action: "Detecting excessive slip",
                    confidence: 85,
                },
                AgentUpdate {
                    id: BRAKE_CONTROL,
                    status: AgentStatus::Alert,
                    last_action: "Increasing brake force",
                    confidence: 88,
                },
            ],
        },
        SystemStatus::Warning => Classification {
            status,
            recommendation: WARNING_RECOMMENDATION,
            updates: vec![AgentUpdate {
                id: SLIP_DETECTION,
                status: AgentStatus::Active,
                last_action: "Monitoring elevated slip",
                confidence: 90,
            }],
        },
        SystemStatus::Normal => Classification {
            status,
            recommendation: NORMAL_RECOMMENDATION,
            updates: vec![
                AgentUpdate {
                    id: SLIP_DETECTION,
                    status: AgentStatus::Active,
                    last_action: "Monitoring wheel slip",
                    confidence: 98,
                },
                AgentUpdate {
                    id: BRAKE_CONTROL,
                    status: AgentStatus::Active,
                    last_action: "Optimizing brake force",
                    confidence: 95,
                },
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(slip: f64) -> Sample {
        Sample::new("10:00:00", 75.0, slip, 45.0, 50.0)
    }

    fn update_for(c: &Classification, id: &str) -> Option<AgentUpdate> {
        c.updates.iter().find(|u| u.id == id).copied()
    }

    #[test]
    fn test_normal_bucket() {
        let thresholds = Thresholds::default();
        for slip in [0.0, 3.2, 7.99, 8.0] {
            let c = classify(&sample(slip), &thresholds);
            assert_eq!(c.status, SystemStatus::Normal, "slip {}", slip);
            assert_eq!(c.recommendation, NORMAL_RECOMMENDATION);

            let slip_agent = update_for(&c, SLIP_DETECTION).unwrap();
            let brake_agent = update_for(&c, BRAKE_CONTROL).unwrap();
            assert_eq!(slip_agent.status, AgentStatus::Active);
            assert_eq!(slip_agent.confidence, 98);
            assert_eq!(brake_agent.status, AgentStatus::Active);
            assert_eq!(brake_agent.confidence, 95);
        }
    }

    #[test]
    fn test_warning_bucket_leaves_brake_agent_alone() {
        let thresholds = Thresholds::default();
        for slip in [8.01, 10.0, 12.0] {
            let c = classify(&sample(slip), &thresholds);
            assert_eq!(c.status, SystemStatus::Warning, "slip {}", slip);
            assert_eq!(c.recommendation, WARNING_RECOMMENDATION);
            assert_eq!(c.updates.len(), 1);

            let slip_agent = update_for(&c, SLIP_DETECTION).unwrap();
            assert_eq!(slip_agent.status, AgentStatus::Active);
            assert_eq!(slip_agent.last_action, "Monitoring elevated slip");
            assert_eq!(slip_agent.confidence, 90);
            assert!(update_for(&c, BRAKE_CONTROL).is_none());
        }
    }

    #[test]
    fn test_critical_bucket() {
        let thresholds = Thresholds::default();
        for slip in [12.001, 14.5, 100.0] {
            let c = classify(&sample(slip), &thresholds);
            assert_eq!(c.status, SystemStatus::Critical, "slip {}", slip);
            assert_eq!(c.recommendation, CRITICAL_RECOMMENDATION);

            let slip_agent = update_for(&c, SLIP_DETECTION).unwrap();
            let brake_agent = update_for(&c, BRAKE_CONTROL).unwrap();
            assert_eq!(slip_agent.status, AgentStatus::Alert);
            assert_eq!(slip_agent.confidence, 85);
            assert_eq!(brake_agent.status, AgentStatus::Alert);
            assert_eq!(brake_agent.confidence, 88);
        }
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = Thresholds {
            warning_slip: 4.0,
            critical_slip: 6.0,
            ..Thresholds::default()
        };
        assert_eq!(severity(5.0, &thresholds), SystemStatus::Warning);
        assert_eq!(severity(6.5, &thresholds), SystemStatus::Critical);
        assert_eq!(severity(4.0, &thresholds), SystemStatus::Normal);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let thresholds = Thresholds::default();
        let s = sample(9.5);
        assert_eq!(classify(&s, &thresholds), classify(&s, &thresholds));
    }
}
