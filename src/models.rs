//! Data models for the traction monitor.
//!
//! This module contains the core data structures shared by the buffer,
//! the classifier, the agent registry and the session report.

use crate::error::TelemetryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall health classification of the traction system.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SystemStatus {
    /// Slip within the optimal range
    #[default]
    Normal,
    /// Elevated slip, traction control is compensating
    Warning,
    /// Excessive slip, braking and throttle intervention
    Critical,
}

impl fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemStatus::Normal => write!(f, "Normal"),
            SystemStatus::Warning => write!(f, "Warning"),
            SystemStatus::Critical => write!(f, "Critical"),
        }
    }
}

impl SystemStatus {
    /// Returns an emoji representation of the status.
    pub fn emoji(&self) -> &'static str {
        match self {
            SystemStatus::Normal => "🟢",
            SystemStatus::Warning => "🟡",
            SystemStatus::Critical => "🔴",
        }
    }
}

/// Operational state of a single monitoring agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Active,
    Idle,
    Alert,
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentStatus::Active => write!(f, "ACTIVE"),
            AgentStatus::Idle => write!(f, "IDLE"),
            AgentStatus::Alert => write!(f, "ALERT"),
        }
    }
}

/// One telemetry reading taken from the vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Wall-clock label of the reading (e.g. `14:03:21`).
    pub timestamp: String,
    /// Wheel speed in km/h.
    pub wheel_speed: f64,
    /// Wheel slip as a percentage (0-100).
    pub slip_ratio: f64,
    /// Applied brake force as a percentage.
    pub brake_force: f64,
    /// Throttle pedal position as a percentage (0-100).
    pub throttle_position: f64,
}

impl Sample {
    pub fn new(
        timestamp: impl Into<String>,
        wheel_speed: f64,
        slip_ratio: f64,
        brake_force: f64,
        throttle_position: f64,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            wheel_speed,
            slip_ratio,
            brake_force,
            throttle_position,
        }
    }

    /// Check every numeric field for finiteness and physical range.
    ///
    /// Returns the first offending field so the caller can report it.
    pub fn validate(&self) -> Result<(), TelemetryError> {
        let fields: [(&'static str, f64, f64, f64); 4] = [
            ("wheel_speed", self.wheel_speed, 0.0, f64::MAX),
            ("slip_ratio", self.slip_ratio, 0.0, 100.0),
            ("brake_force", self.brake_force, 0.0, f64::MAX),
            ("throttle_position", self.throttle_position, 0.0, 100.0),
        ];

        for (field, value, min, max) in fields {
            if !value.is_finite() || value < min || value > max {
                return Err(TelemetryError::InvalidSample { field, value });
            }
        }

        Ok(())
    }
}

/// A monitored subsystem with a narrative action and confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Stable identity, e.g. `slip-detection`.
    pub id: String,
    /// Display name.
    pub name: String,
    pub status: AgentStatus,
    /// What the agent is currently doing.
    pub last_action: String,
    /// Confidence score, 0-100.
    pub confidence: u8,
}

impl Agent {
    pub fn new(
        id: &str,
        name: &str,
        status: AgentStatus,
        last_action: &str,
        confidence: u8,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            status,
            last_action: last_action.to_string(),
            confidence: confidence.min(100),
        }
    }

    /// Overwrite the mutable fields from an update.
    pub fn apply(&mut self, update: &AgentUpdate) {
        self.status = update.status;
        self.last_action = update.last_action.to_string();
        self.confidence = update.confidence.min(100);
    }
}

/// Replacement values for one agent's mutable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgentUpdate {
    pub id: &'static str,
    pub status: AgentStatus,
    pub last_action: &'static str,
    pub confidence: u8,
}

/// Counters accumulated over a monitoring session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Samples accepted and classified.
    pub ticks: usize,
    /// Ticks classified as normal.
    pub normal: usize,
    /// Ticks classified as warning.
    pub warning: usize,
    /// Ticks classified as critical.
    pub critical: usize,
    /// Trailing analyses that published a recommendation.
    pub analyses: usize,
    /// Highest status observed during the session.
    pub worst_status: SystemStatus,
}

impl SessionSummary {
    /// Record one classified tick.
    pub fn record(&mut self, status: SystemStatus) {
        self.ticks += 1;
        match status {
            SystemStatus::Normal => self.normal += 1,
            SystemStatus::Warning => self.warning += 1,
            SystemStatus::Critical => self.critical += 1,
        }
        self.worst_status = self.worst_status.max(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(slip: f64) -> Sample {
        Sample::new("12:00:00", 80.0, slip, 40.0, 50.0)
    }

    #[test]
    fn test_status_ordering() {
        assert!(SystemStatus::Critical > SystemStatus::Warning);
        assert!(SystemStatus::Warning > SystemStatus::Normal);
        assert_eq!(SystemStatus::default(), SystemStatus::Normal);
    }

    #[test]
    fn test_valid_sample() {
        assert!(sample(0.0).validate().is_ok());
        assert!(sample(100.0).validate().is_ok());
    }

    #[test]
    fn test_rejects_non_finite_fields() {
        let err = sample(f64::NAN).validate().unwrap_err();
        assert!(matches!(
            err,
            TelemetryError::InvalidSample {
                field: "slip_ratio",
                ..
            }
        ));

        let mut s = sample(5.0);
        s.wheel_speed = f64::INFINITY;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_domain_fields() {
        assert!(sample(-0.5).validate().is_err());
        assert!(sample(100.5).validate().is_err());

        let mut s = sample(5.0);
        s.throttle_position = 120.0;
        let err = s.validate().unwrap_err();
        assert!(matches!(
            err,
            TelemetryError::InvalidSample {
                field: "throttle_position",
                ..
            }
        ));
    }

    #[test]
    fn test_agent_apply_update() {
        let mut agent = Agent::new("x", "X Agent", AgentStatus::Idle, "Waiting", 50);
        agent.apply(&AgentUpdate {
            id: "x",
            status: AgentStatus::Alert,
            last_action: "Reacting",
            confidence: 77,
        });

        assert_eq!(agent.status, AgentStatus::Alert);
        assert_eq!(agent.last_action, "Reacting");
        assert_eq!(agent.confidence, 77);
        assert_eq!(agent.name, "X Agent");
    }

    #[test]
    fn test_session_summary_tracks_worst_status() {
        let mut summary = SessionSummary::default();
        summary.record(SystemStatus::Normal);
        summary.record(SystemStatus::Critical);
        summary.record(SystemStatus::Warning);

        assert_eq!(summary.ticks, 3);
        assert_eq!(summary.critical, 1);
        assert_eq!(summary.worst_status, SystemStatus::Critical);
    }
}
