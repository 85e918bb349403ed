//! Traction monitor core.
//!
//! A bounded telemetry buffer, a rule-based slip classifier, a registry
//! of monitoring agents and an on-demand trailing analysis, wired
//! together behind [`monitor::TractionMonitor`].

pub mod agent;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod monitor;
pub mod report;
pub mod scheduler;
pub mod telemetry;

pub use error::TelemetryError;
pub use models::{Agent, AgentStatus, Sample, SystemStatus};
pub use monitor::{MonitorSettings, MonitorSnapshot, TractionMonitor};
