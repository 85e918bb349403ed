//! Error types for the monitoring core.

use thiserror::Error;

/// Failures surfaced by the monitor API.
///
/// None of these leave the monitor state partially updated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TelemetryError {
    /// A sample field was non-finite or outside its physical range.
    #[error("invalid sample: {field} = {value}")]
    InvalidSample { field: &'static str, value: f64 },

    /// An update targeted an agent that was never registered.
    #[error("unknown agent: {0}")]
    UnknownAgent(String),

    /// Trailing analysis was requested before any sample arrived.
    #[error("no telemetry data available for analysis")]
    EmptyBufferAnalysis,

    /// Another trailing analysis is still pending.
    #[error("an analysis is already in progress")]
    AnalysisInProgress,
}
