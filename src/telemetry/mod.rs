//! Telemetry history and sample sources.

pub mod buffer;
pub mod source;

pub use buffer::TelemetryBuffer;
pub use source::{SampleSource, SimulatedSource};
