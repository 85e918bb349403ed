//! Classification and analysis of telemetry.
//!
//! The classifier runs on every tick, the trailing analyzer on demand,
//! and the statistics feed the session report.

pub mod classifier;
pub mod statistics;
pub mod trailing;

pub use classifier::{classify, Classification};
pub use statistics::{generate_summary_text, slip_stats, status_distribution, SlipStats};
pub use trailing::{analyze, TractionLevel, TrailingAnalysis};
