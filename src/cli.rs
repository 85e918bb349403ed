//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::config::ReportFormat;
use crate::models::SystemStatus;
use clap::Parser;
use std::path::PathBuf;

/// traction-monitor - rule-based traction control monitor
///
/// Feeds simulated wheel telemetry through the slip classifier, tracks
/// the traction agents, and prints a session report on exit.
///
/// Examples:
///   traction-monitor --ticks 40
///   traction-monitor --interval-ms 200 --analyze-every 10
///   traction-monitor --ticks 100 --seed 7 --format json --fail-on critical
///   traction-monitor --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for .traction.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Stop after this many ticks (default: run until Ctrl-C)
    #[arg(short, long, value_name = "COUNT")]
    pub ticks: Option<u64>,

    /// Milliseconds between telemetry ticks
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Milliseconds the trailing analysis takes to publish
    #[arg(long, value_name = "MS")]
    pub analysis_delay_ms: Option<u64>,

    /// Request a trailing analysis every N accepted samples
    #[arg(short, long, value_name = "N")]
    pub analyze_every: Option<u64>,

    /// Seed for the simulated sample source
    #[arg(long, env = "TRACTION_SEED")]
    pub seed: Option<u64>,

    /// Session report format (text, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<ReportFormat>,

    /// Exit with code 2 if the session reached this status
    ///
    /// Values: warning, critical
    #[arg(long, value_name = "LEVEL")]
    pub fail_on: Option<FailOnLevel>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .traction.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Status level for --fail-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum FailOnLevel {
    Warning,
    Critical,
}

impl From<FailOnLevel> for SystemStatus {
    fn from(level: FailOnLevel) -> Self {
        match level {
            FailOnLevel::Warning => SystemStatus::Warning,
            FailOnLevel::Critical => SystemStatus::Critical,
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.ticks == Some(0) {
            return Err("Tick count must be at least 1".to_string());
        }

        if self.interval_ms == Some(0) {
            return Err("Tick interval must be at least 1ms".to_string());
        }

        if self.analyze_every == Some(0) {
            return Err("--analyze-every must be at least 1".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            config: None,
            ticks: None,
            interval_ms: None,
            analysis_delay_ms: None,
            analyze_every: None,
            seed: None,
            format: None,
            fail_on: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "traction-monitor",
            "--ticks",
            "40",
            "--analyze-every",
            "10",
            "--format",
            "json",
            "--fail-on",
            "critical",
        ])
        .unwrap();

        assert_eq!(args.ticks, Some(40));
        assert_eq!(args.analyze_every, Some(10));
        assert_eq!(args.format, Some(ReportFormat::Json));
        assert_eq!(args.fail_on, Some(FailOnLevel::Critical));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_values() {
        let mut args = make_args();
        args.ticks = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.interval_ms = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.analyze_every = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_fail_on_maps_to_status() {
        assert_eq!(SystemStatus::from(FailOnLevel::Warning), SystemStatus::Warning);
        assert_eq!(
            SystemStatus::from(FailOnLevel::Critical),
            SystemStatus::Critical
        );
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
