//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.traction.toml` files.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".traction.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Classification thresholds.
    #[serde(default)]
    pub thresholds: Thresholds,

    /// Telemetry buffer settings.
    #[serde(default)]
    pub buffer: BufferConfig,

    /// Tick and analysis timing.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Synthetic sample source settings.
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Session report format ("text" or "json").
    #[serde(default)]
    pub format: ReportFormat,
}

/// Output format for the session report.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Plain text (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Slip thresholds, in percent.
///
/// The instantaneous pair drives per-tick classification, the average
/// pair drives the trailing analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Slip above this is a warning.
    #[serde(default = "default_warning_slip")]
    pub warning_slip: f64,

    /// Slip above this is critical.
    #[serde(default = "default_critical_slip")]
    pub critical_slip: f64,

    /// Average slip above this is moderate traction loss.
    #[serde(default = "default_moderate_avg_slip")]
    pub moderate_avg_slip: f64,

    /// Average slip above this is high.
    #[serde(default = "default_high_avg_slip")]
    pub high_avg_slip: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warning_slip: default_warning_slip(),
            critical_slip: default_critical_slip(),
            moderate_avg_slip: default_moderate_avg_slip(),
            high_avg_slip: default_high_avg_slip(),
        }
    }
}

fn default_warning_slip() -> f64 {
    8.0
}

fn default_critical_slip() -> f64 {
    12.0
}

fn default_moderate_avg_slip() -> f64 {
    6.0
}

fn default_high_avg_slip() -> f64 {
    10.0
}

/// Telemetry buffer settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BufferConfig {
    /// Number of samples retained.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Number of trailing samples averaged by the analyzer.
    #[serde(default = "default_analysis_window")]
    pub analysis_window: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            analysis_window: default_analysis_window(),
        }
    }
}

fn default_capacity() -> usize {
    20
}

fn default_analysis_window() -> usize {
    10
}

/// Tick and analysis timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Interval between telemetry ticks in milliseconds.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    /// Latency of the trailing analysis in milliseconds.
    #[serde(default = "default_analysis_delay")]
    pub analysis_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            analysis_delay_ms: default_analysis_delay(),
        }
    }
}

impl TimingConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }
}

fn default_tick_interval() -> u64 {
    1500
}

fn default_analysis_delay() -> u64 {
    2000
}

/// Inclusive-exclusive value range for one synthetic channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Synthetic sample source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// RNG seed for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_wheel_speed")]
    pub wheel_speed: Range,

    #[serde(default = "default_slip_ratio")]
    pub slip_ratio: Range,

    #[serde(default = "default_brake_force")]
    pub brake_force: Range,

    #[serde(default = "default_throttle_position")]
    pub throttle_position: Range,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            wheel_speed: default_wheel_speed(),
            slip_ratio: default_slip_ratio(),
            brake_force: default_brake_force(),
            throttle_position: default_throttle_position(),
        }
    }
}

impl SimulationConfig {
    /// Every range must be finite and non-empty.
    pub fn validate(&self) -> Result<()> {
        for (name, range) in [
            ("wheel_speed", self.wheel_speed),
            ("slip_ratio", self.slip_ratio),
            ("brake_force", self.brake_force),
            ("throttle_position", self.throttle_position),
        ] {
            if !(range.min.is_finite() && range.max.is_finite()) || range.min >= range.max {
                bail!(
                    "Simulation range {} is invalid: {}..{}",
                    name,
                    range.min,
                    range.max
                );
            }
        }
        Ok(())
    }
}

fn default_wheel_speed() -> Range {
    Range::new(60.0, 100.0)
}

fn default_slip_ratio() -> Range {
    Range::new(0.0, 15.0)
}

fn default_brake_force() -> Range {
    Range::new(30.0, 60.0)
}

fn default_throttle_position() -> Range {
    Range::new(40.0, 60.0)
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence, but only where they were given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(interval) = args.interval_ms {
            self.timing.tick_interval_ms = interval;
        }
        if let Some(delay) = args.analysis_delay_ms {
            self.timing.analysis_delay_ms = delay;
        }
        if let Some(seed) = args.seed {
            self.simulation.seed = Some(seed);
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Reject settings the monitor cannot run with.
    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        for (name, value) in [
            ("warning_slip", t.warning_slip),
            ("critical_slip", t.critical_slip),
            ("moderate_avg_slip", t.moderate_avg_slip),
            ("high_avg_slip", t.high_avg_slip),
        ] {
            if !value.is_finite() {
                bail!("Threshold {} must be a finite number", name);
            }
        }
        if t.warning_slip >= t.critical_slip {
            bail!(
                "warning_slip ({}) must be below critical_slip ({})",
                t.warning_slip,
                t.critical_slip
            );
        }
        if t.moderate_avg_slip >= t.high_avg_slip {
            bail!(
                "moderate_avg_slip ({}) must be below high_avg_slip ({})",
                t.moderate_avg_slip,
                t.high_avg_slip
            );
        }

        if self.buffer.capacity == 0 {
            bail!("Buffer capacity must be at least 1");
        }
        if self.buffer.analysis_window == 0 {
            bail!("Analysis window must be at least 1");
        }
        if self.buffer.analysis_window > self.buffer.capacity {
            bail!(
                "Analysis window ({}) cannot exceed buffer capacity ({})",
                self.buffer.analysis_window,
                self.buffer.capacity
            );
        }

        if self.timing.tick_interval_ms == 0 {
            bail!("Tick interval must be at least 1ms");
        }

        self.simulation.validate()
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
