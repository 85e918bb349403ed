//! traction-monitor - rule-based traction control monitor
//!
//! Drives the monitor with simulated telemetry and prints a session
//! report when the run ends.
//!
//! Exit codes:
//!   0 - Success (status never reached the --fail-on level, or none set)
//!   1 - Runtime error (invalid arguments, config failure, etc.)
//!   2 - Session reached the --fail-on status

use anyhow::{Context, Result};
use chrono::Utc;
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use traction_monitor::cli::Args;
use traction_monitor::config::{Config, ReportFormat, DEFAULT_CONFIG_FILE};
use traction_monitor::report::{self, ReportMetadata, SessionReport};
use traction_monitor::scheduler::{Scheduler, SchedulerOptions};
use traction_monitor::telemetry::SimulatedSource;
use traction_monitor::{MonitorSettings, SystemStatus, TractionMonitor};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so the file can enable verbose output
    let config = match load_config(&args) {
        Ok(mut config) => {
            config.merge_with_args(&args);
            config
        }
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&args, &config);

    info!("traction-monitor v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    match run_monitor(args, config).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Monitor failed: {}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .traction.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to tune thresholds, timing and the simulated source.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the tick loop until done or interrupted. Returns exit code (0 or 2).
async fn run_monitor(args: Args, config: Config) -> Result<i32> {
    let started_at = Utc::now();
    let start_time = Instant::now();

    config.validate().context("Invalid configuration")?;

    let monitor = TractionMonitor::new(MonitorSettings::from(&config));
    let source = SimulatedSource::new(config.simulation.clone())?;

    let options = SchedulerOptions {
        interval: config.timing.tick_interval(),
        tick_limit: args.ticks,
        analyze_every: args.analyze_every,
        show_progress: !args.quiet && config.general.format == ReportFormat::Text,
    };
    let mut scheduler = Scheduler::new(monitor.clone(), source, options);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                warn!("Cannot listen for Ctrl-C: {}", e);
                // keep the sender alive so the loop runs to its tick limit
                std::future::pending::<()>().await;
            }
        }
    });

    let ticks = scheduler.run(shutdown_rx).await;

    let session = SessionReport {
        metadata: ReportMetadata {
            started_at,
            duration_seconds: start_time.elapsed().as_secs_f64(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        monitor: monitor.snapshot(),
        ticks,
        thresholds: config.thresholds,
    };

    let output = match config.general.format {
        ReportFormat::Json => report::generate_json_report(&session)?,
        ReportFormat::Text => report::generate_text_report(&session),
    };
    println!("{}", output);

    // Check --fail-on threshold
    if let Some(fail_level) = args.fail_on {
        let threshold: SystemStatus = fail_level.into();
        if session.monitor.summary.worst_status >= threshold {
            eprintln!(
                "\n⛔ Session reached {} status. Failing (exit code 2).",
                session.monitor.summary.worst_status
            );
            return Ok(2);
        }
    }

    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location; a broken default file falls back to defaults
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Ignoring {}: {:#}", DEFAULT_CONFIG_FILE, e);
            Ok(Config::default())
        }
    }
}
