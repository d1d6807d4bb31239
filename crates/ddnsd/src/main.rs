// # ddnsd - DDNS update agent
//
// Thin integration layer. All update, editing and scheduling logic lives in
// ddns-core; this binary only:
// 1. Reads its settings from environment variables
// 2. Installs diagnostic logging
// 3. Builds the terminal console, HTTP transport, clock and event log
// 4. Loads the configuration file and runs the scheduler
// 5. Maps the outcome to a process exit code
//
// ## Configuration
//
// - `DDNS_CONFIG_PATH`: Entry file (default `config.txt`)
// - `DDNS_EVENT_LOG_PATH`: Event log file (default `ddns.log`)
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error (default `warn`)
// - `DDNS_TICK_MS`: Key polling granularity, 10..=1000 ms (default 100)
//
// Diagnostics go to stderr so they never mix with the status screen.
//
// ## Example
//
// ```bash
// export DDNS_CONFIG_PATH=/etc/ddns/config.txt
// export DDNS_EVENT_LOG_PATH=/var/log/ddns.log
// DDNS_LOG_LEVEL=info ddnsd 2>ddnsd.err
// ```

use anyhow::{Context, Result};
use ddns_console::TerminalConsole;
use ddns_core::{
    ConfigStore, FatalReport, FileEventLog, Scheduler, StopReason, SystemClock, UpdateEngine,
    report_fatal,
};
use ddns_http::HttpTransport;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_CONFIG_PATH: &str = "config.txt";
const DEFAULT_EVENT_LOG_PATH: &str = "ddns.log";
const DEFAULT_LOG_LEVEL: &str = "warn";
const DEFAULT_TICK_MS: u64 = 100;

/// Exit codes for different termination scenarios
///
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    /// Exit key or host shutdown
    CleanShutdown = 0,
    /// Invalid settings or missing configuration file
    ConfigError = 1,
    /// Transport initialization or unexpected failure
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Process settings
#[derive(Debug, Clone, PartialEq, Eq)]
struct Config {
    config_path: PathBuf,
    event_log_path: PathBuf,
    log_level: String,
    tick_ms: u64,
}

impl Config {
    /// Load settings from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let tick_ms = match lookup("DDNS_TICK_MS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("DDNS_TICK_MS must be a number of milliseconds. Got: {}", raw))?,
            None => DEFAULT_TICK_MS,
        };

        Ok(Self {
            config_path: lookup("DDNS_CONFIG_PATH")
                .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
                .into(),
            event_log_path: lookup("DDNS_EVENT_LOG_PATH")
                .unwrap_or_else(|| DEFAULT_EVENT_LOG_PATH.to_string())
                .into(),
            log_level: lookup("DDNS_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            tick_ms,
        })
    }

    /// Validate the settings
    fn validate(&self) -> Result<()> {
        if self.config_path.as_os_str().is_empty() {
            anyhow::bail!("DDNS_CONFIG_PATH cannot be empty");
        }

        if self.event_log_path.as_os_str().is_empty() {
            anyhow::bail!("DDNS_EVENT_LOG_PATH cannot be empty");
        }

        if !(10..=1000).contains(&self.tick_ms) {
            anyhow::bail!(
                "DDNS_TICK_MS must be between 10 and 1000 milliseconds. Got: {}",
                self.tick_ms
            );
        }

        self.level()?;
        Ok(())
    }

    fn level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "DDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }

    fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.level().unwrap_or(Level::WARN))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!("Starting ddnsd");

    // Cycles, waits and editing share one thread of control
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let code = rt.block_on(async {
        match run_agent(&config).await {
            Ok(code) => code,
            Err(e) => {
                error!("Agent error: {:#}", e);
                DdnsExitCode::RuntimeError
            }
        }
    });

    info!("ddnsd exiting with {:?}", code);
    code.into()
}

/// Build the collaborators and run until exit
///
/// The console is dropped before returning, restoring the terminal on
/// every path.
async fn run_agent(config: &Config) -> Result<DdnsExitCode> {
    let mut console = TerminalConsole::new().context("Failed to open the console")?;
    let clock = SystemClock;
    let event_log = FileEventLog::new(&config.event_log_path);
    let store = ConfigStore::new(&config.config_path);

    let ack_hint = console.is_interactive().then_some("Press Enter to exit");

    let ddns_config = match store.load().await {
        Ok(loaded) => loaded,
        Err(e) => {
            let mut report = FatalReport::config_load(&e, store.path());
            if matches!(e, ddns_core::Error::ConfigNotFound(_)) {
                report = report.with_line("or set DDNS_CONFIG_PATH to its location.");
            }
            report_fatal(&report, &mut console, &clock, &event_log, ack_hint, config.tick()).await?;
            return Ok(DdnsExitCode::ConfigError);
        }
    };

    let transport = match HttpTransport::new() {
        Ok(transport) => transport,
        Err(e) => {
            let report = FatalReport::transport_init(&e);
            report_fatal(&report, &mut console, &clock, &event_log, ack_hint, config.tick()).await?;
            return Ok(DdnsExitCode::RuntimeError);
        }
    };

    let engine = UpdateEngine::new(Box::new(transport), Box::new(clock), Box::new(event_log));
    let mut scheduler = Scheduler::new(engine, store, ddns_config)
        .with_tick(config.tick())
        .with_key_hint(console.key_hint());

    match scheduler.run(&mut console).await? {
        StopReason::ExitRequested => info!("Stopped by exit key"),
        StopReason::HostShutdown => info!("Stopped by host shutdown"),
    }
    Ok(DdnsExitCode::CleanShutdown)
}
