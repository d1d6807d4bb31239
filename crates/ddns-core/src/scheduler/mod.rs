//! Polling scheduler
//!
//! Drives the agent's single thread of control:
//!
//! 1. Check the exit / open-editor signals and the host predicate
//! 2. Run one update cycle
//! 3. Wait for the configured interval in short ticks, checking the same
//!    signals after every tick
//!
//! A pending signal is therefore honored within one tick instead of after
//! the full interval. The editor runs to completion inside step 1 or 3, so
//! it never interleaves with an update cycle.

use std::time::Duration;
use tracing::{debug, info};

use crate::config::DdnsConfig;
use crate::editor::Editor;
use crate::engine::UpdateEngine;
use crate::error::Result;
use crate::store::ConfigStore;
use crate::traits::{Console, Display, HostControl, Key, KeySource};

/// Default signal polling granularity
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// Default status screen key hint
pub const DEFAULT_KEY_HINT: &str = "OpenEditor: edit entries  Exit: quit";

/// Why the scheduler returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The exit signal was pressed
    ExitRequested,
    /// The host environment asked the agent to stop
    HostShutdown,
}

/// Main loop owner of the process configuration
pub struct Scheduler {
    engine: UpdateEngine,
    store: ConfigStore,
    config: DdnsConfig,
    tick: Duration,
    key_hint: String,
}

impl Scheduler {
    /// Create a scheduler over a loaded configuration
    ///
    /// # Parameters
    ///
    /// - `engine`: Update engine
    /// - `store`: Store the editor saves to
    /// - `config`: Configuration loaded from `store`
    pub fn new(engine: UpdateEngine, store: ConfigStore, config: DdnsConfig) -> Self {
        Self {
            engine,
            store,
            config,
            tick: DEFAULT_TICK,
            key_hint: DEFAULT_KEY_HINT.to_string(),
        }
    }

    /// Override the signal polling granularity
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Override the key hint shown on the status screen
    pub fn with_key_hint(mut self, hint: impl Into<String>) -> Self {
        self.key_hint = hint.into();
        self
    }

    pub fn config(&self) -> &DdnsConfig {
        &self.config
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Run until the exit signal or a host shutdown
    pub async fn run<C: Console + ?Sized>(&mut self, console: &mut C) -> Result<StopReason> {
        info!(
            "Scheduler started: {} entries, interval {}s",
            self.config.entries.len(),
            self.config.interval_secs
        );
        self.draw_status(console)?;

        loop {
            if let Some(reason) = self.check_signals(console).await? {
                return Ok(reason);
            }

            self.engine.run_cycle(&mut self.config.entries, console).await;

            let mut waited = Duration::ZERO;
            while waited < self.interval() {
                tokio::time::sleep(self.tick).await;
                waited += self.tick;

                if let Some(reason) = self.check_signals(console).await? {
                    return Ok(reason);
                }
            }
            debug!("Interval elapsed after {:?}", waited);
        }
    }

    /// Open the editor, then redraw the status screen
    pub async fn open_editor<C: Console + ?Sized>(&mut self, console: &mut C) -> Result<()> {
        let mut editor = Editor::new(&self.store, self.tick);
        editor.run(&mut self.config, console).await?;
        self.draw_status(console)
    }

    /// Clear the screen and show the status summary
    pub fn draw_status<D: Display + ?Sized>(&self, display: &mut D) -> Result<()> {
        display.clear()?;
        display.print_line(&self.key_hint)?;
        for line in status_lines(&self.config) {
            display.print_line(&line)?;
        }
        Ok(())
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(self.config.interval_secs)
    }

    async fn check_signals<C: Console + ?Sized>(
        &mut self,
        console: &mut C,
    ) -> Result<Option<StopReason>> {
        if !console.should_continue() {
            info!("Host requested shutdown");
            return Ok(Some(StopReason::HostShutdown));
        }

        let keys = console.poll_keys();
        if keys.contains(Key::Exit) {
            info!("Exit requested");
            return Ok(Some(StopReason::ExitRequested));
        }

        if keys.contains(Key::OpenEditor) {
            self.open_editor(console).await?;
            if !console.should_continue() {
                return Ok(Some(StopReason::HostShutdown));
            }
        }
        Ok(None)
    }
}

/// Status summary: entry count, one line per entry, polling interval
pub fn status_lines(config: &DdnsConfig) -> Vec<String> {
    let mut lines = Vec::with_capacity(config.entries.len() + 2);
    lines.push(format!("Parsed {} DynDNS entries", config.entries.len()));
    for (i, entry) in config.entries.iter().enumerate() {
        lines.push(format!(" [{}] {},{}", i, entry.provider(), entry.domain()));
    }
    lines.push(format!("Polling every {} seconds", config.interval_secs));
    lines
}

/// Block until the confirm signal, polling every `tick`
///
/// # Returns
///
/// `true` when confirmed, `false` when the host stopped first
pub async fn wait_for_confirm<C>(console: &mut C, tick: Duration) -> bool
where
    C: KeySource + HostControl + ?Sized,
{
    loop {
        if !console.should_continue() {
            return false;
        }
        if console.poll_keys().contains(Key::Confirm) {
            return true;
        }
        tokio::time::sleep(tick).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Entry;

    #[test]
    fn test_status_lines() {
        let mut config = DdnsConfig::new();
        config.set_interval(60).unwrap();
        config.entries.push(Entry::new("duckdns", "foo.example.com")).unwrap();
        config.entries.push(Entry::new("noip", "bar.example.org")).unwrap();

        assert_eq!(
            status_lines(&config),
            [
                "Parsed 2 DynDNS entries",
                " [0] duckdns,foo.example.com",
                " [1] noip,bar.example.org",
                "Polling every 60 seconds",
            ]
        );
    }
}
