//! Test doubles and common utilities for contract tests
//!
//! Every double records what it was asked to do so tests can assert on the
//! observable effects without a network or a terminal.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use ddns_core::error::Result;
use ddns_core::traits::{
    Clock, Display, EventLog, HostControl, KeySet, KeySource, TextInput, Transport,
    TransportError, UpdateRequest,
};
use ddns_core::{ConfigStore, UpdateEngine};
use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Tick used by tests that drive the scheduler or editor
pub const TEST_TICK: Duration = Duration::from_millis(100);

/// What a [`RecordingTransport`] answers for a URL
#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16),
    OpenError(&'static str),
    BeginError(&'static str),
}

/// A transport that records every request and answers from a rule list
#[derive(Clone)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<UpdateRequest>>>,
    rules: Arc<Mutex<Vec<(String, Reply)>>>,
    default_reply: Reply,
}

impl RecordingTransport {
    /// Answer every request with `200`
    pub fn new() -> Self {
        Self::with_default(Reply::Status(200))
    }

    pub fn with_default(default_reply: Reply) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            rules: Arc::new(Mutex::new(Vec::new())),
            default_reply,
        }
    }

    /// Answer requests whose URL contains `needle` with `reply`
    pub fn reply_for(&self, needle: &str, reply: Reply) {
        self.rules.lock().unwrap().push((needle.to_string(), reply));
    }

    pub fn requests(&self) -> Vec<UpdateRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Transport for RecordingTransport {
    async fn get(&self, request: &UpdateRequest) -> std::result::Result<u16, TransportError> {
        self.requests.lock().unwrap().push(request.clone());

        let reply = self
            .rules
            .lock()
            .unwrap()
            .iter()
            .find(|(needle, _)| request.url.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.default_reply.clone());

        match reply {
            Reply::Status(status) => Ok(status),
            Reply::OpenError(code) => Err(TransportError::Open(code.to_string())),
            Reply::BeginError(code) => Err(TransportError::Begin(code.to_string())),
        }
    }
}

/// An event log kept in memory, shareable with the test body
#[derive(Clone, Default)]
pub struct MemoryEventLog {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl EventLog for MemoryEventLog {
    fn append(&self, line: &str) -> io::Result<()> {
        self.lines.lock().unwrap().push(line.to_string());
        Ok(())
    }
}

/// A clock frozen at 2025-01-09 12:00:00 UTC
pub struct FixedClock;

pub const FIXED_TIMESTAMP: &str = "2025-01-09 12:00:00";

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 9, 12, 0, 0).unwrap()
    }
}

/// A console driven by a script of key sets and prompt answers
///
/// - Each `poll_keys` pops one scripted key set (empty once exhausted)
/// - Each `prompt` pops one scripted answer (`None` once exhausted)
/// - `should_continue` turns false after `host_budget` calls, if set
#[derive(Default)]
pub struct ScriptedConsole {
    keys: VecDeque<KeySet>,
    answers: VecDeque<Option<String>>,
    host_budget: Option<usize>,
    host_calls: AtomicUsize,
    pub polls: usize,
    pub prompts: Vec<(String, String)>,
    pub screen: Vec<String>,
    pub printed: Vec<String>,
    pub clears: usize,
}

impl ScriptedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one poll result
    pub fn press(mut self, keys: impl Into<KeySet>) -> Self {
        self.keys.push_back(keys.into());
        self
    }

    /// Queue `count` empty polls
    pub fn idle(mut self, count: usize) -> Self {
        for _ in 0..count {
            self.keys.push_back(KeySet::empty());
        }
        self
    }

    /// Queue a confirmed prompt answer
    pub fn answer(mut self, value: &str) -> Self {
        self.answers.push_back(Some(value.to_string()));
        self
    }

    /// Queue a cancelled prompt
    pub fn cancel_prompt(mut self) -> Self {
        self.answers.push_back(None);
        self
    }

    /// Host stops after `calls` checks
    pub fn host_stops_after(mut self, calls: usize) -> Self {
        self.host_budget = Some(calls);
        self
    }

    pub fn pending_keys(&self) -> usize {
        self.keys.len()
    }
}

impl Display for ScriptedConsole {
    fn clear(&mut self) -> Result<()> {
        self.clears += 1;
        self.screen.clear();
        Ok(())
    }

    fn print_line(&mut self, line: &str) -> Result<()> {
        self.screen.push(line.to_string());
        self.printed.push(line.to_string());
        Ok(())
    }
}

impl KeySource for ScriptedConsole {
    fn poll_keys(&mut self) -> KeySet {
        self.polls += 1;
        self.keys.pop_front().unwrap_or_default()
    }
}

impl TextInput for ScriptedConsole {
    fn prompt(&mut self, hint: &str, initial: &str) -> Option<String> {
        self.prompts.push((hint.to_string(), initial.to_string()));
        self.answers.pop_front().flatten()
    }
}

impl HostControl for ScriptedConsole {
    fn should_continue(&self) -> bool {
        let calls = self.host_calls.fetch_add(1, Ordering::SeqCst);
        self.host_budget.is_none_or(|budget| calls < budget)
    }
}

/// Build an engine over shared test doubles
pub fn test_engine(transport: &RecordingTransport, log: &MemoryEventLog) -> UpdateEngine {
    UpdateEngine::new(
        Box::new(transport.clone()),
        Box::new(FixedClock),
        Box::new(log.clone()),
    )
}

/// Write `content` to `config.txt` under `dir` and return its store
pub fn store_with(dir: &Path, content: &str) -> ConfigStore {
    let path = dir.join("config.txt");
    std::fs::write(&path, content).expect("write config");
    ConfigStore::new(path)
}
