//! Contract Test: Scheduler Signal Handling
//!
//! Constraints verified:
//! - The exit signal is honored within one tick, even mid-interval
//! - A host shutdown stops the loop without another cycle
//! - Cycles repeat once per interval
//! - The editor opens during the wait and never overlaps a cycle
//!
//! Time is paused, so every sleep completes instantly and deterministically.
//!
//! If this test fails, the agent ignores input during long waits.

mod common;

use common::*;
use ddns_core::scheduler::wait_for_confirm;
use ddns_core::traits::Key;
use ddns_core::{Scheduler, StopReason};
use tempfile::tempdir;
use tokio::time::Instant;

fn scheduler(store: ddns_core::ConfigStore, transport: &RecordingTransport) -> Scheduler {
    let log = MemoryEventLog::new();
    let config = parse_store(&store);
    Scheduler::new(test_engine(transport, &log), store, config).with_tick(TEST_TICK)
}

fn parse_store(store: &ddns_core::ConfigStore) -> ddns_core::DdnsConfig {
    let text = std::fs::read_to_string(store.path()).unwrap();
    ddns_core::store::format::parse(&text)
}

#[tokio::test(start_paused = true)]
async fn exit_before_first_cycle_sends_nothing() {
    let dir = tempdir().unwrap();
    let transport = RecordingTransport::new();
    let mut scheduler = scheduler(store_with(dir.path(), "duckdns,a.example.com,t\n"), &transport);
    let mut console = ScriptedConsole::new().press(Key::Exit);

    let reason = scheduler.run(&mut console).await.unwrap();

    assert_eq!(reason, StopReason::ExitRequested);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn exit_is_honored_within_one_tick() {
    let dir = tempdir().unwrap();
    let transport = RecordingTransport::new();
    let mut scheduler = scheduler(
        store_with(dir.path(), "interval,300\nduckdns,a.example.com,t\n"),
        &transport,
    );
    // Top-of-loop poll, four quiet ticks, exit on the fifth
    let mut console = ScriptedConsole::new().idle(1).idle(4).press(Key::Exit);

    let started = Instant::now();
    let reason = scheduler.run(&mut console).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(reason, StopReason::ExitRequested);
    assert_eq!(transport.request_count(), 1);
    assert!(elapsed >= TEST_TICK * 5, "elapsed {:?}", elapsed);
    assert!(elapsed < TEST_TICK * 6, "elapsed {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn host_shutdown_stops_the_loop() {
    let dir = tempdir().unwrap();
    let transport = RecordingTransport::new();
    let mut scheduler = scheduler(store_with(dir.path(), "duckdns,a.example.com,t\n"), &transport);
    let mut console = ScriptedConsole::new().host_stops_after(3);

    let reason = scheduler.run(&mut console).await.unwrap();

    assert_eq!(reason, StopReason::HostShutdown);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn cycles_repeat_every_interval() {
    let dir = tempdir().unwrap();
    let transport = RecordingTransport::new();
    let mut scheduler = scheduler(
        store_with(dir.path(), "interval,1\nduckdns,a.example.com,t\nnoip,b.example.org,,u,p\n"),
        &transport,
    );
    // Each cycle costs one top-of-loop check plus ten one-tick waits
    let mut console = ScriptedConsole::new().host_stops_after(25);

    let started = Instant::now();
    let reason = scheduler.run(&mut console).await.unwrap();

    assert_eq!(reason, StopReason::HostShutdown);
    assert_eq!(transport.request_count(), 6, "three cycles of two entries");
    assert!(started.elapsed() >= std::time::Duration::from_secs(2));

    // The derived secret stays in memory across cycles
    let entry = scheduler.config().entries.get(1).unwrap();
    assert_eq!(entry.secret(), "dTpw");
}

#[tokio::test(start_paused = true)]
async fn status_screen_lists_entries() {
    let dir = tempdir().unwrap();
    let transport = RecordingTransport::new();
    let mut scheduler = scheduler(
        store_with(dir.path(), "interval,60\nduckdns,a.example.com,t\n"),
        &transport,
    )
    .with_key_hint("e: edit  q: quit");
    let mut console = ScriptedConsole::new().press(Key::Exit);

    scheduler.run(&mut console).await.unwrap();

    assert_eq!(
        console.screen,
        [
            "e: edit  q: quit",
            "Parsed 1 DynDNS entries",
            " [0] duckdns,a.example.com",
            "Polling every 60 seconds",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn editor_opens_during_wait_then_status_returns() {
    let dir = tempdir().unwrap();
    let transport = RecordingTransport::new();
    let mut scheduler = scheduler(store_with(dir.path(), "duckdns,a.example.com,t\n"), &transport);
    let mut console = ScriptedConsole::new()
        .idle(1)
        .press(Key::OpenEditor)
        .press(Key::Cancel) // consumed by the editor
        .press(Key::Exit);

    let reason = scheduler.run(&mut console).await.unwrap();

    assert_eq!(reason, StopReason::ExitRequested);
    assert_eq!(transport.request_count(), 1, "no cycle runs while editing");
    assert!(console.printed.iter().any(|l| l == "DDNS entries"));
    assert_eq!(console.screen.last().map(String::as_str), Some("Polling every 300 seconds"));
    assert_eq!(console.pending_keys(), 0);
}

#[tokio::test(start_paused = true)]
async fn interval_edited_mid_wait_takes_effect() {
    let dir = tempdir().unwrap();
    let transport = RecordingTransport::new();
    let store = store_with(dir.path(), "interval,300\nduckdns,a.example.com,t\n");
    let path = store.path().to_path_buf();
    let mut scheduler = scheduler(store, &transport);
    let mut console = ScriptedConsole::new()
        .idle(1)
        .press(Key::OpenEditor)
        .press(Key::Down)
        .press(Key::Down)
        .press(Key::Confirm)
        .answer("1")
        .press(Key::Cancel)
        .host_stops_after(40);

    let reason = scheduler.run(&mut console).await.unwrap();

    assert_eq!(reason, StopReason::HostShutdown);
    assert_eq!(scheduler.config().interval_secs, 1);
    assert!(transport.request_count() >= 2, "new interval applies to the current wait");
    assert!(std::fs::read_to_string(path).unwrap().starts_with("interval,1\n"));
}

#[tokio::test(start_paused = true)]
async fn wait_for_confirm_returns_on_confirm() {
    let mut console = ScriptedConsole::new().idle(3).press(Key::Confirm);

    assert!(wait_for_confirm(&mut console, TEST_TICK).await);
    assert_eq!(console.polls, 4);
}

#[tokio::test(start_paused = true)]
async fn wait_for_confirm_gives_up_when_host_stops() {
    let mut console = ScriptedConsole::new().host_stops_after(2);

    assert!(!wait_for_confirm(&mut console, TEST_TICK).await);
    assert_eq!(console.polls, 2);
}
