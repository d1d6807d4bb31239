// # ddns-core
//
// Core library for the polling dynamic-DNS update agent.
//
// ## Architecture Overview
//
// This library provides everything except the concrete terminal and HTTP
// stack:
// - **ProviderRegistry**: Closed table of supported update services
// - **ConfigStore**: Flat configuration file (load / atomic save)
// - **UpdateEngine**: One GET per entry per cycle, outcome logging
// - **Editor**: Interactive add / edit / delete / interval state machine
// - **Scheduler**: Main loop interleaving cycles with signal polling
// - **Startup**: Fatal startup errors logged, shown and acknowledged
// - **Traits**: Transport, Clock, EventLog and Console collaborators
//
// ## Design Principles
//
// 1. **Single thread of control**: Cycles, waits and editing never overlap
// 2. **Owned state**: The scheduler owns the configuration and lends it out
// 3. **Bounded**: At most `MAX_ENTRIES` entries, bounded field lengths
// 4. **Never fatal per entry**: Entry failures are logged and retried next cycle
// 5. **Library-First**: The binary only wires collaborators together

pub mod traits;
pub mod config;
pub mod registry;
pub mod store;
pub mod engine;
pub mod editor;
pub mod scheduler;
pub mod startup;
pub mod error;

// Re-export core types for convenience
pub use traits::{Clock, Console, EventLog, SystemClock, Transport};
pub use config::{DdnsConfig, Entry, EntryTable, Field, MAX_ENTRIES};
pub use registry::{ProviderDescriptor, ProviderKind};
pub use store::{ConfigStore, FileEventLog};
pub use engine::{UpdateEngine, UpdateOutcome};
pub use editor::Editor;
pub use scheduler::{Scheduler, StopReason};
pub use startup::{FatalReport, report_fatal};
pub use error::{Error, Result};
