//! Configuration types for the DDNS agent
//!
//! This module defines the in-memory configuration state: the bounded,
//! ordered [`EntryTable`] and the polling interval, bundled as [`DdnsConfig`].
//!
//! ## Field capacity
//!
//! Every [`Entry`] field has a fixed byte capacity. Values are normalized
//! once, at assignment time, by [`Field::normalize`]:
//!
//! 1. `,`, `\r` and `\n` are removed (they would break the line format)
//! 2. the remainder is truncated to the field capacity, rounding down to a
//!    UTF-8 character boundary
//!
//! The same rule applies whether the value comes from the file, the editor
//! or the update engine, so a save/load round trip is always stable.

use crate::error::{Error, Result};
use std::fmt;

/// Maximum number of entries held by the agent
pub const MAX_ENTRIES: usize = 10;

/// Polling interval used when the file has no `interval` directive
pub const DEFAULT_INTERVAL_SECS: u64 = 300;

const USER_CAPACITY: usize = 63;
const PASS_CAPACITY: usize = 63;

/// Room for a hand-written secret or the padded Base64 of the longest
/// `"<user>:<pass>"` pair, whichever is larger
const SECRET_CAPACITY: usize = larger(127, 4 * (USER_CAPACITY + 1 + PASS_CAPACITY).div_ceil(3));

const fn larger(a: usize, b: usize) -> usize {
    if a > b { a } else { b }
}

/// One editable column of an [`Entry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Provider identifier
    Provider,
    /// Hostname to update
    Domain,
    /// Token or pre-encoded Basic-Auth value
    Secret,
    /// Basic-Auth username
    User,
    /// Basic-Auth password
    Pass,
}

impl Field {
    /// All fields, in file column order
    pub const ALL: [Field; 5] = [
        Field::Provider,
        Field::Domain,
        Field::Secret,
        Field::User,
        Field::Pass,
    ];

    /// Maximum stored length in bytes
    pub const fn capacity(self) -> usize {
        match self {
            Field::Provider => 31,
            Field::Domain => 63,
            Field::Secret => SECRET_CAPACITY,
            Field::User => USER_CAPACITY,
            Field::Pass => PASS_CAPACITY,
        }
    }

    /// Human-readable label, used as the editor prompt hint
    pub const fn label(self) -> &'static str {
        match self {
            Field::Provider => "Provider",
            Field::Domain => "Domain",
            Field::Secret => "Secret",
            Field::User => "User",
            Field::Pass => "Pass",
        }
    }

    /// Whether the value should be masked on screen
    pub const fn is_sensitive(self) -> bool {
        matches!(self, Field::Secret | Field::Pass)
    }

    /// Apply the uniform normalization rule for this field
    pub fn normalize(self, value: &str) -> String {
        let mut out: String = value
            .chars()
            .filter(|c| !matches!(c, ',' | '\r' | '\n'))
            .collect();

        let max = self.capacity();
        if out.len() > max {
            let mut cut = max;
            while !out.is_char_boundary(cut) {
                cut -= 1;
            }
            out.truncate(cut);
        }
        out
    }
}

/// One dynamic-DNS registration
///
/// Fields are private so every write goes through [`Field::normalize`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Entry {
    provider: String,
    domain: String,
    secret: String,
    user: String,
    pass: String,
}

// Custom Debug implementation that hides credentials
impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("provider", &self.provider)
            .field("domain", &self.domain)
            .field("secret", &redact(&self.secret))
            .field("user", &self.user)
            .field("pass", &redact(&self.pass))
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() { "" } else { "<REDACTED>" }
}

impl Entry {
    /// Create an entry with a provider and domain, other fields empty
    pub fn new(provider: &str, domain: &str) -> Self {
        let mut entry = Self::default();
        entry.set(Field::Provider, provider);
        entry.set(Field::Domain, domain);
        entry
    }

    /// Set the secret column
    pub fn with_secret(mut self, secret: &str) -> Self {
        self.set(Field::Secret, secret);
        self
    }

    /// Set the user and pass columns
    pub fn with_credentials(mut self, user: &str, pass: &str) -> Self {
        self.set(Field::User, user);
        self.set(Field::Pass, pass);
        self
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn pass(&self) -> &str {
        &self.pass
    }

    /// Read a field by column
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Provider => &self.provider,
            Field::Domain => &self.domain,
            Field::Secret => &self.secret,
            Field::User => &self.user,
            Field::Pass => &self.pass,
        }
    }

    /// Write a field by column, applying the normalization rule
    pub fn set(&mut self, field: Field, value: &str) {
        let value = field.normalize(value);
        let slot = match field {
            Field::Provider => &mut self.provider,
            Field::Domain => &mut self.domain,
            Field::Secret => &mut self.secret,
            Field::User => &mut self.user,
            Field::Pass => &mut self.pass,
        };
        *slot = value;
    }

    /// An entry is kept only when provider and domain are both present
    pub fn is_complete(&self) -> bool {
        !self.provider.is_empty() && !self.domain.is_empty()
    }
}

/// Bounded, ordered entry container
///
/// Holds at most [`MAX_ENTRIES`] entries in insertion order. Every insertion
/// point goes through [`EntryTable::push`], which enforces the bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryTable {
    entries: Vec<Entry>,
}

impl EntryTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(MAX_ENTRIES),
        }
    }

    /// Append an entry, failing if the table is full
    pub fn push(&mut self, entry: Entry) -> Result<()> {
        if self.is_full() {
            return Err(Error::CapacityExceeded(MAX_ENTRIES));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Remove the entry at `index`, shifting later entries down
    pub fn remove(&mut self, index: usize) -> Option<Entry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    /// Replace the entry at `index` in place
    pub fn replace(&mut self, index: usize, entry: Entry) -> Result<()> {
        let slot = self
            .entries
            .get_mut(index)
            .ok_or_else(|| Error::invalid_input(format!("No entry at index {}", index)))?;
        *slot = entry;
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_ENTRIES
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entry> {
        self.entries.iter_mut()
    }
}

impl<'a> IntoIterator for &'a EntryTable {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Process-wide configuration state
///
/// Created once from the configuration file, then owned by the scheduler and
/// lent to the engine and editor for the duration of each call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdnsConfig {
    /// Polling interval in seconds (always > 0)
    pub interval_secs: u64,

    /// Configured entries, in file order
    pub entries: EntryTable,
}

impl DdnsConfig {
    /// Create an empty configuration with the default interval
    pub fn new() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            entries: EntryTable::new(),
        }
    }

    /// Set the polling interval, rejecting zero
    pub fn set_interval(&mut self, secs: u64) -> Result<()> {
        if secs == 0 {
            return Err(Error::invalid_input("Interval must be > 0"));
        }
        self.interval_secs = secs;
        Ok(())
    }
}

impl Default for DdnsConfig {
    fn default() -> Self {
        Self::new()
    }
}
