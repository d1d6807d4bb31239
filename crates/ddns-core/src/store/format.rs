//! Line format of the configuration file
//!
//! ```text
//! # comment
//! interval,<seconds>
//! <provider>,<domain>[,<secret>[,<user>[,<pass>]]]
//! ```
//!
//! Parsing is lenient: malformed rows are skipped with a warning, never
//! rejected, so a hand-edited file always loads.

use crate::config::{DdnsConfig, Entry, Field};

/// Keyword of the polling interval directive
pub const INTERVAL_KEYWORD: &str = "interval";

/// Parse configuration text
pub fn parse(text: &str) -> DdnsConfig {
    let mut config = DdnsConfig::new();
    let mut ignored = 0usize;

    for (number, raw) in text.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut columns = line.split(',');
        let first = columns.next().unwrap_or_default();

        if first == INTERVAL_KEYWORD {
            let value = columns.next().unwrap_or_default();
            match value.parse::<u64>() {
                Ok(secs) if secs > 0 => config.interval_secs = secs,
                _ => tracing::warn!(
                    "Line {}: ignoring invalid interval '{}', keeping {}s",
                    number + 1,
                    value,
                    config.interval_secs
                ),
            }
            continue;
        }

        let mut entry = Entry::default();
        entry.set(Field::Provider, first);
        for (field, value) in Field::ALL[1..].iter().zip(columns) {
            entry.set(*field, value);
        }

        if !entry.is_complete() {
            tracing::warn!("Line {}: missing provider or domain, skipped", number + 1);
            continue;
        }

        if config.entries.push(entry).is_err() {
            ignored += 1;
        }
    }

    if ignored > 0 {
        tracing::warn!(
            "Entry table full, ignored {} additional entr{}",
            ignored,
            if ignored == 1 { "y" } else { "ies" }
        );
    }

    config
}

/// Render configuration text
///
/// The interval directive comes first, then one line per entry with all
/// five columns, empty ones included.
pub fn render(config: &DdnsConfig) -> String {
    let mut out = format!("{},{}\n", INTERVAL_KEYWORD, config.interval_secs);
    for entry in &config.entries {
        let columns: Vec<&str> = Field::ALL.iter().map(|field| entry.get(*field)).collect();
        out.push_str(&columns.join(","));
        out.push('\n');
    }
    out
}
