//! Wall-clock source
//!
//! Abstracted so log lines and console output can be tested with a fixed time.

use chrono::{DateTime, Utc};

/// Timestamp layout used on the console and in the event log
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source of the current UTC time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current time formatted as `YYYY-MM-DD HH:MM:SS`
    fn timestamp(&self) -> String {
        self.now().format(TIMESTAMP_FORMAT).to_string()
    }
}

/// The system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct Fixed;

    impl Clock for Fixed {
        fn now(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2025, 1, 9, 7, 5, 3).unwrap()
        }
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(Fixed.timestamp(), "2025-01-09 07:05:03");
    }
}
