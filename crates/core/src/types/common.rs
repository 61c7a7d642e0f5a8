//! Common types and utilities shared across domain models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp in milliseconds since Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp for the current moment
    ///
    /// If system time is somehow before UNIX_EPOCH, falls back to timestamp 0
    /// instead of panicking.
    pub fn now() -> Self {
        Self(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_else(|_| std::time::Duration::from_secs(0))
                .as_millis() as i64,
        )
    }

    /// Creates a timestamp from milliseconds since Unix epoch
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as milliseconds since Unix epoch
    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// Returns the timestamp as seconds since Unix epoch
    pub fn as_seconds(&self) -> i64 {
        self.0 / 1000
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Formats a number of seconds as `M:SS`
///
/// Minutes are not padded and are not folded into hours, so an hour reads
/// `60:00`. Fractional seconds are truncated. Negative or non-finite input
/// (a transport that has not reported metadata yet) renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };

    format!("{}:{:02}", total / 60, total % 60)
}

/// Trait for types that can validate themselves
pub trait Validator {
    /// Validates the instance and returns errors if invalid
    fn validate(&self) -> Result<(), Vec<String>>;

    /// Returns true if the instance is valid
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_now() {
        let t1 = Timestamp::now();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let t2 = Timestamp::now();
        assert!(t2 > t1);
    }

    #[test]
    fn test_timestamp_from_millis() {
        let t = Timestamp::from_millis(1234567890123);
        assert_eq!(t.as_millis(), 1234567890123);
        assert_eq!(t.as_seconds(), 1234567890);
    }

    #[test]
    fn test_timestamp_display() {
        let t = Timestamp::from_millis(1234567890123);
        assert_eq!(t.to_string(), "1234567890123");
    }

    #[test]
    fn test_format_time_minutes_and_seconds() {
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(5.0), "0:05");
        assert_eq!(format_time(0.0), "0:00");
    }

    #[test]
    fn test_format_time_does_not_roll_into_hours() {
        assert_eq!(format_time(3600.0), "60:00");
        assert_eq!(format_time(3725.0), "62:05");
    }

    #[test]
    fn test_format_time_truncates_fractions() {
        assert_eq!(format_time(59.999), "0:59");
        assert_eq!(format_time(90.5), "1:30");
    }

    #[test]
    fn test_format_time_degenerate_input() {
        assert_eq!(format_time(-3.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
    }

    #[test]
    fn test_validator_trait() {
        struct TestType {
            value: i32,
        }

        impl Validator for TestType {
            fn validate(&self) -> Result<(), Vec<String>> {
                if self.value < 0 {
                    Err(vec!["Value must be positive".to_string()])
                } else {
                    Ok(())
                }
            }
        }

        assert!(TestType { value: 10 }.is_valid());
        assert!(!TestType { value: -5 }.is_valid());
    }
}
