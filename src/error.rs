//! Error types for duration entry and countdown configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by the digit buffer and the countdown engine.
///
/// All of them are recoverable. Misuse of the control lifecycle (pausing an
/// idle timer and so on) is not an error; it is logged and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimerError {
    /// Zero duration, or minutes/seconds fields of 60 or more
    #[error("invalid duration")]
    InvalidDuration,

    #[error("duration of {requested_ms}ms exceeds the maximum of {max_ms}ms")]
    DurationOverflow { requested_ms: u64, max_ms: u64 },

    #[error("invalid digit: {0}")]
    InvalidDigit(u8),
}

impl TimerError {
    /// The observer-facing reason for this error, if it is a rejection of a duration
    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            TimerError::InvalidDuration => Some(RejectReason::InvalidDuration),
            TimerError::DurationOverflow { .. } => Some(RejectReason::DurationOverflow),
            TimerError::InvalidDigit(_) => None,
        }
    }
}

/// Why a configure/confirm attempt was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    InvalidDuration,
    DurationOverflow,
}

pub type Result<T> = std::result::Result<T, TimerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_reason_mapping() {
        assert_eq!(
            TimerError::InvalidDuration.reject_reason(),
            Some(RejectReason::InvalidDuration)
        );
        assert_eq!(
            TimerError::DurationOverflow { requested_ms: 1, max_ms: 0 }.reject_reason(),
            Some(RejectReason::DurationOverflow)
        );
        assert_eq!(TimerError::InvalidDigit(12).reject_reason(), None);
    }

    #[test]
    fn test_overflow_message() {
        let err = TimerError::DurationOverflow { requested_ms: 362_439_000, max_ms: 359_999_000 };
        assert_eq!(
            err.to_string(),
            "duration of 362439000ms exceeds the maximum of 359999000ms"
        );
    }
}
