//! Duration to HH:MM:SS display formatting

use serde::{Deserialize, Serialize};

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// A duration split into clock fields plus its two display strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedTime {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub millis: u64,
    /// `HH:MM:SS`
    pub compact: String,
    /// `HH:MM:SS.mmm`
    pub with_millis: String,
}

/// Format a millisecond count for display.
///
/// Hours are padded to two digits but never truncated, so a stopwatch left
/// running past 99 hours shows `100:00:00`.
///
/// ```
/// use dual_timer::format::format_ms;
///
/// let t = format_ms(5_025_678);
/// assert_eq!(t.compact, "01:23:45");
/// assert_eq!(t.with_millis, "01:23:45.678");
/// ```
pub fn format_ms(ms: u64) -> FormattedTime {
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = ms % MS_PER_SECOND;

    let compact = format!("{:02}:{:02}:{:02}", hours, minutes, seconds);
    let with_millis = format!("{}.{:03}", compact, millis);

    FormattedTime { hours, minutes, seconds, millis, compact, with_millis }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_zero() {
        let t = format_ms(0);
        assert_eq!(t.compact, "00:00:00");
        assert_eq!(t.with_millis, "00:00:00.000");
    }

    #[test]
    fn test_format_fields() {
        let t = format_ms(3_661_001);
        assert_eq!((t.hours, t.minutes, t.seconds, t.millis), (1, 1, 1, 1));
        assert_eq!(t.with_millis, "01:01:01.001");
    }

    #[test]
    fn test_format_max_countdown() {
        assert_eq!(format_ms(359_999_000).compact, "99:59:59");
    }

    #[test]
    fn test_format_hours_roll_past_two_digits() {
        let t = format_ms(100 * MS_PER_HOUR + 999);
        assert_eq!(t.compact, "100:00:00");
        assert_eq!(t.with_millis, "100:00:00.999");
    }
}
