//! Keypad entry buffer for countdown durations
//!
//! Digits shift in from the right like a microwave keypad: the newest digit
//! is the ones place of the seconds field and older digits move left through
//! minutes and hours. At most six digits are kept; a seventh push drops the
//! oldest.

use crate::error::{Result, TimerError};

/// Number of digits held by the buffer (HHMMSS)
pub const MAX_DIGITS: usize = 6;

/// Longest countdown that can be entered, 99:59:59
pub const MAX_DURATION_MS: u64 = (99 * 3600 + 59 * 60 + 59) * 1000;

/// Shifting HHMMSS digit register
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitBuffer {
    digits: Vec<u8>,
    ceiling_ms: Option<u64>,
}

impl DigitBuffer {
    /// Create an empty buffer capped at 99:59:59
    pub fn new() -> Self {
        Self::with_ceiling(Some(MAX_DURATION_MS))
    }

    /// Create an empty buffer with a custom ceiling, or none at all
    pub fn with_ceiling(ceiling_ms: Option<u64>) -> Self {
        Self { digits: Vec::with_capacity(MAX_DIGITS), ceiling_ms }
    }

    pub fn ceiling_ms(&self) -> Option<u64> {
        self.ceiling_ms
    }

    /// Shift in a digit, dropping the oldest one if the buffer is full
    pub fn press_digit(&mut self, digit: u8) -> Result<()> {
        if digit > 9 {
            return Err(TimerError::InvalidDigit(digit));
        }
        if self.digits.len() == MAX_DIGITS {
            self.digits.remove(0);
        }
        self.digits.push(digit);
        Ok(())
    }

    /// Remove the most recently entered digit
    pub fn backspace(&mut self) -> Option<u8> {
        self.digits.pop()
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    /// Buffered digits, oldest first
    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    /// The buffer left-padded with zeros and split into (HH, MM, SS)
    pub fn fields(&self) -> (u64, u64, u64) {
        let mut padded = [0u8; MAX_DIGITS];
        padded[MAX_DIGITS - self.digits.len()..].copy_from_slice(&self.digits);

        let pair = |i: usize| u64::from(padded[i]) * 10 + u64::from(padded[i + 1]);
        (pair(0), pair(2), pair(4))
    }

    /// Raw HHMMSS arithmetic, with no check on the field ranges.
    ///
    /// `00:00:67` yields 67 seconds here; validation happens in [`confirm`].
    ///
    /// [`confirm`]: DigitBuffer::confirm
    pub fn current_duration(&self) -> u64 {
        let (hours, minutes, seconds) = self.fields();
        (hours * 3600 + minutes * 60 + seconds) * 1000
    }

    /// Validate the buffered entry and return it as milliseconds.
    ///
    /// Exceeding the ceiling is a `DurationOverflow` and empties the buffer so
    /// the user starts over. Zero, or minutes/seconds of 60 or more, is an
    /// `InvalidDuration` and leaves the buffer as is for correction. The
    /// buffer is not cleared on success; the caller decides when.
    pub fn confirm(&mut self) -> Result<u64> {
        let duration = self.current_duration();

        if let Some(max_ms) = self.ceiling_ms {
            if duration > max_ms {
                self.clear();
                return Err(TimerError::DurationOverflow { requested_ms: duration, max_ms });
            }
        }

        let (_, minutes, seconds) = self.fields();
        if minutes >= 60 || seconds >= 60 || duration == 0 {
            return Err(TimerError::InvalidDuration);
        }

        Ok(duration)
    }
}

impl Default for DigitBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_ms;

    fn press_all(buffer: &mut DigitBuffer, digits: &[u8]) -> Vec<String> {
        digits
            .iter()
            .map(|&d| {
                buffer.press_digit(d).unwrap();
                format_ms(buffer.current_duration()).compact
            })
            .collect()
    }

    #[test]
    fn test_digits_shift_in_from_the_right() {
        let mut buffer = DigitBuffer::new();
        let shown = press_all(&mut buffer, &[1, 2, 3, 4, 5]);
        assert_eq!(shown, vec!["00:00:01", "00:00:12", "00:01:23", "00:12:34", "01:23:45"]);
    }

    #[test]
    fn test_seventh_digit_drops_the_oldest() {
        let mut buffer = DigitBuffer::new();
        press_all(&mut buffer, &[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(buffer.digits(), &[2, 3, 4, 5, 6, 7]);
        assert_eq!(buffer.fields(), (23, 45, 67));
        assert_eq!(buffer.current_duration(), (23 * 3600 + 45 * 60 + 67) * 1000);
    }

    #[test]
    fn test_invalid_digit_rejected() {
        let mut buffer = DigitBuffer::new();
        assert_eq!(buffer.press_digit(10), Err(TimerError::InvalidDigit(10)));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_backspace_removes_newest() {
        let mut buffer = DigitBuffer::new();
        press_all(&mut buffer, &[1, 3, 0]);
        assert_eq!(buffer.backspace(), Some(0));
        assert_eq!(buffer.current_duration(), 13_000);

        buffer.clear();
        assert_eq!(buffer.backspace(), None);
    }

    #[test]
    fn test_confirm_zero_is_invalid_and_keeps_buffer() {
        let mut buffer = DigitBuffer::new();
        press_all(&mut buffer, &[0, 0]);
        assert_eq!(buffer.confirm(), Err(TimerError::InvalidDuration));
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_confirm_seconds_over_59_is_invalid() {
        let mut buffer = DigitBuffer::new();
        press_all(&mut buffer, &[6, 7]);
        assert_eq!(buffer.confirm(), Err(TimerError::InvalidDuration));
        assert_eq!(buffer.digits(), &[6, 7]);
    }

    #[test]
    fn test_confirm_minutes_over_59_is_invalid() {
        let mut buffer = DigitBuffer::new();
        press_all(&mut buffer, &[7, 0, 0, 0]);
        assert_eq!(buffer.confirm(), Err(TimerError::InvalidDuration));
    }

    #[test]
    fn test_confirm_at_maximum() {
        let mut buffer = DigitBuffer::new();
        press_all(&mut buffer, &[9, 9, 5, 9, 5, 9]);
        assert_eq!(buffer.confirm(), Ok(MAX_DURATION_MS));
        assert_eq!(buffer.len(), 6);
    }

    #[test]
    fn test_confirm_overflow_resets_buffer() {
        let mut buffer = DigitBuffer::new();
        press_all(&mut buffer, &[9, 9, 9, 9, 9, 9]);
        assert_eq!(
            buffer.confirm(),
            Err(TimerError::DurationOverflow {
                requested_ms: 362_439_000,
                max_ms: MAX_DURATION_MS
            })
        );
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_custom_ceiling() {
        let mut buffer = DigitBuffer::with_ceiling(Some(60_000));
        press_all(&mut buffer, &[1, 0, 1]);
        assert!(matches!(buffer.confirm(), Err(TimerError::DurationOverflow { .. })));

        let mut unbounded = DigitBuffer::with_ceiling(None);
        press_all(&mut unbounded, &[9, 9, 5, 9, 5, 9]);
        assert_eq!(unbounded.confirm(), Ok(MAX_DURATION_MS));
    }
}
