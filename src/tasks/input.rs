//! Keypad command input read from the terminal

use std::{ops::ControlFlow, str::FromStr, sync::Arc};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use super::TimerDriver;
use crate::state::{Countdown, Timer};

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeypadCommand {
    Start,
    Pause,
    Resume,
    Reset,
    Clear,
    /// Confirm the typed countdown duration
    Set,
    Backspace,
    Digits(Vec<u8>),
    Quit,
}

impl FromStr for KeypadCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(KeypadCommand::Digits(line.bytes().map(|b| b - b'0').collect()));
        }

        match line.to_ascii_lowercase().as_str() {
            "start" | "s" => Ok(KeypadCommand::Start),
            "pause" | "p" => Ok(KeypadCommand::Pause),
            "resume" | "continue" | "r" => Ok(KeypadCommand::Resume),
            "reset" => Ok(KeypadCommand::Reset),
            "clear" | "c" => Ok(KeypadCommand::Clear),
            "set" => Ok(KeypadCommand::Set),
            "back" | "b" => Ok(KeypadCommand::Backspace),
            "quit" | "q" | "exit" => Ok(KeypadCommand::Quit),
            other => Err(format!("Unknown command: {}", other)),
        }
    }
}

impl KeypadCommand {
    /// Parse a line that must be a run of digits, for presetting the keypad
    pub fn parse_digits(line: &str) -> Result<Vec<u8>, String> {
        match line.parse::<KeypadCommand>() {
            Ok(KeypadCommand::Digits(digits)) => Ok(digits),
            _ => Err(format!("Expected digits only, got: {}", line.trim())),
        }
    }

    /// Apply this command to the driven timer. Returns `Break` on quit.
    pub fn apply(&self, driver: &TimerDriver<Timer>) -> ControlFlow<()> {
        match self {
            KeypadCommand::Start => driver.start(),
            KeypadCommand::Pause => driver.pause(),
            KeypadCommand::Resume => driver.resume(),
            KeypadCommand::Reset | KeypadCommand::Clear => driver.reset(),
            KeypadCommand::Set => with_countdown(driver, |cd| {
                if let Err(e) = cd.confirm_entry() {
                    debug!("Set rejected: {}", e);
                }
            }),
            KeypadCommand::Backspace => with_countdown(driver, |cd| cd.backspace()),
            KeypadCommand::Digits(digits) => with_countdown(driver, |cd| {
                for &digit in digits {
                    if let Err(e) = cd.press_digit(digit) {
                        warn!("{}", e);
                    }
                }
            }),
            KeypadCommand::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }
}

fn with_countdown(driver: &TimerDriver<Timer>, op: impl FnOnce(&mut Countdown)) {
    driver.with_engine(|timer| match timer.as_countdown_mut() {
        Some(countdown) => op(countdown),
        None => warn!("Keypad entry is only available in countdown mode"),
    })
}

/// Read commands line by line until quit or end of input
pub async fn input_task<R>(driver: Arc<TimerDriver<Timer>>, reader: R) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    info!("Starting input task");

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<KeypadCommand>() {
            Ok(command) => {
                if command.apply(&driver).is_break() {
                    break;
                }
            }
            Err(e) => warn!("{}", e),
        }
    }

    info!("Input finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        clock::ManualClock,
        state::{Stopwatch, TimerState},
        testing::{ManualScheduler, RecordingObserver},
    };

    fn countdown_driver() -> (TimerDriver<Timer>, Arc<RecordingObserver>) {
        let observer = Arc::new(RecordingObserver::new());
        let countdown = Countdown::new(Arc::new(ManualClock::new(0)), observer.clone());
        let driver = TimerDriver::new(
            Timer::from(countdown),
            Arc::new(ManualScheduler::new()),
            Duration::from_millis(50),
        );
        (driver, observer)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("0130".parse::<KeypadCommand>(), Ok(KeypadCommand::Digits(vec![0, 1, 3, 0])));
        assert_eq!(" Pause ".parse::<KeypadCommand>(), Ok(KeypadCommand::Pause));
        assert_eq!("continue".parse::<KeypadCommand>(), Ok(KeypadCommand::Resume));
        assert!("1a".parse::<KeypadCommand>().is_err());
    }

    #[test]
    fn test_parse_digits_rejects_other_commands() {
        assert_eq!(KeypadCommand::parse_digits(" 0130 "), Ok(vec![0, 1, 3, 0]));
        assert!(KeypadCommand::parse_digits("start").is_err());
        assert!(KeypadCommand::parse_digits("quit").is_err());
        assert!(KeypadCommand::parse_digits("").is_err());
    }

    #[test]
    fn test_keypad_flow_configures_and_starts() {
        let (driver, _) = countdown_driver();

        for command in [
            KeypadCommand::Digits(vec![1, 3, 0]),
            KeypadCommand::Set,
            KeypadCommand::Start,
        ] {
            assert!(command.apply(&driver).is_continue());
        }

        assert_eq!(driver.state(), TimerState::Running);
        assert_eq!(driver.display().compact, "00:01:30");
        assert!(driver.is_ticking());
    }

    #[test]
    fn test_keypad_ignored_for_stopwatch() {
        let stopwatch =
            Stopwatch::new(Arc::new(ManualClock::new(0)), Arc::new(RecordingObserver::new()));
        let driver = TimerDriver::new(
            Timer::from(stopwatch),
            Arc::new(ManualScheduler::new()),
            Duration::from_millis(50),
        );
        let _ = KeypadCommand::Digits(vec![5]).apply(&driver);
        let _ = KeypadCommand::Set.apply(&driver);
        assert_eq!(driver.state(), TimerState::Idle);
    }

    #[tokio::test]
    async fn test_input_task_stops_on_quit() {
        let (driver, observer) = countdown_driver();
        let input: &[u8] = b"9\nbogus\nset\n\nquit\nstart\n";

        input_task(Arc::new(driver), input).await.unwrap();

        assert_eq!(observer.state_changes(), vec![TimerState::Idle]);
    }
}
