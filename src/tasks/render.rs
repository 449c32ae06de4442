//! Terminal display task

use tokio::{
    io::{stdout, AsyncWriteExt},
    sync::broadcast::{error::RecvError, Receiver},
};
use tracing::{debug, error, info};

use crate::{error::RejectReason, observer::TimerEvent};

/// Render a single event as terminal output.
///
/// Ticks and entry updates rewrite the current line; everything else ends
/// up on a line of its own.
pub fn render_event(event: &TimerEvent, json: bool) -> String {
    if json {
        return match serde_json::to_string(event) {
            Ok(line) => format!("{}\n", line),
            Err(e) => {
                error!("Failed to serialize timer event: {}", e);
                String::new()
            }
        };
    }

    match event {
        TimerEvent::Tick { time } => format!("\r{}", time.with_millis),
        TimerEvent::EntryChanged { entry } => format!("\r{}", entry.compact),
        TimerEvent::StateChanged { state } => format!("\n[{}]\n", state),
        TimerEvent::Expired => "\n\x07Time's up!\n".to_string(),
        TimerEvent::Rejected { reason: RejectReason::InvalidDuration } => {
            "\nPlease enter a valid time\n".to_string()
        }
        TimerEvent::Rejected { reason: RejectReason::DurationOverflow } => {
            "\nMaximum time is 99:59:59, entry cleared\n".to_string()
        }
        TimerEvent::EntryRequested => "Enter a duration with digits, then `set`\n".to_string(),
    }
}

/// Print timer events until the channel closes
pub async fn render_task(mut events: Receiver<TimerEvent>, json: bool) {
    info!("Starting render task");

    let mut out = stdout();

    loop {
        match events.recv().await {
            Ok(event) => {
                let text = render_event(&event, json);
                if let Err(e) = out.write_all(text.as_bytes()).await {
                    error!("Failed to write to stdout: {}", e);
                    break;
                }
                if let Err(e) = out.flush().await {
                    error!("Failed to flush stdout: {}", e);
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                debug!("Render task lagged, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }

    debug!("Render task finished");
}
