//! Dual Timer - terminal stopwatch and countdown
//!
//! This is the main entry point for the dual-timer application.

use std::sync::Arc;

use tokio::io::{stdin, BufReader};
use tracing::{info, warn};

use dual_timer::{
    clock::SystemClock,
    config::Config,
    observer::ChannelObserver,
    state::{Countdown, Mode, Stopwatch, Timer},
    tasks::{input_task, render_task, KeypadCommand, TimerDriver, TokioScheduler},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so stdout only carries the display
    tracing_subscriber::fmt()
        .with_env_filter(format!("dual_timer={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting dual-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: mode={:?}, tick={}ms", config.mode, config.tick_ms);

    let observer = Arc::new(ChannelObserver::new(256));
    let render = tokio::spawn(render_task(observer.subscribe(), config.json));

    let clock = Arc::new(SystemClock);
    let timer = match config.mode {
        Mode::Stopwatch => Timer::from(Stopwatch::new(clock, observer.clone())),
        Mode::Countdown => Timer::from(Countdown::new(clock, observer.clone())),
    };

    let driver = Arc::new(TimerDriver::new(
        timer,
        Arc::new(TokioScheduler::current()),
        config.tick_period(),
    ));

    if let Some(digits) = &config.digits {
        if config.mode != Mode::Countdown {
            warn!("--digits only applies to countdown mode");
        } else {
            let preset = KeypadCommand::parse_digits(digits).map_err(anyhow::Error::msg)?;
            let preset = KeypadCommand::Digits(preset);
            for command in [preset, KeypadCommand::Set, KeypadCommand::Start] {
                let _ = command.apply(&driver);
            }
        }
    }

    info!("Commands: start, pause, resume, reset, clear, set, back, <digits>, quit");

    let mut exit_code = 0;

    tokio::select! {
        result = input_task(Arc::clone(&driver), BufReader::new(stdin())) => {
            if let Err(e) = result {
                tracing::error!("Input error: {}", e);
                exit_code = 1;
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Dropping the driver cancels its ticks; dropping the last observer closes the channel
    drop(driver);
    drop(observer);
    if let Err(e) = render.await {
        warn!("Render task ended abnormally: {}", e);
    }

    info!("Shutdown complete");

    // A pending blocking stdin read would otherwise keep the runtime alive
    std::process::exit(exit_code)
}
