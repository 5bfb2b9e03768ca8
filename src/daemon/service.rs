//! Daemon bootstrap.
//!
//! Wires the engine to its ports and starts the background tasks:
//! session recorder, event log, IPC server and (optionally) the stdin
//! shortcut reader. Runs until Ctrl-C.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::notification::DesktopNotifier;
use crate::settings::{self, AppPaths};
use crate::sound;
use crate::types::format_clock;

use super::control::{command_for_key, ControlAdapter, InputFocus};
use super::ipc::{serve, IpcServer, RequestHandler};
use super::policy::CompletionPorts;
use super::recorder::{run_recorder, FileSessionRecorder, RECORDER_TIMEOUT};
use super::runner::{TimerHandle, TimerRunner};
use super::timer::{TimerEngine, TimerEvent};

/// Daemon startup options.
#[derive(Debug, Clone)]
pub struct DaemonOptions {
    /// Where settings, sessions and the socket live
    pub paths: AppPaths,
    /// Echo timer events and read shortcuts from stdin
    pub interactive: bool,
}

/// Runs the daemon until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the settings are invalid or the IPC socket cannot
/// be bound.
pub async fn run_daemon(options: DaemonOptions) -> Result<()> {
    let DaemonOptions { paths, interactive } = options;

    let config = settings::load(&paths.settings()).context("Failed to load settings")?;
    info!("Loaded settings from {:?}", paths.settings());

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (session_tx, session_rx) = mpsc::unbounded_channel();

    let mut ports = CompletionPorts::new()
        .with_notifier(Arc::new(DesktopNotifier::detect()))
        .with_sessions(session_tx);
    if let Some(player) = sound::try_create_player() {
        ports = ports.with_sound(Arc::new(player), sound::get_default_sound());
    }

    let recorder = FileSessionRecorder::new(paths.sessions(), paths.task_progress());
    tokio::spawn(run_recorder(recorder, session_rx, RECORDER_TIMEOUT));
    tokio::spawn(log_events(event_rx, interactive));

    let engine = TimerEngine::new(config, ports, event_tx);
    let (runner, handle) = TimerRunner::new(engine, ControlAdapter::new());

    let server = IpcServer::new(&paths.socket())?;
    info!("Listening on {:?}", server.socket_path());
    let handler = RequestHandler::new(handle.clone(), paths.settings());
    tokio::spawn(async move {
        if let Err(e) = serve(server, handler).await {
            error!("IPC server stopped: {:#}", e);
        }
    });

    if interactive {
        println!("Keys: <space> start/pause, r reset, 1 pomodoro, 2 short break, 3 long break");
        tokio::spawn(read_shortcuts(handle));
    } else {
        drop(handle);
    }

    tokio::select! {
        _ = runner.run() => {}
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for Ctrl-C")?;
            info!("Shutting down");
        }
    }

    Ok(())
}

/// Logs timer events; in interactive mode also prints them.
async fn log_events(mut events: mpsc::UnboundedReceiver<TimerEvent>, echo: bool) {
    while let Some(event) = events.recv().await {
        if !matches!(event, TimerEvent::Tick { .. }) {
            debug!("Timer event: {:?}", event);
        }
        if echo {
            if let Some(line) = describe_event(&event) {
                println!("{}", line);
            }
        }
    }
}

/// Reads one shortcut per line from stdin.
///
/// Stdin is never a text field, so every bound key applies.
async fn read_shortcuts(handle: TimerHandle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };
        let Some(key) = line.chars().next() else {
            continue;
        };
        let Some(command) = command_for_key(key, InputFocus::Other) else {
            println!("Unknown key {:?}", key);
            continue;
        };
        match handle.send(command).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => println!("{}", e),
            Err(_) => break,
        }
    }
    debug!("Shortcut reader stopped");
}

/// Renders an event for the interactive console.
///
/// Ticks are shown once a minute.
pub fn describe_event(event: &TimerEvent) -> Option<String> {
    let line = match event {
        TimerEvent::Started { mode, resumed: false } => format!("▶ {} started", mode),
        TimerEvent::Started { mode, resumed: true } => format!("▶ {} resumed", mode),
        TimerEvent::Paused { seconds_remaining } => {
            format!("⏸ Paused at {}", format_clock(*seconds_remaining))
        }
        TimerEvent::Reset { mode } => format!("↺ {} reset", mode),
        TimerEvent::ModeSwitched { mode } => format!("→ {}", mode),
        TimerEvent::Tick { seconds_remaining } if seconds_remaining % 60 == 0 => {
            format!("  {} remaining", format_clock(*seconds_remaining))
        }
        TimerEvent::Tick { .. } => return None,
        TimerEvent::Completed(event) => format!("✓ {} complete", event.completed_mode),
        TimerEvent::AutoStartScheduled { mode, delay_ms } => {
            format!("  {} starts in {} ms", mode, delay_ms)
        }
        TimerEvent::AutoStartCancelled => "  Auto-start cancelled".to_string(),
    };
    Some(line)
}
