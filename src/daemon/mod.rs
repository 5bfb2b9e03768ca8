//! Daemon module for the Pomodoro Timer.
//!
//! This module contains the core daemon functionality:
//! - `duration`: Mode to countdown length
//! - `timer`: Timer engine with state transitions and countdown logic
//! - `policy`: Completion policy and side-effect dispatch
//! - `recorder`: Session recorder port and file implementation
//! - `control`: Command mapping and keyboard shortcuts
//! - `runner`: Single-timeline driver (ticks, commands, auto-start)
//! - `ipc`: Unix socket server
//! - `service`: Daemon bootstrap

pub mod control;
pub mod duration;
pub mod ipc;
pub mod policy;
pub mod recorder;
pub mod runner;
pub mod service;
pub mod timer;

pub use control::{command_for_key, Command, ControlAdapter, ControlError, InputFocus, StatusReport};
pub use duration::resolve_duration;
pub use ipc::{IpcServer, RequestHandler};
pub use policy::{on_complete, CompletionOutcome, CompletionPorts, SideEffect};
pub use recorder::{
    load_history, load_task_progress, run_recorder, FileSessionRecorder, MockSessionRecorder,
    RecorderError, SessionRecord, SessionRecorder,
};
pub use runner::{CommandResult, RunnerError, TimerHandle, TimerRunner};
pub use service::{run_daemon, DaemonOptions};
pub use timer::{TimerEngine, TimerError, TimerEvent};
