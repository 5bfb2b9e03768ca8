//! Pomofocus Library
//!
//! This library provides the core functionality for the Pomofocus timer.
//! It includes:
//! - Timer engine, completion policy and the tick/command runner
//! - IPC server/client for daemon-CLI communication
//! - Session recording and history
//! - CLI command parsing and display utilities
//! - Type definitions for configuration and state
//! - Desktop notifications and sound playback

pub mod cli;
pub mod daemon;
pub mod notification;
pub mod settings;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    format_clock, CompletionEvent, ConfigError, IpcRequest, IpcResponse, ResponseData, TaskId,
    TimerConfig, TimerMode, TimerSnapshot, TimerState, TimerStatus,
};

pub use daemon::{
    on_complete, resolve_duration, CompletionOutcome, CompletionPorts, SideEffect, TimerEngine,
    TimerError, TimerEvent,
};

// Re-export notification types
pub use notification::{
    MockNotifier, NotificationContent, NotificationError, NotificationPermission, Notifier,
};

// Re-export sound types
pub use sound::{MockSoundPlayer, RodioSoundPlayer, SoundError, SoundPlayer, SoundSource};
