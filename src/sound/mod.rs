//! Completion sound playback.
//!
//! This module provides:
//!
//! - System sound discovery with a synthesized chime fallback
//! - Non-blocking playback at a configurable volume
//! - Graceful degradation when audio is unavailable
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   SoundPlayer    │ ← trait used by the completion dispatcher
//! └────────┬─────────┘
//!          │ play(source, volume)
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │ RodioSoundPlayer │────▶│  audio thread    │
//! │   (Sender)       │     │  (OutputStream)  │
//! └──────────────────┘     └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use pomofocus::sound::{get_default_sound, RodioSoundPlayer, SoundPlayer};
//!
//! if let Ok(player) = RodioSoundPlayer::new() {
//!     let _ = SoundPlayer::play(&player, &get_default_sound(), 50);
//! }
//! ```

mod error;
mod player;
mod source;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub use error::SoundError;
pub use player::RodioSoundPlayer;
pub use source::{discover_system_sounds, get_default_sound, SoundSource};

/// Trait for sound playback implementations.
///
/// Implementations must not block the caller; the sound plays in the
/// background.
pub trait SoundPlayer: Send + Sync {
    /// Plays `source` at `volume` (0-100).
    ///
    /// # Errors
    ///
    /// Returns an error if playback could not be started.
    fn play(&self, source: &SoundSource, volume: u32) -> Result<(), SoundError>;

    /// Returns true if the audio system is available.
    fn is_available(&self) -> bool;
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, source: &SoundSource, volume: u32) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, source, volume)
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Creates the rodio player, or `None` when no output device exists.
pub fn try_create_player() -> Option<RodioSoundPlayer> {
    match RodioSoundPlayer::new() {
        Ok(player) => Some(player),
        Err(e) => {
            tracing::warn!("Sound disabled: {}", e);
            None
        }
    }
}

/// Mock sound player for testing.
#[derive(Debug)]
pub struct MockSoundPlayer {
    play_calls: Mutex<Vec<(SoundSource, u32)>>,
    available: AtomicBool,
    should_fail: AtomicBool,
}

impl Default for MockSoundPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            play_calls: Mutex::new(Vec::new()),
            available: AtomicBool::new(true),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap().len()
    }

    /// Returns every played source with the volume it was played at.
    #[must_use]
    pub fn get_play_calls(&self) -> Vec<(SoundSource, u32)> {
        self.play_calls.lock().unwrap().clone()
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource, volume: u32) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.play_calls
            .lock()
            .unwrap()
            .push((source.clone(), volume));
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}
