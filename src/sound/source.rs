//! Sound source management.
//!
//! Completion sounds come from the platform sound directories when one of
//! the preferred sounds is installed, and from a synthesized chime otherwise.

use std::path::{Path, PathBuf};

/// Represents the source of a sound to be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// A sound file from one of the system sound directories.
    System {
        /// The name of the sound (e.g., "complete").
        name: String,
        /// The full path to the sound file.
        path: PathBuf,
    },
    /// A short sine chime generated at playback time.
    Chime,
}

impl SoundSource {
    /// Creates a new system sound source.
    #[must_use]
    pub fn system(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::System {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Returns the name of the sound source.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::System { name, .. } => name,
            Self::Chime => "chime",
        }
    }

    /// Returns the file path if this is a system sound.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::System { path, .. } => Some(path),
            Self::Chime => None,
        }
    }
}

/// Directories to search for system sounds, in order of priority.
const SYSTEM_SOUND_DIRS: &[&str] = &[
    "/System/Library/Sounds",
    "/Library/Sounds",
    "/usr/share/sounds/freedesktop/stereo",
];

/// Supported audio file extensions.
const SUPPORTED_EXTENSIONS: &[&str] = &["aiff", "wav", "mp3", "oga", "ogg", "flac"];

/// Sound names to try, in order of preference.
const DEFAULT_SOUND_NAMES: &[&str] = &["complete", "Glass", "bell", "Ping"];

/// Scans `dirs` for playable sound files, sorted by name.
fn scan_sound_dirs<P: AsRef<Path>>(dirs: &[P]) -> Vec<SoundSource> {
    let mut sounds = Vec::new();

    for dir in dirs {
        let Ok(entries) = std::fs::read_dir(dir.as_ref()) else {
            continue;
        };
        for entry in entries.flatten() {
            let file_path = entry.path();
            let supported = file_path
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()));
            if !supported {
                continue;
            }
            if let Some(stem) = file_path.file_stem() {
                sounds.push(SoundSource::System {
                    name: stem.to_string_lossy().into_owned(),
                    path: file_path,
                });
            }
        }
    }

    sounds.sort_by(|a, b| a.name().cmp(b.name()));
    sounds
}

/// Picks the preferred sound out of `sounds`, or the chime.
fn choose_default(sounds: &[SoundSource]) -> SoundSource {
    DEFAULT_SOUND_NAMES
        .iter()
        .find_map(|preferred| sounds.iter().find(|s| s.name() == *preferred))
        .cloned()
        .unwrap_or(SoundSource::Chime)
}

/// Discovers available system sounds.
#[must_use]
pub fn discover_system_sounds() -> Vec<SoundSource> {
    scan_sound_dirs(SYSTEM_SOUND_DIRS)
}

/// Gets the sound played when a countdown completes.
#[must_use]
pub fn get_default_sound() -> SoundSource {
    choose_default(&discover_system_sounds())
}
