//! Settings storage.
//!
//! All persistent state lives under `~/.pomofocus/`:
//!
//! ```text
//! ~/.pomofocus/
//! ├── settings.json        timer configuration (camelCase JSON)
//! ├── sessions.jsonl       one completed interval per line
//! ├── task_progress.json   completed pomodoros per task
//! └── pomofocus.sock       daemon IPC socket
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::types::{ConfigError, TimerConfig};

/// Name of the data directory inside the home directory.
const DATA_DIR: &str = ".pomofocus";

/// Errors raised while loading or saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The home directory could not be determined
    #[error("could not determine the home directory")]
    HomeNotFound,

    /// File system error
    #[error("settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid settings JSON
    #[error("settings file {path:?} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A value is out of range
    #[error("invalid settings: {0}")]
    Invalid(#[from] ConfigError),
}

/// Locations of the files owned by the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    /// Uses `~/.pomofocus`.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::HomeNotFound` if there is no home directory.
    pub fn from_home() -> Result<Self, SettingsError> {
        let home = dirs::home_dir().ok_or(SettingsError::HomeNotFound)?;
        Ok(Self::with_root(home.join(DATA_DIR)))
    }

    /// Uses `root` as the data directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> PathBuf {
        self.root.join("settings.json")
    }

    pub fn sessions(&self) -> PathBuf {
        self.root.join("sessions.jsonl")
    }

    pub fn task_progress(&self) -> PathBuf {
        self.root.join("task_progress.json")
    }

    pub fn socket(&self) -> PathBuf {
        self.root.join("pomofocus.sock")
    }
}

/// Loads and validates the configuration at `path`.
///
/// A missing file yields the defaults; fields absent from the file take
/// their default values.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid JSON, or
/// holds out-of-range values.
pub fn load(path: &Path) -> Result<TimerConfig, SettingsError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No settings at {:?}, using defaults", path);
            return Ok(TimerConfig::default());
        }
        Err(source) => {
            return Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config: TimerConfig =
        serde_json::from_slice(&bytes).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}

/// Validates `config` and writes it to `path` as pretty JSON.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or cannot be written.
pub fn save(path: &Path, config: &TimerConfig) -> Result<(), SettingsError> {
    config.validate()?;

    let io_err = |source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(config).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json + "\n").map_err(io_err)?;
    debug!("Settings saved to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_app_paths_layout() {
        let paths = AppPaths::with_root("/tmp/pf");
        assert_eq!(paths.root(), Path::new("/tmp/pf"));
        assert_eq!(paths.settings(), PathBuf::from("/tmp/pf/settings.json"));
        assert_eq!(paths.sessions(), PathBuf::from("/tmp/pf/sessions.jsonl"));
        assert_eq!(
            paths.task_progress(),
            PathBuf::from("/tmp/pf/task_progress.json")
        );
        assert_eq!(paths.socket(), PathBuf::from("/tmp/pf/pomofocus.sock"));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load(&dir.path().join("settings.json")).unwrap();
        assert_eq!(config, TimerConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let config = TimerConfig {
            auto_start_break: true,
            volume: 80,
            ..TimerConfig::default().with_pomodoro_minutes(45)
        };

        save(&path, &config).unwrap();

        assert_eq!(load(&path).unwrap(), config);
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"pomodoroMinutes\": 45"));
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"longBreakInterval": 3}"#).unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.long_break_interval, 3);
        assert_eq!(config.pomodoro_minutes, 25);
    }

    #[test]
    fn test_load_rejects_out_of_range() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"pomodoroMinutes": 0}"#).unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        assert!(err.to_string().contains("pomodoroMinutes"));
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ nope").unwrap();

        assert!(matches!(load(&path), Err(SettingsError::Parse { .. })));
    }

    #[test]
    fn test_save_rejects_invalid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let config = TimerConfig::default().with_long_break_interval(1);

        assert!(save(&path, &config).is_err());
        assert!(!path.exists());
    }
}
