//! Session recording.
//!
//! Completed intervals leave the engine through a channel and are
//! persisted here by a background task. Recording is best effort: a slow
//! or failing recorder is logged and never holds up the timer.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::types::{CompletionEvent, TaskId, TimerMode};

/// Upper bound on a single recorder call.
pub const RECORDER_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// RecorderError
// ============================================================================

/// Errors reported by session recorders.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// File system error
    #[error("session store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be encoded or decoded
    #[error("session record serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing store refused the record
    #[error("session record rejected: {0}")]
    Rejected(String),
}

// ============================================================================
// SessionRecorder
// ============================================================================

/// Output port for completed intervals.
///
/// On success for a pomodoro with a task, implementations also count the
/// interval towards that task.
#[allow(async_fn_in_trait)]
pub trait SessionRecorder {
    /// Persists one completed interval.
    async fn record_completed_interval(&self, event: &CompletionEvent) -> Result<(), RecorderError>;
}

/// Records every event from `events` until the channel closes.
///
/// Each call is bounded by `call_timeout`. Failures and timeouts are
/// logged and the event is dropped.
pub async fn run_recorder<R: SessionRecorder>(
    recorder: R,
    mut events: mpsc::UnboundedReceiver<CompletionEvent>,
    call_timeout: Duration,
) {
    while let Some(event) = events.recv().await {
        match timeout(call_timeout, recorder.record_completed_interval(&event)).await {
            Ok(Ok(())) => debug!("Recorded {} session", event.completed_mode),
            Ok(Err(e)) => warn!("Failed to record {} session: {}", event.completed_mode, e),
            Err(_) => warn!(
                "Recording {} session timed out after {:?}",
                event.completed_mode, call_timeout
            ),
        }
    }
    debug!("Session recorder stopped");
}

// ============================================================================
// SessionRecord
// ============================================================================

/// One line of the session log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    pub mode: TimerMode,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// Planned length of the interval
    pub seconds: u32,
    pub completed: bool,
}

impl From<&CompletionEvent> for SessionRecord {
    fn from(event: &CompletionEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id: event.associated_task_id.clone(),
            mode: event.completed_mode,
            started_at: event.started_at,
            ended_at: event.ended_at,
            seconds: event.planned_duration_seconds,
            completed: true,
        }
    }
}

// ============================================================================
// FileSessionRecorder
// ============================================================================

/// Appends session records to a JSON Lines file and keeps per-task
/// pomodoro counts in a JSON map.
#[derive(Debug, Clone)]
pub struct FileSessionRecorder {
    sessions_path: PathBuf,
    progress_path: PathBuf,
}

impl FileSessionRecorder {
    pub fn new(sessions_path: impl Into<PathBuf>, progress_path: impl Into<PathBuf>) -> Self {
        Self {
            sessions_path: sessions_path.into(),
            progress_path: progress_path.into(),
        }
    }

    pub fn sessions_path(&self) -> &Path {
        &self.sessions_path
    }

    pub fn progress_path(&self) -> &Path {
        &self.progress_path
    }

    async fn append(&self, record: &SessionRecord) -> Result<(), RecorderError> {
        ensure_parent(&self.sessions_path).await?;

        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.sessions_path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }

    async fn increment_task(&self, task: &TaskId) -> Result<u32, RecorderError> {
        let mut progress = match load_task_progress(&self.progress_path).await {
            Ok(progress) => progress,
            Err(RecorderError::Serialization(e)) => {
                let aside = with_suffix(&self.progress_path, "corrupt");
                warn!(
                    "Unreadable task progress ({}); moving it to {} and starting over",
                    e,
                    aside.display()
                );
                tokio::fs::rename(&self.progress_path, &aside).await?;
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        let count = progress.entry(task.as_str().to_string()).or_insert(0);
        *count += 1;
        let count = *count;

        ensure_parent(&self.progress_path).await?;
        let json = serde_json::to_vec_pretty(&progress)?;
        write_atomic(&self.progress_path, &json).await?;
        Ok(count)
    }
}

impl SessionRecorder for FileSessionRecorder {
    async fn record_completed_interval(&self, event: &CompletionEvent) -> Result<(), RecorderError> {
        let record = SessionRecord::from(event);
        self.append(&record).await?;

        if event.completed_mode == TimerMode::Pomodoro {
            if let Some(task) = &event.associated_task_id {
                let count = self.increment_task(task).await?;
                info!("Task {} now has {} completed pomodoros", task, count);
            }
        }
        Ok(())
    }
}

/// Writes `contents` to a sibling temp file and renames it over `path`, so
/// readers see either the old file or the new one.
async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), RecorderError> {
    let tmp = with_suffix(path, "tmp");
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(contents).await?;
    file.sync_all().await?;
    drop(file);
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

async fn ensure_parent(path: &Path) -> Result<(), RecorderError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}

/// Reads the per-task pomodoro counts. A missing file reads as empty.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub async fn load_task_progress(path: &Path) -> Result<BTreeMap<String, u32>, RecorderError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(e) => Err(e.into()),
    }
}

/// Reads the `limit` most recent session records, oldest first.
///
/// Malformed lines are skipped. A missing file reads as empty.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub async fn load_history(path: &Path, limit: usize) -> Result<Vec<SessionRecord>, RecorderError> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let records: Vec<SessionRecord> = contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str(line) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping malformed session record: {}", e);
                None
            }
        })
        .collect();

    let skip = records.len().saturating_sub(limit);
    Ok(records.into_iter().skip(skip).collect())
}

// ============================================================================
// MockSessionRecorder
// ============================================================================

/// Mock session recorder for testing.
///
/// Clones share the same recorded events.
#[derive(Debug, Clone, Default)]
pub struct MockSessionRecorder {
    recorded: Arc<Mutex<Vec<CompletionEvent>>>,
    should_fail: Arc<AtomicBool>,
    delay: Arc<Mutex<Option<Duration>>>,
}

impl MockSessionRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Makes every call sleep for `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    #[must_use]
    pub fn recorded(&self) -> Vec<CompletionEvent> {
        self.recorded.lock().unwrap().clone()
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }
}

impl SessionRecorder for MockSessionRecorder {
    async fn record_completed_interval(&self, event: &CompletionEvent) -> Result<(), RecorderError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(RecorderError::Rejected("Mock failure".to_string()));
        }
        self.recorded.lock().unwrap().push(event.clone());
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
