//! IPC Client for communicating with the Pomodoro Timer daemon.
//!
//! This module provides:
//! - Unix Domain Socket client
//! - Request/response handling
//! - Connection retry logic
//! - Timeout handling

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::time::timeout;

use crate::settings::AppPaths;
use crate::types::{IpcRequest, IpcResponse, TaskId, TimerMode};

// ============================================================================
// Constants
// ============================================================================

/// Connection timeout in seconds
const CONNECTION_TIMEOUT_SECS: u64 = 5;

/// Read/write timeout in seconds
const IO_TIMEOUT_SECS: u64 = 5;

/// Maximum response size in bytes (64KB)
const MAX_RESPONSE_SIZE: u64 = 65536;

/// Maximum connection attempts
const MAX_RETRIES: u32 = 3;

/// Retry delay in milliseconds (base delay, multiplied by attempt number)
const RETRY_DELAY_MS: u64 = 200;

// ============================================================================
// IpcClient
// ============================================================================

/// IPC client for daemon communication.
#[derive(Debug, Clone)]
pub struct IpcClient {
    /// Socket path
    socket_path: PathBuf,
    /// Connection timeout
    timeout: Duration,
}

impl IpcClient {
    /// Creates a client for the socket under `~/.pomofocus`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        let paths = AppPaths::from_home()?;
        Ok(Self::with_socket_path(paths.socket()))
    }

    /// Creates a new IPC client with a custom socket path.
    pub fn with_socket_path(socket_path: PathBuf) -> Self {
        Self {
            socket_path,
            timeout: Duration::from_secs(CONNECTION_TIMEOUT_SECS),
        }
    }

    /// Returns the socket path.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    pub async fn start(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Start).await
    }

    pub async fn pause(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Pause).await
    }

    pub async fn toggle(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Toggle).await
    }

    pub async fn reset(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Reset).await
    }

    /// Sends a mode switch to the daemon.
    pub async fn mode(&self, mode: TimerMode) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Mode { mode })
            .await
    }

    /// Selects `task_id`, or clears the selection when `None`.
    pub async fn task(&self, task_id: Option<TaskId>) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Task { task_id })
            .await
    }

    pub async fn status(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Status).await
    }

    /// Asks the daemon to re-read its settings file.
    pub async fn reload(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Reload).await
    }

    /// Resets the daemon's completed pomodoro count.
    pub async fn clear(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Clear).await
    }

    /// Sends a request, retrying only while the daemon cannot be reached.
    ///
    /// Once a connection is made the request is sent exactly once, so a
    /// command is never applied twice. An error response from the daemon
    /// is returned as `Err` with the daemon's message.
    async fn send_request_with_retry(&self, request: &IpcRequest) -> Result<IpcResponse> {
        let mut attempt = 1;
        let stream = loop {
            match self.connect().await {
                Ok(stream) => break stream,
                Err(e) if attempt < MAX_RETRIES => {
                    tracing::debug!("Connection failed (attempt {}/{}): {:#}", attempt, MAX_RETRIES, e);
                    let delay = Duration::from_millis(RETRY_DELAY_MS * u64::from(attempt));
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        let response = self.exchange(stream, request).await?;
        if response.is_error() {
            anyhow::bail!("{}", response.message);
        }
        Ok(response)
    }

    async fn connect(&self) -> Result<UnixStream> {
        timeout(self.timeout, UnixStream::connect(&self.socket_path))
            .await
            .context("Connection timed out")?
            .context("Cannot connect to the daemon. Start it with 'pomofocus daemon'")
    }

    /// Writes one request and reads the daemon's reply.
    async fn exchange(&self, mut stream: UnixStream, request: &IpcRequest) -> Result<IpcResponse> {
        let io_timeout = Duration::from_secs(IO_TIMEOUT_SECS);
        let request_json = serde_json::to_vec(request).context("Failed to serialize request")?;

        timeout(io_timeout, stream.write_all(&request_json))
            .await
            .context("Write timed out")?
            .context("Failed to send request")?;

        // Shutdown write side to signal end of request
        stream
            .shutdown()
            .await
            .context("Failed to shut down the write half")?;

        let mut buffer = Vec::new();
        timeout(
            io_timeout,
            (&mut stream)
                .take(MAX_RESPONSE_SIZE)
                .read_to_end(&mut buffer),
        )
        .await
        .context("Read timed out")?
        .context("Failed to receive response")?;

        if buffer.is_empty() {
            anyhow::bail!("No response from the daemon");
        }

        serde_json::from_slice(&buffer).context("Failed to parse response")
    }
}

// ============================================================================
// Tests
// ============================================================================
