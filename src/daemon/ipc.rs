//! IPC Server for the Pomodoro Timer.
//!
//! This module provides Unix Domain Socket IPC functionality:
//! - Server that listens on a Unix socket
//! - Request/response handling for timer commands
//! - Translation of requests into runner commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

use crate::settings;
use crate::types::{IpcRequest, IpcResponse, ResponseData};

use super::control::{Command, StatusReport};
use super::runner::TimerHandle;

// ============================================================================
// Constants
// ============================================================================

/// Maximum request size in bytes (4KB)
const MAX_REQUEST_SIZE: usize = 4096;

/// Read timeout in seconds
const READ_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// IpcError
// ============================================================================

/// IPC-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    /// Read error
    #[error("Failed to read request: {0}")]
    ReadError(String),

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,

    /// Request too large
    #[error("Request too large (max {MAX_REQUEST_SIZE} bytes)")]
    RequestTooLarge,
}

// ============================================================================
// IpcServer
// ============================================================================

/// Unix Domain Socket IPC server.
pub struct IpcServer {
    /// Unix socket listener
    listener: UnixListener,
    /// Socket path (for cleanup)
    socket_path: PathBuf,
}

impl IpcServer {
    /// Creates a new IPC server bound to the specified socket path.
    ///
    /// If the socket file already exists, it will be removed before binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot be bound.
    pub fn new(socket_path: &Path) -> Result<Self> {
        if socket_path.exists() {
            std::fs::remove_file(socket_path)
                .with_context(|| format!("Failed to remove existing socket: {:?}", socket_path))?;
        }

        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create socket directory: {:?}", parent))?;
        }

        let listener = UnixListener::bind(socket_path)
            .with_context(|| format!("Failed to bind Unix socket: {:?}", socket_path))?;

        Ok(Self {
            listener,
            socket_path: socket_path.to_path_buf(),
        })
    }

    /// Accepts an incoming client connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be accepted.
    pub async fn accept(&self) -> Result<UnixStream> {
        let (stream, _addr) = self
            .listener
            .accept()
            .await
            .context("Failed to accept connection")?;
        Ok(stream)
    }

    /// Receives and deserializes an IPC request from the stream.
    ///
    /// Reads until the client shuts down its write half, bounded by a read
    /// timeout and the maximum request size.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or deserialization fails.
    pub async fn receive_request(stream: &mut UnixStream) -> Result<IpcRequest> {
        let mut buffer = Vec::with_capacity(256);
        let mut limited = stream.take(MAX_REQUEST_SIZE as u64 + 1);

        let read_result = timeout(
            Duration::from_secs(READ_TIMEOUT_SECS),
            limited.read_to_end(&mut buffer),
        )
        .await;

        match read_result {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(IpcError::ReadError(e.to_string()).into()),
            Err(_) => return Err(IpcError::Timeout.into()),
        }

        if buffer.is_empty() {
            anyhow::bail!("Connection closed by client");
        }
        if buffer.len() > MAX_REQUEST_SIZE {
            return Err(IpcError::RequestTooLarge.into());
        }

        let request: IpcRequest =
            serde_json::from_slice(&buffer).context("Failed to deserialize IPC request")?;

        Ok(request)
    }

    /// Serializes and sends an IPC response to the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub async fn send_response(stream: &mut UnixStream, response: &IpcResponse) -> Result<()> {
        let json = serde_json::to_vec(response).context("Failed to serialize IPC response")?;

        stream
            .write_all(&json)
            .await
            .context("Failed to write response")?;
        stream.flush().await.context("Failed to flush response")?;

        Ok(())
    }

    /// Returns the socket path.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

// ============================================================================
// RequestHandler
// ============================================================================

/// Handles IPC requests by forwarding them to the timer runner.
#[derive(Debug, Clone)]
pub struct RequestHandler {
    /// Handle of the running timer
    handle: TimerHandle,
    /// Settings file read by `reload`
    settings_path: PathBuf,
}

impl RequestHandler {
    /// Creates a new request handler.
    pub fn new(handle: TimerHandle, settings_path: impl Into<PathBuf>) -> Self {
        Self {
            handle,
            settings_path: settings_path.into(),
        }
    }

    /// Handles an IPC request and returns the appropriate response.
    pub async fn handle(&self, request: IpcRequest) -> IpcResponse {
        let (command, message) = match request {
            IpcRequest::Start => (Command::Start, "Timer started".to_string()),
            IpcRequest::Pause => (Command::Pause, "Timer paused".to_string()),
            IpcRequest::Toggle => (Command::Toggle, String::new()),
            IpcRequest::Reset => (Command::Reset, "Timer reset".to_string()),
            IpcRequest::Mode { mode } => (
                Command::SwitchMode(mode),
                format!("Switched to {}", mode),
            ),
            IpcRequest::Task { task_id } => {
                let message = match &task_id {
                    Some(id) => format!("Task set to {}", id),
                    None => "Task cleared".to_string(),
                };
                (Command::SelectTask(task_id), message)
            }
            IpcRequest::Status => (Command::Status, String::new()),
            IpcRequest::Clear => (
                Command::ClearCompleted,
                "Completed pomodoros cleared".to_string(),
            ),
            IpcRequest::Reload => match settings::load(&self.settings_path) {
                Ok(config) => (
                    Command::UpdateConfig(config),
                    "Settings reloaded; new durations apply from the next reset".to_string(),
                ),
                Err(e) => return IpcResponse::error(format!("Failed to reload settings: {}", e)),
            },
        };

        match self.handle.send(command).await {
            Ok(Ok(report)) => IpcResponse::success(message, Some(response_data(report))),
            Ok(Err(e)) => IpcResponse::error(e.to_string()),
            Err(e) => IpcResponse::error(e.to_string()),
        }
    }
}

fn response_data(report: StatusReport) -> ResponseData {
    ResponseData::from_snapshot(&report.snapshot, report.task_id)
}

/// Serves connections one at a time until accepting fails.
///
/// A failed connection is logged and does not stop the server.
///
/// # Errors
///
/// Returns an error if the listener stops accepting connections.
pub async fn serve(server: IpcServer, handler: RequestHandler) -> Result<()> {
    debug!("IPC server listening on {:?}", server.socket_path());
    loop {
        let mut stream = server.accept().await?;
        let response = match IpcServer::receive_request(&mut stream).await {
            Ok(request) => {
                debug!("IPC request: {:?}", request);
                handler.handle(request).await
            }
            Err(e) => {
                warn!("Invalid IPC request: {:#}", e);
                IpcResponse::error(format!("Invalid request: {}", e))
            }
        };
        if let Err(e) = IpcServer::send_response(&mut stream, &response).await {
            warn!("Failed to send IPC response: {:#}", e);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
