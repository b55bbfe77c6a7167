// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Public entry point tying the session, buffer and flusher together.
//!
//! `log()` is synchronous and never fails: it appends to the buffer and, when
//! the size threshold is reached, drains the buffer before returning. Only
//! the network exchange runs on a spawned task. The flush timer is a spawned
//! task as well, cancelled through its [`CancellationToken`] whenever a drain
//! happens first.
//!
//! # Example
//!
//! ```rust,ignore
//! use remote_logger::{RemoteLogger, RemoteLoggerConfig};
//!
//! let logger = RemoteLogger::new(RemoteLoggerConfig {
//!     password: Some("secure-password-123".to_string()),
//!     ..RemoteLoggerConfig::new("com.demo.app")
//! })?;
//!
//! logger.info("Hello from Remote Logger!", None);
//! logger.warn("This is a warning message", Some(json!({"code": 123})));
//!
//! // Before exiting, send whatever is still buffered.
//! logger.shutdown().await;
//! ```

use crate::buffer::{AppendOutcome, BatchBuffer};
use crate::config::RemoteLoggerConfig;
use crate::entry::{LogEntry, LogLevel};
use crate::errors::LoggerError;
use crate::flusher::{FlushOutcome, Flusher};
use crate::intake::IngestClient;
use crate::session::{AuthSession, SessionState};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug)]
struct Inner {
    session: Arc<AuthSession>,
    buffer: Arc<Mutex<BatchBuffer>>,
    client: IngestClient,
    flusher: Flusher,
    flush_interval: Duration,
    runtime: Handle,
}

/// Buffered, authenticated log shipper.
///
/// Cloning is cheap and every clone feeds the same buffer and session.
#[derive(Debug, Clone)]
pub struct RemoteLogger {
    inner: Arc<Inner>,
}

impl RemoteLogger {
    /// Builds a logger and starts authenticating in the background.
    ///
    /// Must be called from within a tokio runtime; the logger keeps a handle
    /// to it so `log()` can be called from any thread afterwards.
    pub fn new(config: RemoteLoggerConfig) -> Result<Self, LoggerError> {
        let logger = Self::build(config)?;
        let session = Arc::clone(&logger.inner.session);
        let client = logger.inner.client.clone();
        logger.inner.runtime.spawn(async move {
            session.authenticate(&client).await;
        });
        Ok(logger)
    }

    /// Builds a logger and waits for the first auth handshake to finish.
    ///
    /// Auth failures still do not surface as errors: the returned logger is
    /// simply [`SessionState::Disabled`].
    pub async fn connect(config: RemoteLoggerConfig) -> Result<Self, LoggerError> {
        let logger = Self::build(config)?;
        logger
            .inner
            .session
            .authenticate(&logger.inner.client)
            .await;
        Ok(logger)
    }

    fn build(config: RemoteLoggerConfig) -> Result<Self, LoggerError> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|e| LoggerError::Runtime(e.to_string()))?;

        let session = Arc::new(AuthSession::new(&config));
        let buffer = Arc::new(Mutex::new(BatchBuffer::new(
            config.buffer_size,
            config.max_buffered_entries,
        )));
        let client = IngestClient::new(&config);
        let flusher = Flusher::new(Arc::clone(&session), Arc::clone(&buffer), client.clone());

        debug!(
            "LOGS | Remote logger created for {} (buffer size {}, flush interval {} ms)",
            config.package_name,
            config.buffer_size,
            config.flush_interval.as_millis()
        );

        Ok(RemoteLogger {
            inner: Arc::new(Inner {
                session,
                buffer,
                client,
                flusher,
                flush_interval: config.flush_interval,
                runtime,
            }),
        })
    }

    fn lock_buffer(&self) -> MutexGuard<'_, BatchBuffer> {
        self.inner
            .buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Records one entry. A no-op once the session is disabled.
    pub fn log(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        meta: Option<serde_json::Value>,
    ) {
        if self.inner.session.is_disabled() {
            return;
        }

        let outcome = self.lock_buffer().append(LogEntry::new(level, message, meta));
        match outcome {
            AppendOutcome::FlushNow => self.flush_in_background(),
            AppendOutcome::ScheduleTimer(timer) => self.spawn_timer(timer),
            AppendOutcome::Buffered => {}
        }
    }

    pub fn info(&self, message: impl Into<String>, meta: Option<serde_json::Value>) {
        self.log(LogLevel::Info, message, meta);
    }

    pub fn warn(&self, message: impl Into<String>, meta: Option<serde_json::Value>) {
        self.log(LogLevel::Warn, message, meta);
    }

    pub fn error(&self, message: impl Into<String>, meta: Option<serde_json::Value>) {
        self.log(LogLevel::Error, message, meta);
    }

    pub fn debug(&self, message: impl Into<String>, meta: Option<serde_json::Value>) {
        self.log(LogLevel::Debug, message, meta);
    }

    // The drain happens here, before returning to the caller; only the
    // submission itself is deferred.
    fn flush_in_background(&self) {
        match self.inner.flusher.begin() {
            Ok(batch) => {
                let flusher = self.inner.flusher.clone();
                self.inner.runtime.spawn(async move {
                    flusher.deliver(batch).await;
                });
            }
            Err(reason) => debug!("LOGS | Flush skipped: {:?}", reason),
        }
    }

    fn spawn_timer(&self, timer: CancellationToken) {
        let buffer = Arc::clone(&self.inner.buffer);
        let flusher = self.inner.flusher.clone();
        let interval = self.inner.flush_interval;
        self.inner.runtime.spawn(async move {
            tokio::select! {
                () = timer.cancelled() => {}
                () = tokio::time::sleep(interval) => {
                    buffer
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .timer_fired(&timer);
                    if let FlushOutcome::Skipped(reason) = flusher.flush().await {
                        debug!("LOGS | Timed flush skipped: {:?}", reason);
                    }
                }
            }
        });
    }

    /// Runs one flush attempt now and waits for its result.
    pub async fn flush(&self) -> FlushOutcome {
        self.inner.flusher.flush().await
    }

    /// Cancels the pending timer and sends whatever is still buffered.
    pub async fn shutdown(&self) -> FlushOutcome {
        self.lock_buffer().cancel_timer();
        let outcome = self.flush().await;
        debug!("LOGS | Remote logger shut down: {:?}", outcome);
        outcome
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.session.state()
    }

    /// Number of entries waiting for the next flush.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.lock_buffer().len()
    }

    #[must_use]
    pub fn has_pending_timer(&self) -> bool {
        self.lock_buffer().is_timer_pending()
    }
}
