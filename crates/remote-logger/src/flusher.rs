// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Gating, sending and interpreting one flush attempt.
//!
//! A flush has two halves:
//!
//! ```text
//!   begin()  (sync, under the buffer lock)
//!     disabled? ── yes ──> Skipped(Disabled)
//!     empty?    ── yes ──> Skipped(Empty)
//!     password but no token? ── yes ──> Skipped(AwaitingToken), buffer kept
//!     drain buffer, cancel timer
//!       │
//!       v
//!   deliver() (async)
//!     POST /api/log
//!       2xx   ──> Delivered
//!       401   ──> clear token, spawn reauth, batch dropped
//!       other ──> batch dropped
//! ```
//!
//! Draining happens before any await, so entries logged while a delivery is
//! in flight always land in the next batch and never in two.
//!
//! Delivery is at-most-once: a failed batch is never put back.

use crate::buffer::BatchBuffer;
use crate::entry::LogEntry;
use crate::errors::DeliveryError;
use crate::intake::IngestClient;
use crate::session::AuthSession;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, warn};

/// Why a flush did not send anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    Empty,
    /// A password is configured but no token is held yet; entries stay queued.
    AwaitingToken,
}

#[derive(Debug)]
pub enum FlushOutcome {
    Skipped(SkipReason),
    Delivered(usize),
    /// The batch of `count` entries was lost.
    Dropped { count: usize, error: DeliveryError },
}

/// Entries drained for one submission together with the token to send them with.
#[derive(Debug)]
pub struct PendingBatch {
    entries: Vec<LogEntry>,
    token: Option<String>,
}

impl PendingBatch {
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Flusher {
    session: Arc<AuthSession>,
    buffer: Arc<Mutex<BatchBuffer>>,
    client: IngestClient,
}

impl Flusher {
    #[must_use]
    pub fn new(
        session: Arc<AuthSession>,
        buffer: Arc<Mutex<BatchBuffer>>,
        client: IngestClient,
    ) -> Self {
        Flusher {
            session,
            buffer,
            client,
        }
    }

    fn lock_buffer(&self) -> MutexGuard<'_, BatchBuffer> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Checks the preconditions and drains the buffer, without suspending.
    pub fn begin(&self) -> Result<PendingBatch, SkipReason> {
        if self.session.is_disabled() {
            return Err(SkipReason::Disabled);
        }
        let token = self.session.token();

        let mut buffer = self.lock_buffer();
        if buffer.is_empty() {
            return Err(SkipReason::Empty);
        }
        if self.session.has_password() && token.is_none() {
            debug!(
                "LOGS | Not authenticated yet, keeping {} entries for the next flush",
                buffer.len()
            );
            return Err(SkipReason::AwaitingToken);
        }

        Ok(PendingBatch {
            entries: buffer.drain_for_flush(),
            token,
        })
    }

    /// Submits a drained batch and applies the response to the session.
    pub async fn deliver(&self, batch: PendingBatch) -> FlushOutcome {
        let count = batch.len();
        match self
            .client
            .submit(&batch.entries, batch.token.as_deref())
            .await
        {
            Ok(()) => {
                debug!("LOGS | Delivered {} entries", count);
                FlushOutcome::Delivered(count)
            }
            Err(error) => {
                match &error {
                    DeliveryError::Unauthorized => {
                        warn!(
                            "LOGS | Failed to send logs: Unauthorized, dropping {} entries and re-authenticating",
                            count
                        );
                        if let Some(stale) = batch.token.as_deref() {
                            self.session.invalidate_token(stale);
                        }
                        self.spawn_reauth();
                    }
                    DeliveryError::Rejected { status, reason } => {
                        warn!(
                            "LOGS | Failed to send logs ({}): {}, dropping {} entries",
                            status, reason, count
                        );
                    }
                    DeliveryError::Transport(e) => {
                        error!(
                            "LOGS | Network error sending logs, dropping {} entries: {}",
                            count, e
                        );
                    }
                }
                FlushOutcome::Dropped { count, error }
            }
        }
    }

    /// Runs a whole flush attempt to completion.
    pub async fn flush(&self) -> FlushOutcome {
        match self.begin() {
            Ok(batch) => self.deliver(batch).await,
            Err(reason) => FlushOutcome::Skipped(reason),
        }
    }

    /// Re-runs the auth handshake in the background.
    ///
    /// The triggering flush does not wait for it; a flush that starts before
    /// it completes is skipped as `AwaitingToken`.
    pub fn spawn_reauth(&self) {
        if !self.session.has_password() {
            return;
        }
        let session = Arc::clone(&self.session);
        let client = self.client.clone();
        tokio::spawn(async move {
            session.authenticate(&client).await;
        });
    }
}
