// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Ordered entry queue and the flush-trigger policy.
//!
//! The buffer decides *when* a flush should happen but never performs one:
//! [`BatchBuffer::append`] tells the caller whether to flush right away or
//! to arm the flush timer, and the caller owns the actual task.
//!
//! # Triggers
//!
//! - **Size**: the append that brings the queue to `buffer_size` entries asks
//!   for an immediate flush.
//! - **Time**: the first append into a queue with no pending timer arms one.
//!   At most one timer is pending at a time.
//!
//! # Memory
//!
//! Flushes are skipped while an authenticated session waits for its token,
//! so the queue can grow past `buffer_size`. With `max_entries` set, the
//! oldest entry is evicted once the cap is reached.

use crate::entry::LogEntry;
use std::collections::VecDeque;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// What the caller must do after an append.
#[derive(Debug)]
pub enum AppendOutcome {
    /// Size threshold reached, flush synchronously.
    FlushNow,
    /// No timer was pending; spawn one that fires after the flush interval
    /// unless this token is cancelled first.
    ScheduleTimer(CancellationToken),
    /// A timer is already pending.
    Buffered,
}

#[derive(Debug)]
pub struct BatchBuffer {
    entries: VecDeque<LogEntry>,
    buffer_size: usize,
    max_entries: Option<usize>,
    timer: Option<CancellationToken>,
}

impl BatchBuffer {
    #[must_use]
    pub fn new(buffer_size: usize, max_entries: Option<usize>) -> Self {
        BatchBuffer {
            entries: VecDeque::new(),
            buffer_size: buffer_size.max(1),
            max_entries,
            timer: None,
        }
    }

    pub fn append(&mut self, entry: LogEntry) -> AppendOutcome {
        if let Some(max) = self.max_entries {
            if self.entries.len() >= max {
                self.entries.pop_front();
                warn!(
                    "LOGS | Buffer full ({} entries), dropping oldest entry",
                    max
                );
            }
        }
        self.entries.push_back(entry);

        if self.entries.len() >= self.buffer_size {
            AppendOutcome::FlushNow
        } else if self.timer.is_none() {
            let timer = CancellationToken::new();
            self.timer = Some(timer.clone());
            AppendOutcome::ScheduleTimer(timer)
        } else {
            AppendOutcome::Buffered
        }
    }

    /// Takes every queued entry in arrival order and cancels the pending timer.
    ///
    /// An empty buffer is left untouched, timer included.
    pub fn drain_for_flush(&mut self) -> Vec<LogEntry> {
        if self.entries.is_empty() {
            return Vec::new();
        }
        self.cancel_timer();
        Vec::from(std::mem::take(&mut self.entries))
    }

    /// Releases the timer slot once `timer` has elapsed.
    ///
    /// A cancelled token was already removed by a drain and may have been
    /// replaced by a newer timer, so it is ignored here.
    pub fn timer_fired(&mut self, timer: &CancellationToken) {
        if !timer.is_cancelled() {
            self.timer = None;
        }
    }

    pub fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    #[must_use]
    pub fn is_timer_pending(&self) -> bool {
        self.timer.is_some()
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
