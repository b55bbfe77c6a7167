// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! # Remote Logger
//!
//! Client-side log shipping: entries are buffered in memory, the process
//! authenticates once against the ingest service, and batches are posted
//! when the buffer fills up or the flush interval elapses.
//!
//! ## Pipeline
//!
//! ```text
//!   log() ──> BatchBuffer ──(size or timer)──> Flusher ──> POST /api/log
//!                                                 │
//!                                           AuthSession ──> POST /api/auth
//! ```
//!
//! - [`entry`]: the immutable log record
//! - [`session`]: bearer-token lifecycle and the terminal disabled state
//! - [`buffer`]: ordered queue and flush triggers
//! - [`flusher`]: one flush attempt, from gating to response handling
//! - [`logger`]: the public [`RemoteLogger`] façade
//! - [`capture`]: a `tracing` layer that feeds application events in
//!
//! Delivery is best effort and at most once. Nothing that goes wrong after
//! construction is returned to the caller; failures are reported through
//! `tracing` diagnostics.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod buffer;
pub mod capture;
pub mod config;
pub mod entry;
pub mod errors;
pub mod flusher;
pub mod http;
pub mod intake;
pub mod logger;
pub mod session;

pub use capture::RemoteLoggerLayer;
pub use config::RemoteLoggerConfig;
pub use entry::{LogEntry, LogLevel};
pub use errors::LoggerError;
pub use flusher::{FlushOutcome, SkipReason};
pub use logger::RemoteLogger;
pub use session::SessionState;
