// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use reqwest::StatusCode;

/// Errors a caller can observe when building a logger.
///
/// Everything that happens after construction is reported through `tracing`
/// diagnostics instead, so `log()` never fails.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Failure of the `/api/auth` handshake. Either variant disables the session.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("auth rejected ({status}): {reason}")]
    Rejected { status: StatusCode, reason: String },

    #[error("transport fault during auth: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Failure of a `/api/log` submission. The batch is dropped in every case.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("submission unauthorized, token invalid or expired")]
    Unauthorized,

    #[error("submission rejected ({status}): {reason}")]
    Rejected { status: StatusCode, reason: String },

    #[error("transport fault during submission: {0}")]
    Transport(#[from] reqwest::Error),
}
