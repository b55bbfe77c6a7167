// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Typed client for the two ingest endpoints.
//!
//! This layer only translates HTTP exchanges into results. It keeps no state
//! and never decides what a failure means for the session; that is left to
//! [`crate::session`] and [`crate::flusher`].

use crate::config::RemoteLoggerConfig;
use crate::entry::LogEntry;
use crate::errors::{AuthError, DeliveryError};
use crate::http::get_client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

pub const AUTH_PATH: &str = "/api/auth";
pub const LOG_PATH: &str = "/api/log";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthRequest<'a> {
    package_name: &'a str,
    password: &'a str,
    is_new_account: bool,
}

#[derive(Deserialize)]
struct AuthResponse {
    token: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LogBatch<'a> {
    logs: &'a [LogEntry],
    #[serde(skip_serializing_if = "Option::is_none")]
    table_name: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct IngestClient {
    client: reqwest::Client,
    auth_url: String,
    log_url: String,
    table_name: Option<String>,
}

impl IngestClient {
    #[must_use]
    pub fn new(config: &RemoteLoggerConfig) -> Self {
        let base_url = config.base_url();
        IngestClient {
            client: get_client(config),
            auth_url: format!("{base_url}{AUTH_PATH}"),
            log_url: format!("{base_url}{LOG_PATH}"),
            table_name: config.table_name.clone(),
        }
    }

    /// Exchanges credentials for a bearer token.
    pub async fn authenticate(
        &self,
        package_name: &str,
        password: &str,
        is_new_account: bool,
    ) -> Result<String, AuthError> {
        let resp = self
            .client
            .post(&self.auth_url)
            .json(&AuthRequest {
                package_name,
                password,
                is_new_account,
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            // The body is expected to be `{"error": "..."}`, but a missing or
            // malformed one must still count as a rejection.
            let reason = match resp.json::<ErrorResponse>().await {
                Ok(ErrorResponse { error: Some(error) }) => error,
                _ => canonical_reason(status),
            };
            return Err(AuthError::Rejected { status, reason });
        }

        let AuthResponse { token } = resp.json().await?;
        Ok(token)
    }

    /// Submits one batch. The bearer header is only attached when a token is given.
    pub async fn submit(
        &self,
        logs: &[LogEntry],
        token: Option<&str>,
    ) -> Result<(), DeliveryError> {
        let mut req = self.client.post(&self.log_url).json(&LogBatch {
            logs,
            table_name: self.table_name.as_deref(),
        });
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(DeliveryError::Unauthorized);
        }
        Err(DeliveryError::Rejected {
            status,
            reason: canonical_reason(status),
        })
    }
}

fn canonical_reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("unknown status")
        .to_string()
}
