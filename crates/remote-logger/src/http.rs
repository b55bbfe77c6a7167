// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! HTTP client construction for the ingest service.
//!
//! A misconfigured proxy must not take logging down with it, so a client
//! that cannot be built with the proxy falls back to a direct one.

use crate::config::RemoteLoggerConfig;
use std::error::Error;
use std::time::Duration;
use tracing::error;

/// Creates the client used for both auth and log submission.
#[must_use]
pub fn get_client(config: &RemoteLoggerConfig) -> reqwest::Client {
    match build_client(config, true) {
        Ok(client) => client,
        Err(e) => {
            error!(
                "LOGS | Unable to parse proxy configuration: {}, falling back to direct connection",
                e
            );
            match build_client(config, false) {
                Ok(client) => client,
                Err(inner) => {
                    error!(
                        "LOGS | Failed to build HTTP client without proxy: {}, using reqwest defaults",
                        inner
                    );
                    reqwest::Client::new()
                }
            }
        }
    }
}

fn build_client(
    config: &RemoteLoggerConfig,
    allow_proxy: bool,
) -> Result<reqwest::Client, Box<dyn Error>> {
    let mut builder = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .tcp_keepalive(Some(Duration::from_secs(120)));

    if allow_proxy {
        if let Some(https_uri) = &config.https_proxy {
            builder = builder.proxy(reqwest::Proxy::https(https_uri)?);
        }
    }

    Ok(builder.build()?)
}
