// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use remote_logger::{FlushOutcome, RemoteLogger, RemoteLoggerConfig, RemoteLoggerLayer};
use serde_json::json;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

const LATE_LOG_DELAY: Duration = Duration::from_secs(2);

#[tokio::main]
pub async fn main() {
    let config = match RemoteLoggerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Unable to configure remote logger: {e}");
            return;
        }
    };

    let logger = match RemoteLogger::new(config.clone()) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Unable to start remote logger: {e}");
            return;
        }
    };

    let env_filter = format!("h2=off,hyper=off,rustls=off,reqwest=off,{}", config.log_level);
    let filter = match EnvFilter::try_new(env_filter) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("could not parse log level in configuration: {e}");
            return;
        }
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_thread_names(false)
                .with_thread_ids(false)
                .with_line_number(false)
                .with_file(false)
                .with_target(true)
                .without_time(),
        )
        .with(RemoteLoggerLayer::new(logger.clone()));

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {e}");
        return;
    }

    let outcome = run_demo(&logger, LATE_LOG_DELAY).await;
    // Written outside tracing: the capture layer would buffer it after the final flush.
    eprintln!("Remote logger finished: {outcome:?} (session {:?})", logger.state());
}

async fn run_demo(logger: &RemoteLogger, late_log_delay: Duration) -> FlushOutcome {
    info!("Hello from Remote Logger Demo!");
    warn!(code = 123, "This is a warning message");
    error!(error = "Unknown failed", "Something went wrong!");
    logger.info(
        "Complex object",
        Some(json!({
            "user": { "id": 1, "name": "Test" },
            "action": "login",
        })),
    );

    sleep(late_log_delay).await;
    info!("Async log after 2 seconds");

    logger.shutdown().await
}
