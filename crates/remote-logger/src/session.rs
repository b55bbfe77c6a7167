// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Bearer-token lifecycle for one logger.
//!
//! ```text
//!   password absent ──> Anonymous
//!   password present ─> Authenticating ──ok──> Authenticated
//!                              ^                    │ 401 on submit
//!                              └────────────────────┘
//!   any auth rejection or transport fault ──> Disabled (terminal)
//! ```

use crate::config::RemoteLoggerConfig;
use crate::errors::AuthError;
use crate::intake::IngestClient;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, warn};

/// Externally visible state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No password configured, batches go out without a credential.
    Anonymous,
    /// Password configured, no token held yet (first auth or reauth pending).
    Authenticating,
    Authenticated,
    /// Terminal, no further network activity.
    Disabled,
}

#[derive(Debug, Default)]
struct TokenState {
    token: Option<String>,
    disabled: bool,
}

#[derive(Debug)]
pub struct AuthSession {
    package_name: String,
    password: Option<String>,
    is_new_account: bool,
    state: Mutex<TokenState>,
}

impl AuthSession {
    #[must_use]
    pub fn new(config: &RemoteLoggerConfig) -> Self {
        AuthSession {
            package_name: config.package_name.clone(),
            password: config.password.clone(),
            is_new_account: config.is_new_account,
            state: Mutex::new(TokenState::default()),
        }
    }

    // Guards are never held across an await, so a poisoned lock only means a
    // panic elsewhere and the flags are still consistent.
    fn lock(&self) -> MutexGuard<'_, TokenState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    #[must_use]
    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.lock().disabled
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        let state = self.lock();
        if state.disabled {
            SessionState::Disabled
        } else if self.password.is_none() {
            SessionState::Anonymous
        } else if state.token.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Authenticating
        }
    }

    /// Drops `stale` after the ingest service refused it.
    ///
    /// A token obtained by a reauth that finished in the meantime is kept.
    pub fn invalidate_token(&self, stale: &str) {
        let mut state = self.lock();
        if state.token.as_deref() == Some(stale) {
            state.token = None;
        }
    }

    fn disable(&self) {
        let mut state = self.lock();
        state.disabled = true;
        state.token = None;
    }

    /// Runs one auth handshake and records its outcome.
    ///
    /// Failures never reach the caller as errors: a rejection or a transport
    /// fault both disable the session for good and are reported as
    /// diagnostics. Without a password this is a no-op.
    pub async fn authenticate(&self, client: &IngestClient) -> SessionState {
        let Some(password) = self.password.as_deref() else {
            return self.state();
        };
        if self.is_disabled() {
            return SessionState::Disabled;
        }

        debug!("LOGS | Authenticating package {}", self.package_name);
        match client
            .authenticate(&self.package_name, password, self.is_new_account)
            .await
        {
            Ok(token) => {
                let mut state = self.lock();
                if !state.disabled {
                    state.token = Some(token);
                    debug!("LOGS | Connected & authenticated");
                }
            }
            Err(AuthError::Rejected { status, reason }) => {
                warn!("LOGS | Auth failed ({}): {}", status, reason);
                self.disable();
            }
            Err(e @ AuthError::Transport(_)) => {
                error!("LOGS | Connection error: {}", e);
                self.disable();
            }
        }
        self.state()
    }
}
