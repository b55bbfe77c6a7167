// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Forwards the application's own `tracing` events to a [`RemoteLogger`].
//!
//! Install [`RemoteLoggerLayer`] next to the usual fmt layer and every event
//! still reaches the console while a copy is shipped. The layer holds no
//! state besides the logger; each event turns into one `log()` call.
//!
//! Events from this crate and from the HTTP stack it drives are skipped so
//! delivering a batch never produces new entries for the buffer.

use crate::entry::LogLevel;
use crate::logger::RemoteLogger;
use serde_json::{Map, Value};
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

// Crates that log on every submission.
const TRANSPORT_TARGETS: [&str; 6] = ["h2", "hyper", "hyper_util", "reqwest", "rustls", "tokio_util"];

pub struct RemoteLoggerLayer {
    logger: RemoteLogger,
}

impl RemoteLoggerLayer {
    #[must_use]
    pub fn new(logger: RemoteLogger) -> Self {
        RemoteLoggerLayer { logger }
    }
}

fn level_for(level: &Level) -> LogLevel {
    match *level {
        Level::ERROR => LogLevel::Error,
        Level::WARN => LogLevel::Warn,
        Level::INFO => LogLevel::Info,
        _ => LogLevel::Debug,
    }
}

fn is_within(target: &str, module: &str) -> bool {
    target == module
        || target
            .strip_prefix(module)
            .is_some_and(|rest| rest.starts_with("::"))
}

fn is_ignored_target(target: &str) -> bool {
    is_within(target, OWN_TARGET)
        || TRANSPORT_TARGETS
            .iter()
            .any(|module| is_within(target, module))
}

/// Collects the `message` field and everything else as metadata.
#[derive(Default)]
struct EventFieldVisitor {
    message: Option<String>,
    fields: Map<String, Value>,
}

impl EventFieldVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name().to_string(), value);
    }

    fn into_parts(self) -> (String, Option<Value>) {
        let meta = if self.fields.is_empty() {
            None
        } else {
            Some(Value::Object(self.fields))
        };
        (self.message.unwrap_or_default(), meta)
    }
}

impl Visit for EventFieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.insert(field, Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::Number(value.into()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::Number(value.into()));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::Bool(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if let Some(n) = serde_json::Number::from_f64(value) {
            self.insert(field, Value::Number(n));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.insert(field, Value::String(format!("{value:?}")));
        }
    }
}

impl<S> Layer<S> for RemoteLoggerLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_ignored_target(metadata.target()) {
            return;
        }

        let mut visitor = EventFieldVisitor::default();
        event.record(&mut visitor);
        let (message, meta) = visitor.into_parts();
        self.logger.log(level_for(metadata.level()), message, meta);
    }
}
