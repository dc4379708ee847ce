//! Tracing layer that forwards composer events to the REPL.
//!
//! Every event that passes the layer's filter is copied into an
//! [`ActivityEvent`] and sent over an unbounded channel. The REPL drains the
//! channel into a bounded buffer after every command.

use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// One captured tracing event.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ActivityEvent {
    /// Event target, e.g. `composer::tools::auth`
    pub target: String,
    pub level: String,
    pub message: String,
    /// Structured fields other than `message`
    pub fields: BTreeMap<String, Value>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

pub struct ActivityLayer {
    sender: mpsc::UnboundedSender<ActivityEvent>,
}

impl ActivityLayer {
    pub fn new(sender: mpsc::UnboundedSender<ActivityEvent>) -> Self {
        Self { sender }
    }
}

impl<S> Layer<S> for ActivityLayer
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = BTreeMap::new();
        event.record(&mut FieldVisitor(&mut fields));

        let message = match fields.remove("message") {
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => String::new(),
        };

        // Fails only once the REPL has dropped the receiver.
        let _ = self.sender.send(ActivityEvent {
            target: event.metadata().target().to_string(),
            level: event.metadata().level().to_string(),
            message,
            fields,
            timestamp: chrono::Utc::now(),
        });
    }
}

/// Field visitor that extracts tracing event fields into a map
struct FieldVisitor<'a>(&'a mut BTreeMap<String, Value>);

impl tracing::field::Visit for FieldVisitor<'_> {
    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(
            field.name().to_string(),
            serde_json::json!(format!("{:?}", value)),
        );
    }
}
