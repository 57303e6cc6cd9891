//! Error-log spy.
//!
//! While installed as the thread's default subscriber, the spy swallows every
//! `tracing` event and records the message of each ERROR-level one, so tests
//! can assert on error logging without printing anything.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Records ERROR-level events.
#[derive(Debug, Clone, Default)]
pub struct ErrorSpy {
    calls: Arc<Mutex<Vec<String>>>,
}

impl ErrorSpy {
    /// Creates a spy with no recorded calls.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the spy the current thread's default subscriber until the guard drops.
    ///
    /// Only events emitted on this thread are recorded. Errors logged from
    /// other threads, such as the workers of a multi-threaded tokio runtime,
    /// go to the global subscriber instead.
    #[must_use]
    pub fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::set_default(subscriber)
    }

    /// Returns the recorded error messages, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Returns the number of recorded errors.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns true if any recorded error message contains `needle`.
    #[must_use]
    pub fn was_called_with(&self, needle: &str) -> bool {
        self.calls.lock().iter().any(|m| m.contains(needle))
    }

    /// Forgets the recorded calls.
    pub fn reset(&self) {
        self.calls.lock().clear();
    }
}

impl<S: Subscriber> Layer<S> for ErrorSpy {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != Level::ERROR {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.calls.lock().push(visitor.finish());
    }
}

/// Collects the `message` field, falling back to the other fields.
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn finish(self) -> String {
        self.message.unwrap_or_else(|| self.fields.join(" "))
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}
