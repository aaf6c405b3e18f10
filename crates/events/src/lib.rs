#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for async communication in modhost
//!
//! Library crates never log or print directly. They emit domain events over
//! an unbounded channel and the CLI turns them into tracing records.

pub mod meta;
pub use meta::{EventLevel, EventMeta, EventSource};

pub mod events;
pub use events::{
    AppEvent, DownloadEvent, FailureContext, GeneralEvent, HostEvent, InstallEvent,
    ResolverEvent, UninstallEvent,
};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Event plus the metadata captured when it was emitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub meta: EventMeta,
    pub event: AppEvent,
}

impl EventMessage {
    #[must_use]
    pub fn new(meta: EventMeta, event: AppEvent) -> Self {
        Self { meta, event }
    }

    /// Wrap an event with metadata derived from its domain and severity
    #[must_use]
    pub fn from_event(event: AppEvent) -> Self {
        let meta = EventMeta::new(event.log_level(), event.event_source());
        Self { meta, event }
    }
}

pub type EventSender = UnboundedSender<EventMessage>;

pub type EventReceiver = UnboundedReceiver<EventMessage>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events
///
/// Implemented by anything that may carry a sender. Emission is a no-op when
/// there is no sender or the receiver has gone away.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    fn emit(&self, event: AppEvent) {
        self.emit_message(EventMessage::from_event(event));
    }

    /// Emit an event tagged with a correlation id
    fn emit_correlated(&self, correlation_id: impl Into<String>, event: AppEvent) {
        let mut message = EventMessage::from_event(event);
        message.meta = message.meta.with_correlation_id(correlation_id);
        self.emit_message(message);
    }

    fn emit_message(&self, message: EventMessage) {
        if let Some(sender) = self.event_sender() {
            // Receiver may be gone during shutdown
            let _ = sender.send(message);
        }
    }

    fn emit_debug(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::debug(message)));
    }

    fn emit_warning(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning(message)));
    }

    fn emit_warning_with_context(&self, message: impl Into<String>, context: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning_with_context(
            message, context,
        )));
    }

    fn emit_error(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::error(message)));
    }

    fn emit_operation_started(&self, operation: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationStarted {
            operation: operation.into(),
        }));
    }

    fn emit_operation_completed(&self, operation: impl Into<String>, success: bool) {
        self.emit(AppEvent::General(GeneralEvent::OperationCompleted {
            operation: operation.into(),
            success,
        }));
    }

    fn emit_operation_failed(&self, operation: impl Into<String>, error: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationFailed {
            operation: operation.into(),
            error: error.into(),
        }));
    }
}

impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

impl EventEmitter for Option<EventSender> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modhost_errors::StateError;

    #[tokio::test]
    async fn emitted_events_carry_domain_metadata() {
        let (tx, mut rx) = channel();
        tx.emit(AppEvent::Install(InstallEvent::ArtifactSkipped {
            version_id: "v1".into(),
            reason: "timed out".into(),
        }));

        let message = rx.recv().await.unwrap();
        assert_eq!(message.meta.source, EventSource::Install);
        assert_eq!(message.meta.level, EventLevel::Warn);
        assert!(message.meta.correlation_id.is_none());
    }

    #[tokio::test]
    async fn correlated_events_keep_their_id() {
        let (tx, mut rx) = channel();
        tx.emit_correlated(
            "root-1",
            AppEvent::Resolver(ResolverEvent::KnownDependency {
                root_id: "root-1".into(),
                project_id: "P".into(),
            }),
        );

        let message = rx.recv().await.unwrap();
        assert_eq!(message.meta.correlation_id.as_deref(), Some("root-1"));
        assert_eq!(message.meta.tracing_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn emitting_without_receiver_is_silent() {
        let (tx, rx) = channel();
        drop(rx);
        tx.emit_warning("nobody listening");

        let none: Option<EventSender> = None;
        none.emit_error("dropped");
    }

    #[test]
    fn failure_context_from_user_facing_error() {
        let err = StateError::PackageNotFound {
            version_id: "v9".into(),
            list: "installed".into(),
        };
        let failure = FailureContext::from_error(&err);
        assert_eq!(failure.code.as_deref(), Some("state.package_not_found"));
        assert!(!failure.retryable);
    }

    #[test]
    fn events_serialize_with_domain_tag() {
        let event = AppEvent::Host(HostEvent::CommandSent {
            command: "say hi".into(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["domain"], "host");
        assert_eq!(json["event"]["type"], "CommandSent");
    }
}
