//! Event types and broadcast bus
//!
//! Every mutation of a frequency emits a CadenceEvent: user-triggered writes
//! from the service layer and sweep-triggered transitions alike. Subscribers
//! (currently the SSE endpoint) receive events over a tokio broadcast
//! channel; emission is lossy, so a slow or absent subscriber never blocks a
//! writer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Cadence event types
///
/// Events are broadcast via EventBus and can be serialized for SSE
/// transmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CadenceEvent {
    /// A frequency was created by a user request
    FrequencyCreated {
        frequency_id: i64,
        timestamp: DateTime<Utc>,
    },

    /// A phrase was appended to a frequency by a user request
    PhraseAppended {
        frequency_id: i64,
        phrase_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// The sweep marked a frequency completed (terminal)
    FrequencyCompleted {
        frequency_id: i64,
        timestamp: DateTime<Utc>,
    },

    /// The sweep blanked the text of a frequency's latest phrase
    PhrasePruned {
        frequency_id: i64,
        phrase_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// The sweep found a stale frequency with no phrases to prune
    PruneSkippedEmpty {
        frequency_id: i64,
        timestamp: DateTime<Utc>,
    },
}

impl CadenceEvent {
    /// Event type name used as the SSE event field
    pub fn event_type(&self) -> &'static str {
        match self {
            CadenceEvent::FrequencyCreated { .. } => "FrequencyCreated",
            CadenceEvent::PhraseAppended { .. } => "PhraseAppended",
            CadenceEvent::FrequencyCompleted { .. } => "FrequencyCompleted",
            CadenceEvent::PhrasePruned { .. } => "PhrasePruned",
            CadenceEvent::PruneSkippedEmpty { .. } => "PruneSkippedEmpty",
        }
    }

    /// Identifier of the frequency this event concerns
    pub fn frequency_id(&self) -> i64 {
        match self {
            CadenceEvent::FrequencyCreated { frequency_id, .. }
            | CadenceEvent::PhraseAppended { frequency_id, .. }
            | CadenceEvent::FrequencyCompleted { frequency_id, .. }
            | CadenceEvent::PhrasePruned { frequency_id, .. }
            | CadenceEvent::PruneSkippedEmpty { frequency_id, .. } => *frequency_id,
        }
    }
}

/// Broadcast bus for CadenceEvents
pub struct EventBus {
    tx: broadcast::Sender<CadenceEvent>,
}

impl EventBus {
    /// Create a new EventBus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<CadenceEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: CadenceEvent) {
        let _ = self.tx.send(event);
    }

    /// Current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_emitted_event() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.emit_lossy(CadenceEvent::FrequencyCompleted {
            frequency_id: 7,
            timestamp: Utc::now(),
        });

        let event = rx.try_recv().expect("event should be buffered");
        assert_eq!(event.event_type(), "FrequencyCompleted");
        assert_eq!(event.frequency_id(), 7);
    }

    #[test]
    fn test_emit_without_subscribers_is_ok() {
        let bus = EventBus::new(16);
        // Must not panic or error when nobody is listening
        bus.emit_lossy(CadenceEvent::FrequencyCreated {
            frequency_id: 1,
            timestamp: Utc::now(),
        });
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = CadenceEvent::PhrasePruned {
            frequency_id: 3,
            phrase_id: Uuid::new_v4(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "PhrasePruned");
        assert_eq!(json["frequency_id"], 3);
    }
}
