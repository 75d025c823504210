//! Domain Events - Facts that happened to an aggregate
//!
//! [`DomainEvent`] is the minimum an entity needs to queue an event.
//! [`Event`] is the ready-made implementation: aggregate metadata, a typed
//! payload, and the outbox record used for publishing and logging.
//!
//! Events never read the clock; `occurred_at` is always supplied.

use std::any::type_name;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::entity::Entity;
use super::timestamp::Timestamp;
use crate::error::{DomainError, DomainResult};

/// Minimum contract for anything an entity can queue
pub trait DomainEvent {
    fn id(&self) -> Uuid;
    fn occurred_at(&self) -> Timestamp;
}

/// Events that can be written to the outbox
pub trait OutboxEvent: DomainEvent {
    fn to_outbox_record(&self) -> DomainResult<OutboxRecord>;
}

/// Body of an [`Event`]
///
/// Set `TYPE` to pin the event type string. Without it the fully qualified
/// Rust path of the payload type is used.
pub trait EventPayload: Serialize {
    const TYPE: Option<&'static str> = None;

    fn event_type() -> &'static str {
        Self::TYPE.unwrap_or_else(type_name::<Self>)
    }
}

/// Standard record stored in the outbox / event log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxRecord {
    /// Event id
    pub id: String,
    /// Event type string
    #[serde(rename = "type")]
    pub event_type: String,
    /// ISO-8601 with offset
    pub occurred_at: String,
    /// Everything except `id` and `occurred_at`
    pub payload: Map<String, Value>,
}

/// Domain event with optional aggregate metadata and payload `P`
#[derive(Debug, Clone, PartialEq)]
pub struct Event<P> {
    id: Uuid,
    occurred_at: Timestamp,
    aggregate_id: Option<Uuid>,
    aggregate_type: Option<String>,
    version: Option<u64>,
    data: P,
}

#[derive(Serialize)]
struct PayloadView<'a, P> {
    aggregate_id: Option<Uuid>,
    aggregate_type: Option<&'a str>,
    version: Option<u64>,
    #[serde(flatten)]
    data: &'a P,
}

impl<P> Event<P> {
    /// Create an event with a fresh id
    pub fn new(occurred_at: Timestamp, data: P) -> Self {
        Self {
            id: Uuid::new_v4(),
            occurred_at,
            aggregate_id: None,
            aggregate_type: None,
            version: None,
            data,
        }
    }

    /// Create an event about `entity`.
    ///
    /// `version` is the one the entity reaches once the event is added.
    pub fn for_entity<T, E>(entity: &Entity<T, E>, occurred_at: Timestamp, data: P) -> Self {
        Self::new(occurred_at, data)
            .with_aggregate(entity.id(), Entity::<T, E>::aggregate_type())
            .with_version(entity.version() + 1)
    }

    /// Builder: use a specific id (e.g. uuid v7 from the caller)
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Builder: set aggregate id and type
    pub fn with_aggregate(mut self, id: Uuid, aggregate_type: impl Into<String>) -> Self {
        self.aggregate_id = Some(id);
        self.aggregate_type = Some(aggregate_type.into());
        self
    }

    /// Builder: set aggregate version
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }

    // ========== Getters ==========

    pub fn aggregate_id(&self) -> Option<Uuid> {
        self.aggregate_id
    }

    pub fn aggregate_type(&self) -> Option<&str> {
        self.aggregate_type.as_deref()
    }

    pub fn version(&self) -> Option<u64> {
        self.version
    }

    pub fn data(&self) -> &P {
        &self.data
    }
}

impl<P: EventPayload> Event<P> {
    pub fn event_type(&self) -> &'static str {
        P::event_type()
    }

    /// Serializable body: aggregate metadata plus the payload fields
    pub fn payload(&self) -> DomainResult<Map<String, Value>> {
        let view = PayloadView {
            aggregate_id: self.aggregate_id,
            aggregate_type: self.aggregate_type.as_deref(),
            version: self.version,
            data: &self.data,
        };

        match serde_json::to_value(view)? {
            Value::Object(map) => Ok(map),
            other => Err(DomainError::Serialization(format!(
                "event payload must serialize to an object, got {}",
                other
            ))),
        }
    }

    pub fn to_outbox_record(&self) -> DomainResult<OutboxRecord> {
        Ok(OutboxRecord {
            id: self.id.to_string(),
            event_type: self.event_type().to_string(),
            occurred_at: self.occurred_at.to_iso8601(),
            payload: self.payload()?,
        })
    }
}

impl<P> DomainEvent for Event<P> {
    fn id(&self) -> Uuid {
        self.id
    }

    fn occurred_at(&self) -> Timestamp {
        self.occurred_at
    }
}

impl<P: EventPayload> OutboxEvent for Event<P> {
    fn to_outbox_record(&self) -> DomainResult<OutboxRecord> {
        Event::to_outbox_record(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    #[derive(Debug, Clone, Serialize)]
    struct ScoreCreated {
        points: u32,
    }

    impl EventPayload for ScoreCreated {
        const TYPE: Option<&'static str> = Some("score.created");
    }

    #[derive(Debug, Clone, Serialize)]
    struct Untyped {}

    impl EventPayload for Untyped {}

    #[derive(Debug, Clone)]
    struct Score;

    fn t0() -> Timestamp {
        FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .unwrap()
            .into()
    }

    #[test]
    fn test_event_type_uses_type_if_defined() {
        let e = Event::new(t0(), ScoreCreated { points: 3 });
        assert_eq!(e.event_type(), "score.created");
    }

    #[test]
    fn test_event_type_falls_back_to_type_path() {
        let e = Event::new(t0(), Untyped {});
        assert!(e.event_type().contains("::"));
        assert!(e.event_type().ends_with("Untyped"));
    }

    #[test]
    fn test_payload_excludes_id_and_occurred_at() {
        let e = Event::new(t0(), ScoreCreated { points: 3 }).with_version(2);
        let p = e.payload().unwrap();

        assert!(!p.contains_key("id"));
        assert!(!p.contains_key("occurred_at"));
        assert_eq!(p["points"], 3);
        assert_eq!(p["version"], 2);
        assert_eq!(p["aggregate_id"], Value::Null);
    }

    #[test]
    fn test_empty_payload_carries_metadata_only() {
        let p = Event::new(t0(), Untyped {}).payload().unwrap();
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn test_to_outbox_record_shape() {
        let e = Event::new(t0(), ScoreCreated { points: 1 });
        let rec = e.to_outbox_record().unwrap();

        assert_eq!(rec.id, e.id().to_string());
        assert_eq!(rec.event_type, "score.created");
        assert_eq!(rec.occurred_at, "2025-01-01T00:00:00+09:00");

        let json = serde_json::to_value(&rec).unwrap();
        for key in ["id", "type", "occurred_at", "payload"] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_for_entity_fills_aggregate_metadata() {
        let score: Entity<Score, Event<ScoreCreated>> = Entity::create(t0(), Score);
        let e = Event::for_entity(&score, t0(), ScoreCreated { points: 5 });

        assert_eq!(e.aggregate_id(), Some(score.id()));
        assert_eq!(e.aggregate_type(), Some("Score"));
        assert_eq!(e.version(), Some(1));

        let score = score.add_event(e);
        assert_eq!(score.version(), 1);
    }

    #[test]
    fn test_with_id_overrides_generated_id() {
        let id = Uuid::new_v4();
        let e = Event::new(t0(), Untyped {}).with_id(id);
        assert_eq!(DomainEvent::id(&e), id);
    }
}
