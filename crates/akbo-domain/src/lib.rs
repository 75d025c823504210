//! # Akbo Domain Layer
//!
//! The shared DDD kernel every akbo bounded context builds on.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Domain Layer (This Crate)                     │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │  model/     - Entity, ValueObject, DomainEvent, Timestamp   ││
//! │  │  repository/- Trait definitions (not implementations)       ││
//! │  │  error      - DomainError                                   ││
//! │  └─────────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Time
//!
//! The kernel never reads the clock. Every operation that moves time
//! forward takes `now` from the caller, and every instant is
//! timezone-aware.

pub mod error;
pub mod model;
pub mod repository;

// Re-export commonly used types
pub use error::{DomainError, DomainResult};

pub use model::{
    domain_event::{DomainEvent, Event, EventPayload, OutboxEvent, OutboxRecord},
    entity::{Entity, EntityParts},
    timestamp::Timestamp,
    value_object::{SingleValueObject, SingleValueRule, ValueObject},
};

pub use repository::outbox_repository::{OutboxRepository, RepositoryError};
