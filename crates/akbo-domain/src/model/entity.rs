//! Entity - Identity, versioning, archiving and an event queue
//!
//! An Entity keeps its identity through every change. Aggregates put their
//! own fields in `T` and reuse the lifecycle here.
//!
//! Every operation leaves the receiver untouched and hands back a new
//! entity, so a value you hold never changes under you.

use std::any::{type_name, TypeId};
use std::hash::{Hash, Hasher};

use uuid::Uuid;

use super::domain_event::DomainEvent;
use super::timestamp::Timestamp;
use crate::error::{DomainError, DomainResult};

/// Stored representation used to rebuild an entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntityParts<T> {
    pub id: Uuid,
    pub version: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub archived_at: Option<Timestamp>,
    pub state: T,
}

/// Entity with state `T` and queued events `E`
#[derive(Clone)]
pub struct Entity<T, E> {
    /// Unique identifier (Entity identity)
    id: Uuid,
    /// Optimistic-lock counter, bumped on every change
    version: u64,
    created_at: Timestamp,
    updated_at: Timestamp,
    /// Soft-delete marker
    archived_at: Option<Timestamp>,
    state: T,
    /// Domain events not yet handed to the outbox
    events: Vec<E>,
}

impl<T, E> Entity<T, E> {
    /// Create a new entity at `now`
    pub fn create(now: Timestamp, state: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            version: 0,
            created_at: now,
            updated_at: now,
            archived_at: None,
            state,
            events: Vec::new(),
        }
    }

    /// Rebuild an entity from storage.
    ///
    /// `updated_at` earlier than `created_at` is aligned to `created_at`.
    pub fn rehydrate(parts: EntityParts<T>) -> Self {
        let updated_at = parts.updated_at.max(parts.created_at);
        Self {
            id: parts.id,
            version: parts.version,
            created_at: parts.created_at,
            updated_at,
            archived_at: parts.archived_at,
            state: parts.state,
            events: Vec::new(),
        }
    }

    // ========== Getters ==========

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn archived_at(&self) -> Option<Timestamp> {
        self.archived_at
    }

    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    pub fn state(&self) -> &T {
        &self.state
    }

    /// Look at queued events without draining them
    pub fn peek_events(&self) -> &[E] {
        &self.events
    }

    /// Short type name of the state, used as the aggregate type of events
    pub fn aggregate_type() -> &'static str {
        let full = type_name::<T>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// Same concrete entity type and same id
    pub fn is_same_entity<U: 'static, F: 'static>(&self, other: &Entity<U, F>) -> bool
    where
        T: 'static,
        E: 'static,
    {
        TypeId::of::<Self>() == TypeId::of::<Entity<U, F>>() && self.id == other.id
    }
}

impl<T: Clone, E: Clone> Entity<T, E> {
    /// Apply `change` to a copy of the state.
    ///
    /// Fails with `TimestampOrder` when `now` is before `updated_at`.
    pub fn update<F>(&self, now: Timestamp, change: F) -> DomainResult<Self>
    where
        F: FnOnce(&mut T),
    {
        self.ensure_not_before_update(now)?;
        let mut next = self.bumped(now);
        change(&mut next.state);
        Ok(next)
    }

    /// Archive (soft delete) at `now`
    pub fn archive(&self, now: Timestamp) -> DomainResult<Self> {
        self.ensure_not_before_update(now)?;
        let mut next = self.bumped(now);
        next.archived_at = Some(now);
        Ok(next)
    }

    /// Clear the archive marker.
    ///
    /// Unlike `update` and `archive`, `now` is not checked against
    /// `updated_at`.
    pub fn unarchive(&self, now: Timestamp) -> Self {
        let mut next = self.bumped(now);
        next.archived_at = None;
        next
    }

    /// Queue an event; `updated_at` moves to the event's time, even backwards
    pub fn add_event(&self, event: E) -> Self
    where
        E: DomainEvent,
    {
        let mut next = self.bumped(event.occurred_at());
        next.events.push(event);
        next
    }

    /// Hand out queued events together with an entity whose queue is empty
    pub fn drain_events(&self) -> (Vec<E>, Self) {
        let mut next = self.clone();
        let events = std::mem::take(&mut next.events);
        (events, next)
    }

    fn ensure_not_before_update(&self, now: Timestamp) -> DomainResult<()> {
        if now < self.updated_at {
            return Err(DomainError::order("updated_at", "now"));
        }
        Ok(())
    }

    /// Copy with the version bumped; `updated_at` never drops below `created_at`
    fn bumped(&self, updated_at: Timestamp) -> Self {
        let mut next = self.clone();
        next.updated_at = updated_at.max(self.created_at);
        next.version += 1;
        next
    }
}

impl<T: core::fmt::Debug, E> core::fmt::Debug for Entity<T, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("version", &self.version)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("archived_at", &self.archived_at)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<T, E> PartialEq for Entity<T, E> {
    fn eq(&self, other: &Self) -> bool {
        // Entity equality: same ID = same entity
        self.id == other.id
    }
}

impl<T, E> Eq for Entity<T, E> {}

impl<T, E> Hash for Entity<T, E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        type_name::<T>().hash(state);
        self.id.hash(state);
    }
}
