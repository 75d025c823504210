//! Record Events - Move an entity's queued events into the outbox

use akbo_domain::{DomainError, Entity, OutboxEvent, OutboxRepository, RepositoryError};
use thiserror::Error;
use tracing::debug;

/// Errors from recording events
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Writes drained domain events to an outbox
#[derive(Debug)]
pub struct EventRecorder<R> {
    outbox: R,
}

impl<R: OutboxRepository> EventRecorder<R> {
    pub fn new(outbox: R) -> Self {
        Self { outbox }
    }

    pub fn outbox(&self) -> &R {
        &self.outbox
    }

    /// Store every queued event of `entity` and return it with an empty queue.
    ///
    /// Nothing is stored if any event fails to serialize.
    pub fn record<T, E>(&mut self, entity: &Entity<T, E>) -> Result<Entity<T, E>, RecordError>
    where
        T: Clone,
        E: OutboxEvent + Clone,
    {
        let records = entity
            .peek_events()
            .iter()
            .map(|event| event.to_outbox_record())
            .collect::<Result<Vec<_>, _>>()?;

        let recorded = records.len();
        if recorded > 0 {
            self.outbox.append(records)?;
        }

        let (_, drained) = entity.drain_events();
        debug!(entity_id = %entity.id(), recorded, "Recorded domain events");
        Ok(drained)
    }
}
