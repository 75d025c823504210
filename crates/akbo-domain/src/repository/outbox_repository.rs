//! Outbox Repository - Abstract persistence for outgoing events
//!
//! Entities hand their drained events to the outbox; a relay later publishes
//! the pending records and marks them as published.

use thiserror::Error;

use crate::model::domain_event::OutboxRecord;

/// Errors that can occur during repository operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// A record with the same id is already stored
    #[error("Outbox record already exists: {id}")]
    Duplicate { id: String },
    /// Failed to persist
    #[error("Persistence error: {message}")]
    PersistenceError { message: String },
}

/// Outbox Repository Trait
///
/// This is a PORT in hexagonal architecture.
/// Note: No async here - that's an implementation detail.
pub trait OutboxRepository {
    /// Append records in order. Either all are stored or none.
    fn append(&mut self, records: Vec<OutboxRecord>) -> Result<(), RepositoryError>;

    /// Records not yet published, oldest first
    fn pending(&self) -> Result<Vec<OutboxRecord>, RepositoryError>;

    /// Mark records as published; unknown ids are ignored.
    /// Returns how many records changed state.
    fn mark_published(&mut self, ids: &[String]) -> Result<usize, RepositoryError>;

    /// Count all records (pending and published)
    fn count(&self) -> Result<usize, RepositoryError>;

    /// Count pending records
    fn count_pending(&self) -> Result<usize, RepositoryError> {
        Ok(self.pending()?.len())
    }
}
