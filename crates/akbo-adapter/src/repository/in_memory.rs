//! In-Memory Repository Implementations
//!
//! Simple in-memory implementations of repository traits.
//! Useful for testing and development.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use akbo_domain::model::domain_event::OutboxRecord;
use akbo_domain::repository::outbox_repository::{OutboxRepository, RepositoryError};

#[derive(Debug, Clone)]
struct StoredRecord {
    record: OutboxRecord,
    published: bool,
}

/// In-memory Outbox Repository
///
/// Thread-safe implementation using RwLock. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOutboxRepository {
    records: Arc<RwLock<Vec<StoredRecord>>>,
}

impl InMemoryOutboxRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

fn lock_error(kind: &str) -> RepositoryError {
    RepositoryError::PersistenceError {
        message: format!("Failed to acquire {} lock", kind),
    }
}

impl OutboxRepository for InMemoryOutboxRepository {
    fn append(&mut self, records: Vec<OutboxRecord>) -> Result<(), RepositoryError> {
        let mut stored = self.records.write().map_err(|_| lock_error("write"))?;

        let mut seen: HashSet<&str> = stored.iter().map(|s| s.record.id.as_str()).collect();
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                return Err(RepositoryError::Duplicate {
                    id: record.id.clone(),
                });
            }
        }
        drop(seen);

        stored.extend(records.into_iter().map(|record| StoredRecord {
            record,
            published: false,
        }));
        Ok(())
    }

    fn pending(&self) -> Result<Vec<OutboxRecord>, RepositoryError> {
        let stored = self.records.read().map_err(|_| lock_error("read"))?;
        Ok(stored
            .iter()
            .filter(|s| !s.published)
            .map(|s| s.record.clone())
            .collect())
    }

    fn mark_published(&mut self, ids: &[String]) -> Result<usize, RepositoryError> {
        let mut stored = self.records.write().map_err(|_| lock_error("write"))?;
        let ids: HashSet<&str> = ids.iter().map(String::as_str).collect();

        let mut changed = 0;
        for entry in stored.iter_mut() {
            if !entry.published && ids.contains(entry.record.id.as_str()) {
                entry.published = true;
                changed += 1;
            }
        }
        Ok(changed)
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        let stored = self.records.read().map_err(|_| lock_error("read"))?;
        Ok(stored.len())
    }

    fn count_pending(&self) -> Result<usize, RepositoryError> {
        let stored = self.records.read().map_err(|_| lock_error("read"))?;
        Ok(stored.iter().filter(|s| !s.published).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use akbo_domain::{Entity, Event, EventPayload, Timestamp};
    use akbo_usecase::EventRecorder;
    use chrono::{Duration, TimeZone, Utc};
    use serde::Serialize;
    use serde_json::Map;

    fn record(id: &str) -> OutboxRecord {
        OutboxRecord {
            id: id.to_string(),
            event_type: "test.event".to_string(),
            occurred_at: "2025-01-01T00:00:00+00:00".to_string(),
            payload: Map::new(),
        }
    }

    #[test]
    fn test_outbox_repository() {
        let mut repo = InMemoryOutboxRepository::new();

        repo.append(vec![record("e-1"), record("e-2")]).unwrap();
        assert_eq!(repo.count().unwrap(), 2);

        let changed = repo.mark_published(&["e-1".to_string(), "e-9".to_string()]).unwrap();
        assert_eq!(changed, 1);

        let pending = repo.pending().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "e-2");
        assert_eq!(repo.count_pending().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_batch_is_rejected_whole() {
        let mut repo = InMemoryOutboxRepository::new();
        repo.append(vec![record("e-1")]).unwrap();

        let result = repo.append(vec![record("e-2"), record("e-1")]);
        assert_eq!(
            result,
            Err(RepositoryError::Duplicate {
                id: "e-1".to_string()
            })
        );
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_clones_share_storage() {
        let mut repo = InMemoryOutboxRepository::new();
        let view = repo.clone();

        repo.append(vec![record("e-1")]).unwrap();
        assert_eq!(view.count().unwrap(), 1);
    }

    #[derive(Debug, Clone)]
    struct Account;

    #[derive(Debug, Clone, Serialize)]
    struct AccountOpened {
        owner: String,
    }

    impl EventPayload for AccountOpened {}

    #[test]
    fn test_recorder_writes_to_in_memory_outbox() {
        let now: Timestamp = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap().into();
        let account: Entity<Account, Event<AccountOpened>> = Entity::create(now, Account);
        let opened = Event::for_entity(&account, now + Duration::seconds(1), AccountOpened {
            owner: "alice".to_string(),
        });
        let account = account.add_event(opened);

        let repo = InMemoryOutboxRepository::new();
        let mut recorder = EventRecorder::new(repo.clone());
        recorder.record(&account).unwrap();

        let pending = repo.pending().unwrap();
        assert_eq!(pending.len(), 1);
        assert!(pending[0].event_type.ends_with("AccountOpened"));
        assert_eq!(pending[0].occurred_at, "2025-02-01T00:00:01+00:00");
    }
}
