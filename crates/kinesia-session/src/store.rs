//! Storage interface for completed sessions.
//!
//! Persistence and upload live behind [`SessionRepository`], so the
//! recording pipeline never depends on a concrete database or HTTP
//! client. [`InMemoryRepository`] is the bundled implementation, used
//! by tests and by embedders that have not wired real storage yet.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::record::SessionRecord;
use crate::Result;

/// Abstract store of completed session records.
///
/// Implementations assign the record id on save and flip its sync
/// flag; the recording side never invents ids. Methods are async
/// because real backends sit on a disk or network boundary.
///
/// # Example
///
/// ```ignore
/// let repository = InMemoryRepository::new();
/// let saved = repository.save(record).await?;
/// assert_eq!(saved.id, Some(1));
/// assert!(saved.synced);
/// ```
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persists a record, returning it with a storage-assigned id and
    /// its sync flag set.
    async fn save(&self, record: SessionRecord) -> Result<SessionRecord>;

    /// Fetches one record by id.
    async fn get(&self, id: i64) -> Result<Option<SessionRecord>>;

    /// Lists all stored records in save order.
    async fn list(&self) -> Result<Vec<SessionRecord>>;
}

/// Repository keeping records in memory with sequential ids starting
/// at 1.
#[derive(Debug)]
pub struct InMemoryRepository {
    records: RwLock<Vec<SessionRecord>>,
    next_id: AtomicI64,
}

impl InMemoryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// True when nothing has been saved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn save(&self, mut record: SessionRecord) -> Result<SessionRecord> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        record.mark_synced(id);
        self.records.write().push(record.clone());
        debug!(id, "session record saved");
        Ok(record)
    }

    async fn get(&self, id: i64) -> Result<Option<SessionRecord>> {
        Ok(self
            .records
            .read()
            .iter()
            .find(|record| record.id == Some(id))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<SessionRecord>> {
        Ok(self.records.read().clone())
    }
}
