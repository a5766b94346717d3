//! HashMap-backed `DocumentStore` for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::DocumentStore;
use crate::models::{LedgerEntry, LedgerList, MatchingData};
use crate::utils::error::LedgerError;

/// In-memory store keyed by userId. Clone-friendly via Arc.
///
/// Counts calls per document so tests can assert which records an
/// operation touched, and can be switched offline to simulate an
/// unreachable store.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    records: Arc<RwLock<HashMap<String, MatchingData>>>,
    reads: Arc<RwLock<HashMap<String, usize>>>,
    writes: Arc<RwLock<HashMap<String, usize>>>,
    offline: Arc<AtomicUsize>,
    after_next_get: Arc<RwLock<Option<MatchingData>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, record: MatchingData) {
        self.records
            .write()
            .await
            .insert(record.user_id.clone(), record);
    }

    pub async fn snapshot(&self, user_id: &str) -> Option<MatchingData> {
        self.records.read().await.get(user_id).cloned()
    }

    pub async fn reads(&self, user_id: &str) -> usize {
        self.reads.read().await.get(user_id).copied().unwrap_or(0)
    }

    pub async fn writes(&self, user_id: &str) -> usize {
        self.writes.read().await.get(user_id).copied().unwrap_or(0)
    }

    /// Stores `record` right after the next `get` has read, so the caller
    /// acts on a stale view.
    pub async fn insert_after_next_get(&self, record: MatchingData) {
        *self.after_next_get.write().await = Some(record);
    }

    /// Fails the next `n` calls with `StoreUnavailable`.
    pub fn fail_next(&self, n: usize) {
        self.offline.store(n, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), LedgerError> {
        let tripped = self
            .offline
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        if tripped {
            return Err(LedgerError::StoreUnavailable("connection refused".into()));
        }
        Ok(())
    }

    async fn bump(counter: &RwLock<HashMap<String, usize>>, user_id: &str) {
        *counter.write().await.entry(user_id.to_string()).or_insert(0) += 1;
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get(&self, user_id: &str) -> Result<Option<MatchingData>, LedgerError> {
        self.check_online()?;
        Self::bump(&self.reads, user_id).await;
        let record = self.records.read().await.get(user_id).cloned();

        if let Some(late) = self.after_next_get.write().await.take() {
            self.insert(late).await;
        }
        Ok(record)
    }

    async fn create(&self, record: &MatchingData) -> Result<(), LedgerError> {
        self.check_online()?;
        Self::bump(&self.writes, &record.user_id).await;

        let mut records = self.records.write().await;
        if records.contains_key(&record.user_id) {
            return Err(LedgerError::Conflict(format!(
                "matchingData for {} already exists",
                record.user_id
            )));
        }
        records.insert(record.user_id.clone(), record.clone());
        Ok(())
    }

    async fn merge(
        &self,
        user_id: &str,
        list: LedgerList,
        entries: &[LedgerEntry],
    ) -> Result<(), LedgerError> {
        self.check_online()?;
        Self::bump(&self.writes, user_id).await;

        let mut records = self.records.write().await;
        let record = records.get_mut(user_id).ok_or_else(|| {
            LedgerError::RecordNotFound(format!("matchingData for {} disappeared before update", user_id))
        })?;
        *record.list_mut(list) = entries.to_vec();
        Ok(())
    }
}
