//! In-memory implementation of [`ServiceRepository`].

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use medride_core::repository::service::{ServiceFilter, ServiceRepository};
use medride_types::error::RepositoryError;
use medride_types::service::{ServiceId, ServiceRecord};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Store {
    records: HashMap<ServiceId, ServiceRecord>,
    /// Registry order, most recent first.
    order: VecDeque<ServiceId>,
}

/// Service records held in process memory: an id map plus registry order.
///
/// Cloning produces a shared view of the same underlying store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryServiceRepository {
    inner: Arc<RwLock<Store>>,
}

impl InMemoryServiceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ServiceRepository for InMemoryServiceRepository {
    async fn prepend(&self, records: &[ServiceRecord]) -> Result<(), RepositoryError> {
        let mut store = self.inner.write().await;

        let mut batch = HashSet::with_capacity(records.len());
        for record in records {
            if store.records.contains_key(&record.id) || !batch.insert(record.id) {
                return Err(RepositoryError::Conflict(format!(
                    "service id '{}' already exists",
                    record.id
                )));
            }
        }

        for record in records.iter().rev() {
            store.order.push_front(record.id);
            store.records.insert(record.id, record.clone());
        }
        Ok(())
    }

    async fn get(&self, id: &ServiceId) -> Result<Option<ServiceRecord>, RepositoryError> {
        let store = self.inner.read().await;
        Ok(store.records.get(id).cloned())
    }

    async fn list(&self, filter: Option<ServiceFilter>) -> Result<Vec<ServiceRecord>, RepositoryError> {
        let store = self.inner.read().await;
        let filter = filter.unwrap_or_default();
        let limit = filter.limit.unwrap_or(usize::MAX);

        let records = store
            .order
            .iter()
            .filter_map(|id| store.records.get(id))
            .filter(|record| filter.matches(record))
            .take(limit)
            .cloned()
            .collect();
        Ok(records)
    }

    async fn replace(&self, record: &ServiceRecord) -> Result<bool, RepositoryError> {
        let mut store = self.inner.write().await;
        match store.records.get_mut(&record.id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.inner.read().await.records.len())
    }
}
