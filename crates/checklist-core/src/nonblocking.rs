//! Async adapter over the synchronous store.
//!
//! Each call moves the blocking work onto Tokio's blocking pool. Behavior is
//! identical to calling the repositories directly.

use std::sync::Arc;

use tokio::task;

use crate::checklist::{Checklist, ChecklistId};
use crate::error::{ChecklistError, Result};
use crate::item::{Item, ItemId};
use crate::storage::Store;

/// A shareable async handle to a [`Store`].
#[derive(Debug, Clone)]
pub struct AsyncStore {
    inner: Arc<Store>,
}

impl AsyncStore {
    pub fn new(store: Store) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// The wrapped store.
    pub fn store(&self) -> &Store {
        &self.inner
    }

    async fn run<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Store) -> Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.inner);
        task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| ChecklistError::Task(e.to_string()))?
    }

    pub async fn create_checklist(&self, name: impl Into<String>) -> Result<Checklist> {
        let name = name.into();
        self.run(move |store| Checklist::create(store, &name)).await
    }

    pub async fn load_checklist(&self, id: ChecklistId) -> Result<Checklist> {
        self.run(move |store| Checklist::load(store, id)).await
    }

    pub async fn list_checklists(&self) -> Result<Vec<Checklist>> {
        self.run(Checklist::all).await
    }

    pub async fn create_item(
        &self,
        checklist_id: ChecklistId,
        text: impl Into<String>,
    ) -> Result<Item> {
        let text = text.into();
        self.run(move |store| Item::create(store, checklist_id, &text))
            .await
    }

    pub async fn load_item(&self, id: ItemId) -> Result<Item> {
        self.run(move |store| Item::load(store, id)).await
    }

    pub async fn list_items(&self, checklist_id: ChecklistId) -> Result<Vec<Item>> {
        self.run(move |store| Checklist::load(store, checklist_id)?.items(store))
            .await
    }

    pub async fn toggle_item(&self, id: ItemId) -> Result<bool> {
        self.run(move |store| Item::toggle_by_id(store, id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyMaterial;
    use crate::storage::{StorageEngine, StoreOptions};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_async_round_trip() {
        let dir = tempdir().unwrap();
        let store = Store::open_with(
            &dir.path().join("async.checklist"),
            KeyMaterial::new("test-key").unwrap(),
            &StoreOptions::default().with_work_factor(10),
        )
        .unwrap();
        let store = AsyncStore::new(store);

        let list = store.create_checklist("Groceries").await.unwrap();
        let item = store.create_item(list.id, "Milk").await.unwrap();

        assert!(store.toggle_item(item.id).await.unwrap());
        assert!(store.load_item(item.id).await.unwrap().checked);
        assert_eq!(store.list_items(list.id).await.unwrap().len(), 1);
        assert_eq!(store.list_checklists().await.unwrap(), vec![list]);
    }

    #[tokio::test]
    async fn test_async_errors_pass_through() {
        let dir = tempdir().unwrap();
        let store = Store::open_with(
            &dir.path().join("async.checklist"),
            KeyMaterial::new("test-key").unwrap(),
            &StoreOptions::default().with_work_factor(10),
        )
        .unwrap();
        let store = AsyncStore::new(store);

        let err = store
            .create_item(ChecklistId::new(1), "Milk")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
