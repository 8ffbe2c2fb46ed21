//! Persistence for the trigger table and the panel list.
//!
//! Reads fail soft: a missing or unparsable collection yields its empty default.
//! Writes fail hard: any error is returned to the caller so an administrator's
//! update is never dropped silently.

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::base::{
    config::Config,
    types::{PanelList, Res, StoreKind, TriggerTable, Void},
};

pub mod json;
pub mod memory;

use json::JsonFileStore;
use memory::MemoryStore;

// Traits.

/// Generic store trait that backends must implement.
///
/// Implementing this trait allows the flat files to be swapped for another
/// backend without touching the dispatch logic.
#[async_trait]
pub trait GenericStore: Send + Sync + 'static {
    /// Loads the trigger table, or an empty table if it is missing or corrupt.
    async fn load_triggers(&self) -> TriggerTable;

    /// Replaces the persisted trigger table.
    async fn save_triggers(&self, triggers: &TriggerTable) -> Void;

    /// Loads the panel list, or an empty list if it is missing or corrupt.
    async fn load_panel(&self) -> PanelList;

    /// Replaces the persisted panel list.
    async fn save_panel(&self, panel: &PanelList) -> Void;
}

// Structs.

/// Store client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
/// Read-modify-write helpers are serialized through a shared write lock.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<dyn GenericStore>,
    write_lock: Arc<Mutex<()>>,
}

impl Deref for StoreClient {
    type Target = dyn GenericStore;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl StoreClient {
    pub fn new(inner: Arc<dyn GenericStore>) -> Self {
        Self {
            inner,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Creates a store backed by the JSON files named in the config.
    pub fn json(config: &Config) -> Self {
        Self::new(Arc::new(JsonFileStore::new(config.trigger_path(), config.panel_path())))
    }

    /// Creates an in-process store, mostly useful for tests.
    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryStore::default()))
    }

    /// Looks up the response for an exact trigger word. An empty response counts as absent.
    pub async fn lookup_trigger(&self, word: &str) -> Option<String> {
        self.load_triggers().await.remove(word).filter(|r| !r.is_empty())
    }

    /// Inserts or overwrites a trigger, then persists the table.
    pub async fn upsert_trigger(&self, word: &str, response: &str) -> Void {
        let _guard = self.write_lock.lock().await;

        let mut triggers = self.load_triggers().await;
        triggers.insert(word.to_string(), response.to_string());

        self.save_triggers(&triggers).await
    }

    /// Gets the panel text at `index`, if any. An empty text counts as absent.
    pub async fn panel_entry(&self, index: usize) -> Option<String> {
        self.load_panel().await.into_iter().nth(index).filter(|t| !t.is_empty())
    }

    /// Appends a panel text, persists the list, and returns the new entry's index.
    pub async fn append_panel(&self, content: &str) -> Res<usize> {
        let _guard = self.write_lock.lock().await;

        let mut panel = self.load_panel().await;
        panel.push(content.to_string());

        self.save_panel(&panel).await?;

        Ok(panel.len() - 1)
    }

    /// Empties one collection.
    pub async fn clear(&self, kind: StoreKind) -> Void {
        let _guard = self.write_lock.lock().await;

        match kind {
            StoreKind::Triggers => self.save_triggers(&TriggerTable::new()).await,
            StoreKind::Panel => self.save_panel(&PanelList::new()).await,
        }
    }

    /// Empties both collections.
    pub async fn clear_all(&self) -> Void {
        self.clear(StoreKind::Triggers).await?;
        self.clear(StoreKind::Panel).await
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upsert_overwrites_existing_trigger() {
        let store = StoreClient::memory();

        store.upsert_trigger("hello", "hi").await.unwrap();
        store.upsert_trigger("hello", "hi there").await.unwrap();

        assert_eq!(store.lookup_trigger("hello").await.as_deref(), Some("hi there"));
        assert_eq!(store.load_triggers().await.len(), 1);
    }

    #[tokio::test]
    async fn lookup_is_exact_and_case_sensitive() {
        let store = StoreClient::memory();
        store.upsert_trigger("Hello", "hi").await.unwrap();

        assert_eq!(store.lookup_trigger("hello").await, None);
        assert_eq!(store.lookup_trigger("Hell").await, None);
        assert_eq!(store.lookup_trigger("Hello ").await, None);
        assert_eq!(store.lookup_trigger("Hello").await.as_deref(), Some("hi"));
    }

    #[tokio::test]
    async fn empty_texts_count_as_absent() {
        let triggers = TriggerTable::from([("blank".to_string(), String::new())]);
        let store = StoreClient::new(Arc::new(MemoryStore::with_contents(triggers, vec![String::new(), "B".to_string()])));

        assert_eq!(store.lookup_trigger("blank").await, None);
        assert_eq!(store.panel_entry(0).await, None);
        assert_eq!(store.panel_entry(1).await.as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn append_returns_sequential_indices() {
        let store = StoreClient::memory();

        assert_eq!(store.append_panel("A").await.unwrap(), 0);
        assert_eq!(store.append_panel("B").await.unwrap(), 1);

        assert_eq!(store.panel_entry(0).await.as_deref(), Some("A"));
        assert_eq!(store.panel_entry(1).await.as_deref(), Some("B"));
        assert_eq!(store.panel_entry(2).await, None);
    }

    #[tokio::test]
    async fn clear_all_empties_both_collections() {
        let store = StoreClient::memory();
        store.upsert_trigger("a", "b").await.unwrap();
        store.append_panel("c").await.unwrap();

        store.clear_all().await.unwrap();

        assert!(store.load_triggers().await.is_empty());
        assert!(store.load_panel().await.is_empty());
    }

    #[tokio::test]
    async fn clear_leaves_other_kind_untouched() {
        let store = StoreClient::memory();
        store.upsert_trigger("a", "b").await.unwrap();
        store.append_panel("c").await.unwrap();

        store.clear(StoreKind::Panel).await.unwrap();

        assert_eq!(store.load_triggers().await.len(), 1);
        assert!(store.load_panel().await.is_empty());
    }

    #[tokio::test]
    async fn concurrent_appends_are_not_lost() {
        let store = StoreClient::memory();

        let tasks = (0..16).map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.append_panel(&format!("entry {i}")).await })
        });

        for task in tasks.collect::<Vec<_>>() {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.load_panel().await.len(), 16);
    }
}
