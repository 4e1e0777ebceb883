use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use super::{Collection, Document, DocumentStore, SeedLock};

/// Process-local store for tests and demo runs. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
    indexes: RwLock<BTreeSet<String>>,
    seed_lock: Arc<Mutex<()>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn index_names(&self) -> Vec<String> {
        self.indexes.read().await.iter().cloned().collect()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn count(&self, collection: Collection) -> anyhow::Result<u64> {
        let guard = self.collections.read().await;
        Ok(guard.get(&collection).map_or(0, |docs| docs.len() as u64))
    }

    async fn find_one(&self, collection: Collection) -> anyhow::Result<Option<Document>> {
        let guard = self.collections.read().await;
        Ok(guard.get(&collection).and_then(|docs| docs.first().cloned()))
    }

    async fn find_all(
        &self,
        collection: Collection,
        limit: usize,
    ) -> anyhow::Result<Vec<Document>> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(&collection)
            .map(|docs| docs.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn insert_one(&self, collection: Collection, doc: Document) -> anyhow::Result<()> {
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(doc);
        Ok(())
    }

    async fn insert_many(
        &self,
        collection: Collection,
        docs: Vec<Document>,
    ) -> anyhow::Result<()> {
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .extend(docs);
        Ok(())
    }

    async fn ensure_index(&self, collection: Collection, field: &str) -> anyhow::Result<()> {
        self.indexes
            .write()
            .await
            .insert(format!("idx_{}_{}", collection.as_str(), field));
        Ok(())
    }

    async fn acquire_seed_lock(&self) -> anyhow::Result<SeedLock> {
        let guard = Arc::clone(&self.seed_lock).lock_owned().await;
        Ok(SeedLock::local(guard))
    }
}
