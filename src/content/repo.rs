use anyhow::Context;
use serde::de::DeserializeOwned;

use crate::store::{Collection, DocumentStore};

/// Reads up to `cap` documents and maps each onto its wire shape.
/// Fields the wire shape doesn't declare are dropped.
pub async fn list<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: Collection,
    cap: usize,
) -> anyhow::Result<Vec<T>> {
    let docs = store.find_all(collection, cap).await?;
    docs.into_iter()
        .map(|doc| {
            serde_json::from_value(doc)
                .with_context(|| format!("document in {collection} does not match its shape"))
        })
        .collect()
}

pub async fn singleton<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: Collection,
) -> anyhow::Result<Option<T>> {
    debug_assert!(collection.is_singleton());
    let Some(doc) = store.find_one(collection).await? else {
        return Ok(None);
    };
    let item = serde_json::from_value(doc)
        .with_context(|| format!("document in {collection} does not match its shape"))?;
    Ok(Some(item))
}
