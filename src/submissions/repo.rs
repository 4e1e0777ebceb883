use anyhow::Context;
use serde::Serialize;

use crate::store::{Collection, DocumentStore};

pub async fn insert<T: Serialize>(
    store: &dyn DocumentStore,
    collection: Collection,
    record: &T,
) -> anyhow::Result<()> {
    let doc = serde_json::to_value(record)
        .with_context(|| format!("encode {collection} document"))?;
    store.insert_one(collection, doc).await
}
