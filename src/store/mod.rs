use std::fmt;

use async_trait::async_trait;
use sqlx::{pool::PoolConnection, Postgres};
use tokio::sync::OwnedMutexGuard;

mod memory;
mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// A stored record. Collections are schemaless; shape checks happen at the HTTP edge.
pub type Document = serde_json::Value;

/// The named collections the site reads from and writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    MenuItems,
    ChefsChoice,
    Reviews,
    Timeline,
    Specials,
    Video,
    Assets,
    ContactMessages,
    Bookings,
}

impl Collection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MenuItems => "menu_items",
            Self::ChefsChoice => "chefs_choice",
            Self::Reviews => "reviews",
            Self::Timeline => "timeline",
            Self::Specials => "specials",
            Self::Video => "video",
            Self::Assets => "assets",
            Self::ContactMessages => "contact_messages",
            Self::Bookings => "bookings",
        }
    }

    /// Singletons hold zero or one document.
    pub const fn is_singleton(self) -> bool {
        matches!(self, Self::Specials | Self::Video | Self::Assets)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn count(&self, collection: Collection) -> anyhow::Result<u64>;

    /// First document in insertion order, if any.
    async fn find_one(&self, collection: Collection) -> anyhow::Result<Option<Document>>;

    /// Documents in insertion order, at most `limit` of them.
    async fn find_all(&self, collection: Collection, limit: usize)
        -> anyhow::Result<Vec<Document>>;

    async fn insert_one(&self, collection: Collection, doc: Document) -> anyhow::Result<()>;

    /// All-or-nothing insert of a batch.
    async fn insert_many(&self, collection: Collection, docs: Vec<Document>)
        -> anyhow::Result<()>;

    /// Creates a secondary index on a top-level field; no-op if it already exists.
    async fn ensure_index(&self, collection: Collection, field: &str) -> anyhow::Result<()>;

    /// Blocks until this process holds the store-wide seed lock.
    async fn acquire_seed_lock(&self) -> anyhow::Result<SeedLock>;
}

/// Held for the duration of seeding. Call [`SeedLock::release`] when done.
pub struct SeedLock {
    inner: SeedLockInner,
}

enum SeedLockInner {
    Advisory(PoolConnection<Postgres>),
    Local(OwnedMutexGuard<()>),
}

impl SeedLock {
    pub(crate) fn advisory(conn: PoolConnection<Postgres>) -> Self {
        Self {
            inner: SeedLockInner::Advisory(conn),
        }
    }

    pub(crate) fn local(guard: OwnedMutexGuard<()>) -> Self {
        Self {
            inner: SeedLockInner::Local(guard),
        }
    }

    pub async fn release(self) -> anyhow::Result<()> {
        match self.inner {
            SeedLockInner::Advisory(conn) => postgres::release_advisory(conn).await,
            SeedLockInner::Local(guard) => {
                drop(guard);
                Ok(())
            }
        }
    }
}
