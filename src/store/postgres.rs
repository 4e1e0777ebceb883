use anyhow::{bail, Context};
use async_trait::async_trait;
use sqlx::{pool::PoolConnection, postgres::PgPoolOptions, types::Json, PgPool, Postgres};
use tracing::debug;

use super::{Collection, Document, DocumentStore, SeedLock};

/// Advisory lock key shared by every instance that seeds the same database.
const SEED_LOCK_KEY: i64 = 0x5EED_0001;

/// Every collection lives in one `documents` table, keyed by collection name and
/// ordered by `seq` (insertion order).
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn count(&self, collection: Collection) -> anyhow::Result<u64> {
        let n: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM documents
            WHERE collection = $1
            "#,
        )
        .bind(collection.as_str())
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("count {collection}"))?;
        Ok(n.max(0) as u64)
    }

    async fn find_one(&self, collection: Collection) -> anyhow::Result<Option<Document>> {
        let row: Option<Json<Document>> = sqlx::query_scalar(
            r#"
            SELECT body
            FROM documents
            WHERE collection = $1
            ORDER BY seq ASC
            LIMIT 1
            "#,
        )
        .bind(collection.as_str())
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("find_one {collection}"))?;
        Ok(row.map(|Json(doc)| doc))
    }

    async fn find_all(
        &self,
        collection: Collection,
        limit: usize,
    ) -> anyhow::Result<Vec<Document>> {
        let rows: Vec<Json<Document>> = sqlx::query_scalar(
            r#"
            SELECT body
            FROM documents
            WHERE collection = $1
            ORDER BY seq ASC
            LIMIT $2
            "#,
        )
        .bind(collection.as_str())
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("find_all {collection}"))?;
        Ok(rows.into_iter().map(|Json(doc)| doc).collect())
    }

    async fn insert_one(&self, collection: Collection, doc: Document) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, body)
            VALUES ($1, $2)
            "#,
        )
        .bind(collection.as_str())
        .bind(Json(doc))
        .execute(&self.pool)
        .await
        .with_context(|| format!("insert_one {collection}"))?;
        Ok(())
    }

    async fn insert_many(
        &self,
        collection: Collection,
        docs: Vec<Document>,
    ) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await.context("begin insert_many")?;
        for doc in docs {
            sqlx::query(
                r#"
                INSERT INTO documents (collection, body)
                VALUES ($1, $2)
                "#,
            )
            .bind(collection.as_str())
            .bind(Json(doc))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("insert_many {collection}"))?;
        }
        tx.commit().await.context("commit insert_many")?;
        Ok(())
    }

    async fn ensure_index(&self, collection: Collection, field: &str) -> anyhow::Result<()> {
        // DDL takes no bind parameters; the field is spliced in and must be a plain identifier.
        if field.is_empty() || !field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            bail!("refusing to index field {field:?}");
        }
        let name = format!("idx_{}_{}", collection.as_str(), field);
        let sql = format!(
            "CREATE INDEX IF NOT EXISTS {name} ON documents ((body->>'{field}')) \
             WHERE collection = '{}'",
            collection.as_str()
        );
        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .with_context(|| format!("create index {name}"))?;
        debug!(index = %name, "index ensured");
        Ok(())
    }

    async fn acquire_seed_lock(&self) -> anyhow::Result<SeedLock> {
        // Session-level lock, tied to this connection; the connection travels with the guard.
        let mut conn = self.pool.acquire().await.context("acquire seed lock connection")?;
        sqlx::query("SELECT pg_advisory_lock($1)")
            .bind(SEED_LOCK_KEY)
            .execute(&mut *conn)
            .await
            .context("pg_advisory_lock")?;
        Ok(SeedLock::advisory(conn))
    }
}

pub(super) async fn release_advisory(mut conn: PoolConnection<Postgres>) -> anyhow::Result<()> {
    sqlx::query("SELECT pg_advisory_unlock($1)")
        .bind(SEED_LOCK_KEY)
        .execute(&mut *conn)
        .await
        .context("pg_advisory_unlock")?;
    Ok(())
}
