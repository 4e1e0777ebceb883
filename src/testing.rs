//! Helpers shared by the handler tests.

use anyhow::anyhow;
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::store::{Collection, Document, DocumentStore, SeedLock};

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

pub async fn get_json(app: Router, path: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

pub async fn post_json(app: Router, path: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, path, &body.to_string()).await
}

pub async fn post_raw(app: Router, path: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap();
    send(app, req).await
}

/// A store whose every call fails, as if the database were unreachable.
pub struct BrokenStore;

#[async_trait]
impl DocumentStore for BrokenStore {
    async fn count(&self, _c: Collection) -> anyhow::Result<u64> {
        Err(anyhow!("connection refused"))
    }
    async fn find_one(&self, _c: Collection) -> anyhow::Result<Option<Document>> {
        Err(anyhow!("connection refused"))
    }
    async fn find_all(&self, _c: Collection, _limit: usize) -> anyhow::Result<Vec<Document>> {
        Err(anyhow!("connection refused"))
    }
    async fn insert_one(&self, _c: Collection, _doc: Document) -> anyhow::Result<()> {
        Err(anyhow!("connection refused"))
    }
    async fn insert_many(&self, _c: Collection, _docs: Vec<Document>) -> anyhow::Result<()> {
        Err(anyhow!("connection refused"))
    }
    async fn ensure_index(&self, _c: Collection, _field: &str) -> anyhow::Result<()> {
        Err(anyhow!("connection refused"))
    }
    async fn acquire_seed_lock(&self) -> anyhow::Result<SeedLock> {
        Err(anyhow!("connection refused"))
    }
}
