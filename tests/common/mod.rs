// Shared fixtures for router tests: in-memory table service and request helpers.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use erp_gateway::remote::{Direction, Filter, SelectQuery};
use erp_gateway::{app, AppState, Record, RemoteError, TableClient};
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const BOUNDARY: &str = "gateway-test-boundary";

/// In-memory stand-in for the remote table service. Assigns integer ids on insert.
#[derive(Default)]
pub struct MemoryTables {
    tables: Mutex<HashMap<String, Vec<Record>>>,
    next_id: Mutex<i64>,
    pub selects: Mutex<Vec<SelectQuery>>,
}

impl MemoryTables {
    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        let mut tables = self.tables.lock().unwrap();
        let entry = tables.entry(table.to_string()).or_default();
        for row in rows {
            entry.push(to_record(row));
        }
    }

    pub fn rows(&self, table: &str) -> Vec<Record> {
        self.tables.lock().unwrap().get(table).cloned().unwrap_or_default()
    }
}

fn matches(row: &Record, filter: &Filter) -> bool {
    row.get(&filter.column).map(scalar_text).as_deref() == Some(filter.value.as_str())
}

fn scalar_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a.and_then(Value::as_f64), b.and_then(Value::as_f64)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.map(scalar_text).cmp(&b.map(scalar_text)),
    }
}

#[async_trait]
impl TableClient for MemoryTables {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Record>, RemoteError> {
        self.selects.lock().unwrap().push(query.clone());
        let mut rows: Vec<Record> = self
            .rows(&query.table)
            .into_iter()
            .filter(|r| query.filters.iter().all(|f| matches(r, f)))
            .collect();
        rows.sort_by(|a, b| {
            let ord = compare(a.get(&query.order.column), b.get(&query.order.column));
            match query.order.direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            }
        });
        Ok(rows)
    }

    async fn insert(&self, table: &str, rows: &[Record]) -> Result<Vec<Record>, RemoteError> {
        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let mut row = row.clone();
            if !row.contains_key("id") {
                let mut next = self.next_id.lock().unwrap();
                *next += 1;
                row.insert("id".into(), json!(*next));
            }
            stored.push(row);
        }
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn update(&self, table: &str, filter: &Filter, patch: &Record) -> Result<Vec<Record>, RemoteError> {
        let mut tables = self.tables.lock().unwrap();
        let mut updated = Vec::new();
        for row in tables.entry(table.to_string()).or_default().iter_mut() {
            if matches(row, filter) {
                for (k, v) in patch {
                    row.insert(k.clone(), v.clone());
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<(), RemoteError> {
        let mut tables = self.tables.lock().unwrap();
        tables.entry(table.to_string()).or_default().retain(|r| !matches(r, filter));
        Ok(())
    }
}

/// Table service that rejects every call, as an unreachable database would.
pub struct FailingTables;

#[async_trait]
impl TableClient for FailingTables {
    async fn select(&self, _query: &SelectQuery) -> Result<Vec<Record>, RemoteError> {
        Err(RemoteError::Status { status: 503, message: "service unavailable".into() })
    }

    async fn insert(&self, _table: &str, _rows: &[Record]) -> Result<Vec<Record>, RemoteError> {
        Err(RemoteError::Status { status: 503, message: "service unavailable".into() })
    }

    async fn update(&self, _table: &str, _filter: &Filter, _patch: &Record) -> Result<Vec<Record>, RemoteError> {
        Err(RemoteError::Status { status: 503, message: "service unavailable".into() })
    }

    async fn delete(&self, _table: &str, _filter: &Filter) -> Result<(), RemoteError> {
        Err(RemoteError::Status { status: 503, message: "service unavailable".into() })
    }
}

pub fn to_record(v: Value) -> Record {
    match v {
        Value::Object(m) => m,
        other => panic!("expected object, got {}", other),
    }
}

pub fn router(client: Arc<dyn TableClient>) -> Router {
    router_with_limit(client, 10 * 1024 * 1024)
}

pub fn router_with_limit(client: Arc<dyn TableClient>, max_upload_bytes: usize) -> Router {
    app(AppState::with_client(client, max_upload_bytes))
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
    };
    (status, json)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Multipart body with a single file part.
pub fn multipart_request(uri: &str, field: &str, filename: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/vnd.openxmlformats-officedocument.spreadsheetml.sheet\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(body))
        .unwrap()
}
