//! Client for the hosted PostgREST endpoint backing every entity table.

use crate::config::RemoteSettings;
use crate::error::RemoteError;
use crate::remote::query::{filter_params, Filter, SelectQuery};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde_json::{Map, Value};

/// One row as exchanged with the remote service.
pub type Record = Map<String, Value>;

/// Per-table operations offered by the remote tabular data service.
#[async_trait]
pub trait TableClient: Send + Sync {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Record>, RemoteError>;

    /// Insert rows and return them as stored (with server-generated columns).
    async fn insert(&self, table: &str, rows: &[Record]) -> Result<Vec<Record>, RemoteError>;

    async fn update(&self, table: &str, filter: &Filter, patch: &Record) -> Result<Vec<Record>, RemoteError>;

    async fn delete(&self, table: &str, filter: &Filter) -> Result<(), RemoteError>;
}

const REST_PATH: [&str; 2] = ["rest", "v1"];
const RETURN_REPRESENTATION: &str = "return=representation";

pub struct PostgrestClient {
    http: reqwest::Client,
    base_url: Option<String>,
    api_key: Option<String>,
}

impl PostgrestClient {
    pub fn new(settings: &RemoteSettings) -> Self {
        PostgrestClient {
            http: reqwest::Client::new(),
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
        }
    }

    /// `{base}/rest/v1/{table}`; the table name is percent-encoded as one path segment.
    fn table_url(&self, table: &str) -> Result<Url, RemoteError> {
        let base = self.base_url.as_deref().ok_or(RemoteError::NotConfigured("base url"))?;
        let mut url = Url::parse(base).map_err(|e| RemoteError::Decode(format!("invalid base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| RemoteError::Decode("base url cannot carry a path".into()))?
            .pop_if_empty()
            .extend(REST_PATH)
            .push(table);
        Ok(url)
    }

    fn request(&self, method: Method, table: &str) -> Result<RequestBuilder, RemoteError> {
        let key = self.api_key.as_deref().ok_or(RemoteError::NotConfigured("api key"))?;
        let url = self.table_url(table)?;
        tracing::debug!(method = %method, url = %url, "remote request");
        Ok(self
            .http
            .request(method, url)
            .header("apikey", key)
            .bearer_auth(key))
    }

    async fn rows(response: Response) -> Result<Vec<Record>, RemoteError> {
        let response = Self::check_status(response).await?;
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str::<Value>(&body).map_err(|e| RemoteError::Decode(e.to_string()))? {
            Value::Array(items) => items
                .into_iter()
                .map(|v| match v {
                    Value::Object(m) => Ok(m),
                    other => Err(RemoteError::Decode(format!("expected row object, got {}", other))),
                })
                .collect(),
            Value::Object(m) => Ok(vec![m]),
            other => Err(RemoteError::Decode(format!("expected rows, got {}", other))),
        }
    }

    async fn check_status(response: Response) -> Result<Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

/// PostgREST error bodies carry a `message` field; fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl TableClient for PostgrestClient {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Record>, RemoteError> {
        let response = self
            .request(Method::GET, &query.table)?
            .query(&query.to_params())
            .send()
            .await?;
        Self::rows(response).await
    }

    async fn insert(&self, table: &str, rows: &[Record]) -> Result<Vec<Record>, RemoteError> {
        let response = self
            .request(Method::POST, table)?
            .header("Prefer", RETURN_REPRESENTATION)
            .json(rows)
            .send()
            .await?;
        Self::rows(response).await
    }

    async fn update(&self, table: &str, filter: &Filter, patch: &Record) -> Result<Vec<Record>, RemoteError> {
        let response = self
            .request(Method::PATCH, table)?
            .header("Prefer", RETURN_REPRESENTATION)
            .query(&filter_params(filter))
            .json(patch)
            .send()
            .await?;
        Self::rows(response).await
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<(), RemoteError> {
        let response = self
            .request(Method::DELETE, table)?
            .query(&filter_params(filter))
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }
}
