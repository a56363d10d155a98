//! Generic CRUD execution against the remote table service.

use crate::config::EntityRef;
use crate::error::{AppError, RemoteError};
use crate::remote::{Filter, Order, Record, SelectQuery, TableClient};
use std::collections::HashMap;
use std::sync::Arc;

/// Result of a list. Remote failures are suppressed to an empty result rather than propagated.
#[derive(Debug)]
pub enum ListOutcome {
    Fetched(Vec<Record>),
    Suppressed { table: String, error: RemoteError },
}

impl ListOutcome {
    pub fn into_rows(self) -> Vec<Record> {
        match self {
            ListOutcome::Fetched(rows) => rows,
            ListOutcome::Suppressed { .. } => Vec::new(),
        }
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self, ListOutcome::Suppressed { .. })
    }
}

#[derive(Clone)]
pub struct CrudService {
    client: Arc<dyn TableClient>,
}

impl CrudService {
    pub fn new(client: Arc<dyn TableClient>) -> Self {
        CrudService { client }
    }

    /// List rows ordered by `sort`, honouring the entity's one filter parameter if it has one.
    pub async fn list(&self, entity: &EntityRef, sort: Option<&str>, params: &HashMap<String, String>) -> ListOutcome {
        let table = entity.table();
        let mut query = SelectQuery::new(&table).order(Order::from_sort_param(sort));
        if let Some(column) = entity.list_filter() {
            if let Some(value) = params.get(column) {
                query = query.filter(Filter::eq(column, value.clone()));
            }
        }
        match self.client.select(&query).await {
            Ok(rows) => ListOutcome::Fetched(rows),
            Err(error) => {
                tracing::error!(table = %table, error = %error, "list failed; returning empty result");
                ListOutcome::Suppressed { table, error }
            }
        }
    }

    /// Insert one row. Returns the stored row, or an empty object when the service returned none.
    pub async fn create(&self, entity: &EntityRef, body: Record) -> Result<Record, AppError> {
        let table = entity.table();
        let rows = self.client.insert(&table, std::slice::from_ref(&body)).await?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    pub async fn bulk_create(&self, entity: &EntityRef, items: &[Record]) -> Result<Vec<Record>, AppError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let table = entity.table();
        let rows = self.client.insert(&table, items).await?;
        tracing::info!(table = %table, requested = items.len(), inserted = rows.len(), "bulk insert");
        Ok(rows)
    }

    /// Update rows whose `id` equals `id`. Returns whatever rows the service reports as updated.
    pub async fn update(&self, entity: &EntityRef, id: &str, patch: &Record) -> Result<Vec<Record>, AppError> {
        let table = entity.table();
        Ok(self.client.update(&table, &Filter::id(id), patch).await?)
    }

    /// Delete rows whose `id` equals `id`. Does not report whether anything matched.
    pub async fn delete(&self, entity: &EntityRef, id: &str) -> Result<(), AppError> {
        let table = entity.table();
        self.client.delete(&table, &Filter::id(id)).await?;
        Ok(())
    }
}
