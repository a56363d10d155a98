//! HTTP handlers for entity CRUD and spreadsheet ingestion.

pub mod entity;
pub mod integration;
