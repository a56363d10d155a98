//! Spreadsheet ingestion: multipart upload in, header-keyed JSON records out. Nothing touches disk.

pub mod upload;
pub mod workbook;

pub use upload::{read_upload, sanitize_filename, Upload};
pub use workbook::{extract, Extraction};
