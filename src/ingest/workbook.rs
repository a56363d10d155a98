//! Decode a workbook held in memory into header-keyed records.
//!
//! Normalization applied to the first worksheet:
//! - empty and error cells become `""`
//! - columns whose non-empty cells are all dates are rendered `DD/MM/YYYY`
//! - time-of-day cells (no date part) are rendered `HH:MM:SS` and never make a date column
//! - header names are trimmed; blank headers become `Unnamed: <index>` and
//!   repeated headers get `.1`, `.2`, ... suffixes
//! - rows with no values at all are skipped

use crate::error::IngestError;
use crate::remote::Record;
use axum::body::Bytes;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{Number, Value};
use std::collections::HashSet;
use std::io::Cursor;

const DATE_FORMAT: &str = "%d/%m/%Y";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const TIME_FORMAT: &str = "%H:%M:%S";
const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug)]
pub struct Extraction {
    pub records: Vec<Record>,
    pub count: usize,
}

/// Decode `bytes` (xlsx, xlsm, xlsb, xls or ods) and convert the first sheet to records.
pub fn extract(bytes: impl Into<Bytes>) -> Result<Extraction, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.into()))?;
    let range = workbook.worksheet_range_at(0).ok_or(IngestError::NoSheet)??;
    let records = records_from_range(&range);
    let count = records.len();
    Ok(Extraction { records, count })
}

fn records_from_range(range: &Range<Data>) -> Vec<Record> {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };
    let headers = header_names(header_row);
    let data: Vec<&[Data]> = rows.filter(|row| row.iter().any(|c| !is_blank(c))).collect();
    let date_columns: Vec<bool> = (0..headers.len()).map(|i| is_date_column(&data, i)).collect();

    data.iter()
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = row.get(i).map_or_else(empty, |c| cell_value(c, date_columns[i]));
                    (name.clone(), value)
                })
                .collect()
        })
        .collect()
}

fn header_names(row: &[Data]) -> Vec<String> {
    let mut seen = HashSet::new();
    row.iter()
        .enumerate()
        .map(|(i, cell)| {
            let raw = header_text(cell);
            let base = if raw.is_empty() { format!("Unnamed: {}", i) } else { raw };
            let mut name = base.clone();
            let mut n = 1;
            while !seen.insert(name.clone()) {
                name = format!("{}.{}", base, n);
                n += 1;
            }
            name
        })
        .collect()
}

fn header_text(cell: &Data) -> String {
    match cell_value(cell, false) {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    }
}

fn is_date_column(rows: &[&[Data]], col: usize) -> bool {
    let mut any = false;
    for cell in rows.iter().filter_map(|r| r.get(col)) {
        if is_blank(cell) {
            continue;
        }
        if cell_datetime(cell).is_none() {
            return false;
        }
        any = true;
    }
    any
}

/// Serials below one day carry no date: they are times of day, not 1899-12-31.
fn cell_datetime(cell: &Data) -> Option<NaiveDateTime> {
    match cell {
        Data::DateTime(dt) if dt.is_datetime() && dt.as_f64() >= 1.0 => dt.as_datetime(),
        Data::DateTimeIso(s) => parse_iso(s),
        _ => None,
    }
}

fn cell_time(cell: &Data) -> Option<NaiveTime> {
    match cell {
        Data::DateTime(dt) if dt.is_datetime() && (0.0..1.0).contains(&dt.as_f64()) => {
            let secs = (dt.as_f64() * SECONDS_PER_DAY).round() as u32;
            NaiveTime::from_num_seconds_from_midnight_opt(secs % 86_400, 0)
        }
        Data::DateTimeIso(s) => NaiveTime::parse_from_str(s, "%H:%M:%S%.f").ok(),
        _ => None,
    }
}

fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0)))
}

fn empty() -> Value {
    Value::String(String::new())
}

fn cell_value(cell: &Data, date_column: bool) -> Value {
    if let Some(dt) = cell_datetime(cell) {
        let fmt = if date_column { DATE_FORMAT } else { DATETIME_FORMAT };
        return Value::String(dt.format(fmt).to_string());
    }
    if let Some(t) = cell_time(cell) {
        return Value::String(t.format(TIME_FORMAT).to_string());
    }
    match cell {
        Data::Empty | Data::Error(_) => empty(),
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => Value::Number((*i).into()),
        Data::Float(f) => float_value(*f),
        Data::Bool(b) => Value::Bool(*b),
        // durations
        Data::DateTime(dt) => float_value(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
    }
}

/// Whole floats become integers, as spreadsheets store every number as a float.
fn float_value(f: f64) -> Value {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        return Value::Number((f as i64).into());
    }
    Number::from_f64(f).map_or_else(empty, Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
    use serde_json::json;

    fn sales_workbook() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("dd/mm/yyyy");
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, " Amount ").unwrap();
        sheet.write_string(0, 1, "Invoice Date").unwrap();
        sheet.write_string(0, 2, "Customer").unwrap();

        sheet.write_number(1, 0, 100).unwrap();
        let d1 = ExcelDateTime::from_ymd(2024, 3, 5).unwrap();
        sheet.write_datetime_with_format(1, 1, &d1, &date_format).unwrap();
        sheet.write_string(1, 2, "Acme").unwrap();

        let d2 = ExcelDateTime::from_ymd(2024, 12, 25).unwrap();
        sheet.write_datetime_with_format(2, 1, &d2, &date_format).unwrap();
        sheet.write_number(2, 0, 12.5).unwrap();

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn normalizes_dates_blanks_and_headers() {
        let out = extract(sales_workbook()).unwrap();
        assert_eq!(out.count, 2);

        let first = Value::Object(out.records[0].clone());
        assert_eq!(first, json!({"Amount": 100, "Invoice Date": "05/03/2024", "Customer": "Acme"}));

        let second = Value::Object(out.records[1].clone());
        assert_eq!(second, json!({"Amount": 12.5, "Invoice Date": "25/12/2024", "Customer": ""}));
    }

    #[test]
    fn mixed_column_is_not_date_formatted() {
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "When").unwrap();
        let d = ExcelDateTime::from_ymd(2024, 3, 5).unwrap();
        sheet.write_datetime_with_format(1, 0, &d, &date_format).unwrap();
        sheet.write_string(2, 0, "pending").unwrap();
        let out = extract(workbook.save_to_buffer().unwrap()).unwrap();

        assert_eq!(out.records[0]["When"], json!("2024-03-05T00:00:00"));
        assert_eq!(out.records[1]["When"], json!("pending"));
    }

    #[test]
    fn time_only_column_keeps_the_time() {
        let mut workbook = Workbook::new();
        let time_format = Format::new().set_num_format("hh:mm");
        let date_format = Format::new().set_num_format("dd/mm/yyyy");
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Start").unwrap();
        sheet.write_string(0, 1, "Day").unwrap();
        let start = ExcelDateTime::from_hms(14, 30, 0).unwrap();
        sheet.write_datetime_with_format(1, 0, &start, &time_format).unwrap();
        let day = ExcelDateTime::from_ymd(2024, 3, 5).unwrap();
        sheet.write_datetime_with_format(1, 1, &day, &date_format).unwrap();
        let out = extract(workbook.save_to_buffer().unwrap()).unwrap();

        let row = Value::Object(out.records[0].clone());
        assert_eq!(row, json!({"Start": "14:30:00", "Day": "05/03/2024"}));
    }

    #[test]
    fn blank_and_duplicate_headers_are_named() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Name").unwrap();
        sheet.write_string(0, 2, "Name ").unwrap();
        sheet.write_string(1, 0, "a").unwrap();
        sheet.write_string(1, 1, "b").unwrap();
        sheet.write_string(1, 2, "c").unwrap();
        let out = extract(workbook.save_to_buffer().unwrap()).unwrap();

        let row = Value::Object(out.records[0].clone());
        assert_eq!(row, json!({"Name": "a", "Unnamed: 1": "b", "Name.1": "c"}));
    }

    #[test]
    fn empty_rows_are_skipped() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Code").unwrap();
        sheet.write_string(1, 0, "A").unwrap();
        sheet.write_string(3, 0, "B").unwrap();
        let out = extract(workbook.save_to_buffer().unwrap()).unwrap();
        assert_eq!(out.count, 2);
        assert_eq!(out.records[1]["Code"], json!("B"));
    }

    #[test]
    fn header_only_sheet_yields_no_records() {
        let mut workbook = Workbook::new();
        workbook.add_worksheet().write_string(0, 0, "Only").unwrap();
        let out = extract(workbook.save_to_buffer().unwrap()).unwrap();
        assert_eq!(out.count, 0);
        assert!(out.records.is_empty());
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = extract(&b"definitely not a spreadsheet"[..]).unwrap_err();
        assert!(matches!(err, IngestError::Decode(_)));
    }

    #[test]
    fn float_values() {
        assert_eq!(float_value(3.0), json!(3));
        assert_eq!(float_value(-2.25), json!(-2.25));
        assert_eq!(float_value(f64::NAN), json!(""));
    }
}
