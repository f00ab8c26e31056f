//! CSV, JSON, and Excel renderers.
//!
//! None of these show a default index; a named index becomes the first
//! column.
//!
//! CHANGELOG:
//! - 10/18/2026 - Initial export renderers

use chrono::{NaiveDateTime, NaiveTime};
use rust_xlsxwriter::{Format, Workbook};
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::table::{prettify_header, Cell, TabularResult};
use crate::error::Result;

/// Days from Excel's epoch (1899-12-30) to the Unix epoch.
const EXCEL_UNIX_EPOCH_DAYS: f64 = 25_569.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

const DATETIME_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
const DATE_NUM_FORMAT: &str = "yyyy-mm-dd";

fn headers(columns: &[String], overrides: &HashMap<String, String>) -> Vec<String> {
    columns
        .iter()
        .map(|c| prettify_header(c, overrides))
        .collect()
}

/// Comma-separated values with a header row.
pub fn render_csv(result: &TabularResult, overrides: &HashMap<String, String>) -> Result<Vec<u8>> {
    let (columns, rows) = result.labeled_rows();
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(headers(&columns, overrides))?;
    for row in &rows {
        writer.write_record(row.iter().map(Cell::to_plain_string))?;
    }

    writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()).into())
}

/// A pretty-printed array of row objects keyed by column name.
pub fn render_json(result: &TabularResult) -> Result<Vec<u8>> {
    let (columns, rows) = result.labeled_rows();
    let records: Vec<Value> = rows
        .iter()
        .map(|row| {
            let object: Map<String, Value> = columns
                .iter()
                .cloned()
                .zip(row.iter().map(Cell::to_json))
                .collect();
            Value::Object(object)
        })
        .collect();
    Ok(serde_json::to_vec_pretty(&records)?)
}

/// An xlsx workbook with one worksheet.
///
/// Timestamps lose their zone first; Excel has no zone-aware date type.
pub fn render_excel(result: &TabularResult, overrides: &HashMap<String, String>) -> Result<Vec<u8>> {
    let (columns, rows) = result.without_timezones().labeled_rows();

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let datetime_format = Format::new().set_num_format(DATETIME_NUM_FORMAT);
    let date_format = Format::new().set_num_format(DATE_NUM_FORMAT);

    let worksheet = workbook.add_worksheet();
    for (col, header) in headers(&columns, overrides).iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }

    for (r, row) in rows.iter().enumerate() {
        let r = (r + 1) as u32;
        for (c, cell) in row.iter().enumerate() {
            let c = c as u16;
            match cell {
                Cell::Null => {}
                Cell::Bool(b) => {
                    worksheet.write_boolean(r, c, *b)?;
                }
                Cell::Int(n) => {
                    worksheet.write_number(r, c, *n as f64)?;
                }
                Cell::Float(f) => {
                    worksheet.write_number(r, c, *f)?;
                }
                Cell::Text(s) => {
                    worksheet.write_string(r, c, s)?;
                }
                Cell::DateTime(dt) => {
                    worksheet.write_number_with_format(r, c, excel_serial(dt), &datetime_format)?;
                }
                Cell::Date(d) => {
                    let midnight = d.and_time(NaiveTime::MIN);
                    worksheet.write_number_with_format(r, c, excel_serial(&midnight), &date_format)?;
                }
                // Already stripped above
                Cell::Timestamp(dt) => {
                    worksheet.write_string(r, c, dt.to_rfc3339())?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Excel serial date number (fractional days since 1899-12-30).
fn excel_serial(dt: &NaiveDateTime) -> f64 {
    dt.and_utc().timestamp_millis() as f64 / MILLIS_PER_DAY + EXCEL_UNIX_EPOCH_DAYS
}
