//! Excel (`.xlsx`) writer backed by `rust_xlsxwriter`.

use std::io::Write;
use std::path::Path;

use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook};

use crate::error::{WriteError, WriteResult};
use crate::types::{DataSet, Value};

use super::write_atomically;

/// Rows per worksheet, header included.
pub const MAX_ROWS: usize = 1_048_576;
/// Columns per worksheet.
pub const MAX_COLUMNS: usize = 16_384;
/// Largest magnitude an `f64` cell holds without losing integer precision (2^53).
pub const MAX_EXACT_INTEGER: i64 = 1 << 53;

/// Write `dataset` as a single-sheet workbook.
///
/// The dataset must be timezone-naive (see [`crate::processing::strip_timezones`]); a
/// `TimestampTz` value fails with [`WriteError::TimezoneAware`].
///
/// Excel stores numbers as `f64`, so integers beyond [`MAX_EXACT_INTEGER`] in magnitude are
/// written as text cells to keep every digit.
pub fn write_xlsx(dataset: &DataSet, path: &Path) -> WriteResult<()> {
    let mut workbook = build_workbook(dataset)?;
    let buffer = workbook.save_to_buffer()?;
    write_atomically(path, |tmp| {
        tmp.write_all(&buffer)?;
        Ok(())
    })
}

/// Lay `dataset` out on the first worksheet of a new workbook.
pub fn build_workbook(dataset: &DataSet) -> WriteResult<Workbook> {
    check_limit("row", dataset.row_count() + 1, MAX_ROWS)?;
    check_limit("column", dataset.column_count(), MAX_COLUMNS)?;

    let header = Format::new().set_bold();
    let date = Format::new().set_num_format("yyyy-mm-dd");
    let datetime = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, field) in dataset.schema.fields.iter().enumerate() {
        sheet.write_string_with_format(0, col as ColNum, &field.name, &header)?;
    }

    for (idx, row) in dataset.rows.iter().enumerate() {
        let r = (idx + 1) as RowNum;
        for (col, value) in row.iter().enumerate() {
            let c = col as ColNum;
            match value {
                // Excel has no NaN/inf; those stay blank like nulls.
                Value::Null => {}
                Value::Float64(v) if !v.is_finite() => {}
                Value::Float64(v) => {
                    sheet.write_number(r, c, *v)?;
                }
                Value::Int64(v) if v.unsigned_abs() > MAX_EXACT_INTEGER.unsigned_abs() => {
                    sheet.write_string(r, c, v.to_string())?;
                }
                Value::Int64(v) => {
                    sheet.write_number(r, c, *v as f64)?;
                }
                Value::Bool(v) => {
                    sheet.write_boolean(r, c, *v)?;
                }
                Value::Utf8(v) => {
                    sheet.write_string(r, c, v)?;
                }
                Value::Date(v) => {
                    sheet.write_datetime_with_format(r, c, v, &date)?;
                }
                Value::Timestamp(v) => {
                    sheet.write_datetime_with_format(r, c, v, &datetime)?;
                }
                Value::TimestampTz(_) => {
                    let column = dataset
                        .schema
                        .fields
                        .get(col)
                        .map(|f| f.name.clone())
                        .unwrap_or_default();
                    return Err(WriteError::TimezoneAware { column });
                }
            }
        }
    }

    Ok(workbook)
}

fn check_limit(what: &'static str, count: usize, limit: usize) -> WriteResult<()> {
    if count > limit {
        return Err(WriteError::SheetLimit { what, count, limit });
    }
    Ok(())
}
