//! Row-wise concatenation of datasets.

use chrono::{TimeZone, Utc};

use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Concatenate `datasets` in order into one dataset.
///
/// - Returns `None` when `datasets` is empty.
/// - Columns are the union of all inputs in first-seen order; a dataset lacking a column
///   contributes `Null`s for it.
/// - Conflicting column types widen: `Int64`+`Float64` to `Float64`, `Timestamp`+`TimestampTz`
///   to `TimestampTz` (naive values read as UTC), anything else to `Utf8`.
/// - Row positions in the result are contiguous; the inputs' own positions are not kept.
pub fn concat(datasets: Vec<DataSet>) -> Option<DataSet> {
    if datasets.is_empty() {
        return None;
    }

    let schema = union_schema(&datasets);
    let total_rows = datasets.iter().map(DataSet::row_count).sum();
    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(total_rows);

    for ds in datasets {
        if ds.schema == schema {
            rows.extend(ds.rows);
            continue;
        }

        // unified column -> source column
        let projection: Vec<Option<usize>> = schema
            .fields
            .iter()
            .map(|f| ds.schema.index_of(&f.name))
            .collect();

        for mut row in ds.rows {
            let out = schema
                .fields
                .iter()
                .zip(&projection)
                .map(|(field, src)| {
                    let v = src
                        .and_then(|i| row.get_mut(i))
                        .map(std::mem::take)
                        .unwrap_or(Value::Null);
                    coerce(v, field.data_type)
                })
                .collect();
            rows.push(out);
        }
    }

    Some(DataSet::new(schema, rows))
}

fn union_schema(datasets: &[DataSet]) -> Schema {
    let mut fields: Vec<Field> = Vec::new();
    for ds in datasets {
        for f in &ds.schema.fields {
            match fields.iter_mut().find(|u| u.name == f.name) {
                Some(existing) => existing.data_type = widen(existing.data_type, f.data_type),
                None => fields.push(f.clone()),
            }
        }
    }
    Schema::new(fields)
}

fn widen(a: DataType, b: DataType) -> DataType {
    use DataType::*;
    match (a, b) {
        _ if a == b => a,
        (Int64, Float64) | (Float64, Int64) => Float64,
        (Timestamp, TimestampTz) | (TimestampTz, Timestamp) => TimestampTz,
        _ => Utf8,
    }
}

fn coerce(v: Value, target: DataType) -> Value {
    match (v, target) {
        (Value::Null, _) => Value::Null,
        (Value::Int64(i), DataType::Float64) => Value::Float64(i as f64),
        (Value::Timestamp(ts), DataType::TimestampTz) => {
            Value::TimestampTz(Utc.from_utc_datetime(&ts).fixed_offset())
        }
        (v, DataType::Utf8) if !matches!(v, Value::Utf8(_)) => Value::Utf8(v.to_string()),
        (v, _) => v,
    }
}
