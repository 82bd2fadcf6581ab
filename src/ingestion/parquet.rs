//! Parquet ingestion implementation.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use parquet::basic::{ConvertedType, LogicalType, TimeUnit, Type as PhysicalType};
use parquet::file::reader::{ChunkReader, FileReader};
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field as ParquetField;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Days between 0001-01-01 (CE day 1) and the Unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Load a Parquet file into a `DataSet`, inferring the schema from the file metadata.
///
/// The whole file is materialized; there is no row-group streaming.
pub fn read_parquet(path: impl AsRef<Path>) -> IngestionResult<DataSet> {
    let reader = SerializedFileReader::try_from(path.as_ref())?;
    let schema = infer_parquet_schema(&reader);
    let units = timestamp_units(&reader);
    ingest_rows(reader, &schema, &units)
}

/// Declared unit of each top-level `TIMESTAMP` column. The record API only yields typed
/// timestamps when a matching converted type exists; otherwise the raw `Long` arrives and
/// has to be scaled by this unit.
fn timestamp_units<R: ChunkReader + 'static>(
    reader: &SerializedFileReader<R>,
) -> HashMap<String, TimeUnit> {
    reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .filter(|c| c.path().parts().len() == 1)
        .filter_map(|c| match c.logical_type_ref() {
            Some(LogicalType::Timestamp { unit, .. }) => Some((c.name().to_string(), unit.clone())),
            _ => None,
        })
        .collect()
}

/// Derive a [`Schema`] from the top-level fields of a Parquet file.
///
/// Nested groups (lists, maps, structs) are exposed as [`DataType::Utf8`] columns holding the
/// record API's textual rendering.
pub fn infer_parquet_schema<R: ChunkReader + 'static>(reader: &SerializedFileReader<R>) -> Schema {
    let descr = reader.metadata().file_metadata().schema_descr();
    let fields = descr
        .root_schema()
        .get_fields()
        .iter()
        .map(|ty| {
            let data_type = if ty.is_primitive() {
                descr
                    .columns()
                    .iter()
                    .find(|c| c.path().parts().len() == 1 && c.name() == ty.name())
                    .map(|c| {
                        map_column_type(c.physical_type(), c.logical_type_ref(), c.converted_type())
                    })
                    .unwrap_or(DataType::Utf8)
            } else {
                DataType::Utf8
            };
            Field::new(ty.name(), data_type)
        })
        .collect();
    Schema::new(fields)
}

fn map_column_type(
    physical: PhysicalType,
    logical: Option<&LogicalType>,
    converted: ConvertedType,
) -> DataType {
    if let Some(logical) = logical {
        return match logical {
            LogicalType::Timestamp {
                is_adjusted_to_u_t_c: true,
                ..
            } => DataType::TimestampTz,
            LogicalType::Timestamp { .. } => DataType::Timestamp,
            LogicalType::Date => DataType::Date,
            LogicalType::Integer { .. } => DataType::Int64,
            LogicalType::Float16 => DataType::Float64,
            _ => DataType::Utf8,
        };
    }

    match converted {
        ConvertedType::TIMESTAMP_MILLIS | ConvertedType::TIMESTAMP_MICROS => {
            return DataType::Timestamp;
        }
        ConvertedType::DATE => return DataType::Date,
        ConvertedType::NONE => {}
        ConvertedType::INT_8
        | ConvertedType::INT_16
        | ConvertedType::INT_32
        | ConvertedType::INT_64
        | ConvertedType::UINT_8
        | ConvertedType::UINT_16
        | ConvertedType::UINT_32
        | ConvertedType::UINT_64 => return DataType::Int64,
        _ => return DataType::Utf8,
    }

    match physical {
        PhysicalType::BOOLEAN => DataType::Bool,
        PhysicalType::INT32 | PhysicalType::INT64 => DataType::Int64,
        PhysicalType::INT96 => DataType::Timestamp,
        PhysicalType::FLOAT | PhysicalType::DOUBLE => DataType::Float64,
        PhysicalType::BYTE_ARRAY | PhysicalType::FIXED_LEN_BYTE_ARRAY => DataType::Utf8,
    }
}

fn ingest_rows(
    reader: SerializedFileReader<File>,
    schema: &Schema,
    units: &HashMap<String, TimeUnit>,
) -> IngestionResult<DataSet> {
    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (idx0, row_res) in reader.into_iter().enumerate() {
        let row_num = idx0 + 1;
        let row = row_res?;

        // Build a name->Field map for lookup.
        let mut map: HashMap<&str, &ParquetField> = HashMap::new();
        for (name, field) in row.get_column_iter() {
            map.insert(name.as_str(), field);
        }

        let mut out_row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for f in &schema.fields {
            let v = map.get(f.name.as_str()).ok_or_else(|| IngestionError::SchemaMismatch {
                message: format!("row {row_num} missing required column '{}'", f.name),
            })?;
            let unit = units.get(&f.name);
            out_row.push(convert_parquet_field(row_num, &f.name, f.data_type, unit, v)?);
        }
        rows.push(out_row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

fn convert_parquet_field(
    row: usize,
    column: &str,
    data_type: DataType,
    unit: Option<&TimeUnit>,
    f: &ParquetField,
) -> IngestionResult<Value> {
    if matches!(f, ParquetField::Null) {
        return Ok(Value::Null);
    }

    let parse_err = |message: &str| IngestionError::ParseError {
        row,
        column: column.to_string(),
        raw: f.to_string(),
        message: message.to_string(),
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(match f {
            ParquetField::Str(s) => s.clone(),
            ParquetField::Bytes(b) => String::from_utf8_lossy(b.data()).into_owned(),
            other => other.to_string(),
        })),
        DataType::Bool => match f {
            ParquetField::Bool(b) => Ok(Value::Bool(*b)),
            _ => Err(parse_err("expected bool")),
        },
        DataType::Int64 => match f {
            ParquetField::Byte(v) => Ok(Value::Int64(i64::from(*v))),
            ParquetField::Short(v) => Ok(Value::Int64(i64::from(*v))),
            ParquetField::Int(v) => Ok(Value::Int64(i64::from(*v))),
            ParquetField::Long(v) => Ok(Value::Int64(*v)),
            ParquetField::UByte(v) => Ok(Value::Int64(i64::from(*v))),
            ParquetField::UShort(v) => Ok(Value::Int64(i64::from(*v))),
            ParquetField::UInt(v) => Ok(Value::Int64(i64::from(*v))),
            ParquetField::ULong(v) => i64::try_from(*v)
                .map(Value::Int64)
                .map_err(|_| parse_err("u64 out of range for i64")),
            _ => Err(parse_err("expected integer")),
        },
        DataType::Float64 => match f {
            ParquetField::Float16(v) => Ok(Value::Float64(v.to_f64())),
            ParquetField::Float(v) => Ok(Value::Float64(f64::from(*v))),
            ParquetField::Double(v) => Ok(Value::Float64(*v)),
            _ => Err(parse_err("expected number")),
        },
        DataType::Date => match f {
            ParquetField::Date(days) => days
                .checked_add(UNIX_EPOCH_DAYS_FROM_CE)
                .and_then(NaiveDate::from_num_days_from_ce_opt)
                .map(Value::Date)
                .ok_or_else(|| parse_err("date out of range")),
            _ => Err(parse_err("expected date")),
        },
        DataType::Timestamp => timestamp_utc(f, unit)
            .map(|ts| Value::Timestamp(ts.naive_utc()))
            .ok_or_else(|| parse_err("expected timestamp")),
        DataType::TimestampTz => timestamp_utc(f, unit)
            .map(|ts| Value::TimestampTz(ts.fixed_offset()))
            .ok_or_else(|| parse_err("expected timestamp")),
    }
}

/// Interpret a record field as an instant. Raw `Long`s are scaled by the declared unit,
/// nanoseconds when none is known.
fn timestamp_utc(f: &ParquetField, unit: Option<&TimeUnit>) -> Option<DateTime<Utc>> {
    match (f, unit) {
        (ParquetField::TimestampMillis(v), _) => DateTime::from_timestamp_millis(*v),
        (ParquetField::TimestampMicros(v), _) => DateTime::from_timestamp_micros(*v),
        (ParquetField::Long(v), Some(TimeUnit::MILLIS)) => DateTime::from_timestamp_millis(*v),
        (ParquetField::Long(v), Some(TimeUnit::MICROS)) => DateTime::from_timestamp_micros(*v),
        (ParquetField::Long(v), _) => Some(DateTime::from_timestamp_nanos(*v)),
        _ => None,
    }
}
