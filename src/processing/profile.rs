//! Dataset profiles for debug reporting.

use crate::types::{DataSet, DataType, Value};

use super::reduce::{ReduceOp, reduce};

/// Summary statistics for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub data_type: DataType,
    pub non_null: usize,
    pub nulls: usize,
    /// Smallest value, for numeric and temporal columns with at least one value.
    pub min: Option<Value>,
    /// Largest value, same rules as `min`.
    pub max: Option<Value>,
    /// Mean, numeric columns only.
    pub mean: Option<f64>,
}

/// Shape, types, leading rows and per-column statistics of a loaded dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetProfile {
    /// Source path, or a description such as `combined (3 files)`.
    pub label: String,
    pub rows: usize,
    pub columns: usize,
    pub column_names: Vec<String>,
    pub column_types: Vec<DataType>,
    /// The first rows of the dataset.
    pub sample: Vec<Vec<Value>>,
    pub summaries: Vec<ColumnSummary>,
}

/// Build a [`DatasetProfile`] with up to `sample_rows` leading rows.
pub fn profile(dataset: &DataSet, label: impl Into<String>, sample_rows: usize) -> DatasetProfile {
    let summaries = dataset
        .schema
        .fields
        .iter()
        .map(|field| {
            let nulls = match reduce(dataset, &field.name, ReduceOp::NullCount) {
                Some(Value::Int64(n)) => n as usize,
                _ => 0,
            };
            let non_null = dataset.row_count().saturating_sub(nulls);
            let non_null_value = |op| reduce(dataset, &field.name, op).filter(|v| !v.is_null());
            let mean = match non_null_value(ReduceOp::Mean) {
                Some(Value::Float64(m)) => Some(m),
                _ => None,
            };
            ColumnSummary {
                name: field.name.clone(),
                data_type: field.data_type,
                non_null,
                nulls,
                min: non_null_value(ReduceOp::Min),
                max: non_null_value(ReduceOp::Max),
                mean,
            }
        })
        .collect();

    DatasetProfile {
        label: label.into(),
        rows: dataset.row_count(),
        columns: dataset.column_count(),
        column_names: dataset.schema.field_names().map(str::to_owned).collect(),
        column_types: dataset.schema.fields.iter().map(|f| f.data_type).collect(),
        sample: dataset.head(sample_rows).to_vec(),
        summaries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Field, Schema};

    #[test]
    fn profile_reports_shape_sample_and_stats() {
        let ds = DataSet::new(
            Schema::new(vec![
                Field::new("id", DataType::Int64),
                Field::new("name", DataType::Utf8),
            ]),
            vec![
                vec![Value::Int64(4), Value::Utf8("a".into())],
                vec![Value::Int64(2), Value::Null],
                vec![Value::Null, Value::Utf8("c".into())],
            ],
        );

        let p = profile(&ds, "people.parquet", 2);
        assert_eq!(p.rows, 3);
        assert_eq!(p.columns, 2);
        assert_eq!(p.column_names, vec!["id", "name"]);
        assert_eq!(p.column_types, vec![DataType::Int64, DataType::Utf8]);
        assert_eq!(p.sample.len(), 2);

        let id = &p.summaries[0];
        assert_eq!((id.non_null, id.nulls), (2, 1));
        assert_eq!(id.min, Some(Value::Int64(2)));
        assert_eq!(id.max, Some(Value::Int64(4)));
        assert_eq!(id.mean, Some(3.0));

        let name = &p.summaries[1];
        assert_eq!((name.non_null, name.nulls), (2, 1));
        assert_eq!(name.min, None);
        assert_eq!(name.mean, None);
    }
}
