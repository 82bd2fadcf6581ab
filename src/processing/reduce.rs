//! Reduction operations for [`crate::types::DataSet`].

use crate::types::{DataSet, DataType, Value};

/// Built-in reduction operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count all rows (including nulls).
    Count,
    /// Count null cells.
    NullCount,
    /// Sum numeric values, ignoring nulls.
    Sum,
    /// Minimum numeric or temporal value, ignoring nulls.
    Min,
    /// Maximum numeric or temporal value, ignoring nulls.
    Max,
    /// Arithmetic mean of numeric values as `Float64`, ignoring nulls.
    Mean,
}

/// Reduce a column using a built-in [`ReduceOp`].
///
/// - Returns `None` if `column` does not exist in the schema.
/// - For `Sum`/`Min`/`Max`/`Mean`, returns `Some(Value::Null)` if there are no non-null values
///   or the column type does not support the operation.
/// - For `Count`, always returns `Some(Value::Int64(row_count))`.
pub fn reduce(dataset: &DataSet, column: &str, op: ReduceOp) -> Option<Value> {
    let idx = dataset.schema.index_of(column)?;
    let data_type = dataset.schema.fields.get(idx)?.data_type;

    Some(match op {
        ReduceOp::Count => Value::Int64(dataset.row_count() as i64),
        ReduceOp::NullCount => Value::Int64(dataset.reduce_rows(0_i64, |acc, row| {
            acc + i64::from(row.get(idx).is_none_or(Value::is_null))
        })),
        ReduceOp::Sum => sum(dataset, idx, data_type),
        ReduceOp::Mean => mean(dataset, idx, data_type),
        ReduceOp::Min | ReduceOp::Max => extreme(dataset, idx, data_type, op),
    })
}

fn ints(dataset: &DataSet, idx: usize) -> impl Iterator<Item = i64> + '_ {
    dataset.column(idx).filter_map(|v| match v {
        Value::Int64(x) => Some(*x),
        _ => None,
    })
}

fn floats(dataset: &DataSet, idx: usize) -> impl Iterator<Item = f64> + '_ {
    dataset.column(idx).filter_map(|v| match v {
        Value::Float64(x) if !x.is_nan() => Some(*x),
        _ => None,
    })
}

fn sum(dataset: &DataSet, idx: usize, data_type: DataType) -> Value {
    match data_type {
        DataType::Int64 => {
            // i128 so large columns cannot overflow mid-sum.
            let mut count = 0_usize;
            let total: i128 = ints(dataset, idx)
                .inspect(|_| count += 1)
                .map(i128::from)
                .sum();
            if count == 0 {
                Value::Null
            } else {
                i64::try_from(total)
                    .map(Value::Int64)
                    .unwrap_or(Value::Float64(total as f64))
            }
        }
        DataType::Float64 => {
            let mut count = 0_usize;
            let total: f64 = floats(dataset, idx).inspect(|_| count += 1).sum();
            if count == 0 { Value::Null } else { Value::Float64(total) }
        }
        _ => Value::Null,
    }
}

fn mean(dataset: &DataSet, idx: usize, data_type: DataType) -> Value {
    let (total, count) = match data_type {
        DataType::Int64 => {
            ints(dataset, idx).fold((0.0, 0_usize), |(s, n), v| (s + v as f64, n + 1))
        }
        DataType::Float64 => floats(dataset, idx).fold((0.0, 0_usize), |(s, n), v| (s + v, n + 1)),
        _ => (0.0, 0),
    };
    if count == 0 {
        Value::Null
    } else {
        Value::Float64(total / count as f64)
    }
}

fn pick<T: PartialOrd>(acc: Option<T>, v: T, op: ReduceOp) -> Option<T> {
    Some(match acc {
        None => v,
        Some(a) => match op {
            ReduceOp::Min if v < a => v,
            ReduceOp::Max if v > a => v,
            _ => a,
        },
    })
}

fn extreme(dataset: &DataSet, idx: usize, data_type: DataType, op: ReduceOp) -> Value {
    let found = match data_type {
        DataType::Int64 => {
            ints(dataset, idx).fold(None, |acc, v| pick(acc, v, op)).map(Value::Int64)
        }
        DataType::Float64 => floats(dataset, idx)
            .fold(None, |acc, v| pick(acc, v, op))
            .map(Value::Float64),
        DataType::Date => dataset
            .column(idx)
            .filter_map(|v| match v {
                Value::Date(d) => Some(*d),
                _ => None,
            })
            .fold(None, |acc, v| pick(acc, v, op))
            .map(Value::Date),
        DataType::Timestamp => dataset
            .column(idx)
            .filter_map(|v| match v {
                Value::Timestamp(ts) => Some(*ts),
                _ => None,
            })
            .fold(None, |acc, v| pick(acc, v, op))
            .map(Value::Timestamp),
        DataType::TimestampTz => dataset
            .column(idx)
            .filter_map(|v| match v {
                Value::TimestampTz(ts) => Some(*ts),
                _ => None,
            })
            .fold(None, |acc, v| pick(acc, v, op))
            .map(Value::TimestampTz),
        DataType::Bool | DataType::Utf8 => None,
    };
    found.unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{ReduceOp, reduce};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn numeric_dataset_with_nulls() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("score", DataType::Float64),
        ]);

        let rows = vec![
            vec![Value::Int64(1), Value::Float64(10.0)],
            vec![Value::Int64(2), Value::Null],
            vec![Value::Int64(3), Value::Float64(5.5)],
        ];

        DataSet::new(schema, rows)
    }

    #[test]
    fn reduce_count_counts_rows() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(reduce(&ds, "score", ReduceOp::Count), Some(Value::Int64(3)));
        assert_eq!(reduce(&ds, "score", ReduceOp::NullCount), Some(Value::Int64(1)));
        assert_eq!(reduce(&ds, "id", ReduceOp::NullCount), Some(Value::Int64(0)));
    }

    #[test]
    fn reduce_sum_ignores_nulls_and_preserves_type() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(
            reduce(&ds, "score", ReduceOp::Sum),
            Some(Value::Float64(15.5))
        );
        assert_eq!(reduce(&ds, "id", ReduceOp::Sum), Some(Value::Int64(6)));
    }

    #[test]
    fn reduce_mean_is_float() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(reduce(&ds, "id", ReduceOp::Mean), Some(Value::Float64(2.0)));
        assert_eq!(
            reduce(&ds, "score", ReduceOp::Mean),
            Some(Value::Float64(7.75))
        );
    }

    #[test]
    fn reduce_min_max_ignore_nulls() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(
            reduce(&ds, "score", ReduceOp::Min),
            Some(Value::Float64(5.5))
        );
        assert_eq!(
            reduce(&ds, "score", ReduceOp::Max),
            Some(Value::Float64(10.0))
        );
        assert_eq!(reduce(&ds, "id", ReduceOp::Min), Some(Value::Int64(1)));
        assert_eq!(reduce(&ds, "id", ReduceOp::Max), Some(Value::Int64(3)));
    }

    #[test]
    fn reduce_min_max_cover_dates() {
        let d = |day| Value::Date(NaiveDate::from_ymd_opt(2024, 1, day).unwrap());
        let ds = DataSet::new(
            Schema::new(vec![Field::new("day", DataType::Date)]),
            vec![vec![d(9)], vec![Value::Null], vec![d(2)]],
        );
        assert_eq!(reduce(&ds, "day", ReduceOp::Min), Some(d(2)));
        assert_eq!(reduce(&ds, "day", ReduceOp::Max), Some(d(9)));
    }

    #[test]
    fn reduce_returns_none_for_missing_column() {
        let ds = numeric_dataset_with_nulls();
        assert_eq!(reduce(&ds, "missing", ReduceOp::Count), None);
        assert_eq!(reduce(&ds, "missing", ReduceOp::Sum), None);
    }

    #[test]
    fn reduce_numeric_returns_null_if_all_values_null() {
        let schema = Schema::new(vec![Field::new("score", DataType::Float64)]);
        let ds = DataSet::new(schema, vec![vec![Value::Null], vec![Value::Null]]);
        assert_eq!(
            reduce(&ds, "score", ReduceOp::Sum),
            Some(Value::Null)
        );
        assert_eq!(
            reduce(&ds, "score", ReduceOp::Min),
            Some(Value::Null)
        );
        assert_eq!(
            reduce(&ds, "score", ReduceOp::Mean),
            Some(Value::Null)
        );
    }
}
