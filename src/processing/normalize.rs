//! Timezone normalization ahead of spreadsheet output.

use std::borrow::Cow;

use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Return `dataset` with every timezone-aware timestamp replaced by its wall-clock value.
///
/// The offset is dropped and the local time kept (`09:00+02:00` becomes `09:00`). When nothing
/// is timezone-aware the input is borrowed as-is; otherwise a converted copy is returned and
/// `dataset` is never modified.
pub fn strip_timezones(dataset: &DataSet) -> Cow<'_, DataSet> {
    if !has_timezone_values(dataset) {
        return Cow::Borrowed(dataset);
    }

    let schema = Schema::new(
        dataset
            .schema
            .fields
            .iter()
            .map(|f| match f.data_type {
                DataType::TimestampTz => Field::new(f.name.clone(), DataType::Timestamp),
                _ => f.clone(),
            })
            .collect(),
    );

    Cow::Owned(dataset.map_rows(schema, |row| {
        row.iter()
            .map(|v| match v {
                Value::TimestampTz(ts) => Value::Timestamp(ts.naive_local()),
                other => other.clone(),
            })
            .collect()
    }))
}

/// `true` if any column is declared timezone-aware or any cell holds an aware timestamp.
pub fn has_timezone_values(dataset: &DataSet) -> bool {
    dataset
        .schema
        .fields
        .iter()
        .any(|f| f.data_type == DataType::TimestampTz)
        || dataset
            .rows
            .iter()
            .flatten()
            .any(|v| matches!(v, Value::TimestampTz(_)))
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, NaiveDate, TimeZone};

    use super::*;

    fn aware_dataset() -> DataSet {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let ts = plus_two.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        DataSet::new(
            Schema::new(vec![
                Field::new("id", DataType::Int64),
                Field::new("at", DataType::TimestampTz),
            ]),
            vec![
                vec![Value::Int64(1), Value::TimestampTz(ts)],
                vec![Value::Int64(2), Value::Null],
            ],
        )
    }

    #[test]
    fn keeps_wall_clock_and_leaves_source_untouched() {
        let ds = aware_dataset();
        let naive = strip_timezones(&ds);

        let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(naive.rows[0][1], Value::Timestamp(expected));
        assert_eq!(naive.rows[1][1], Value::Null);
        assert_eq!(naive.schema.fields[1].data_type, DataType::Timestamp);

        assert!(matches!(ds.rows[0][1], Value::TimestampTz(_)));
        assert_eq!(ds.schema.fields[1].data_type, DataType::TimestampTz);
    }

    #[test]
    fn naive_datasets_are_borrowed() {
        let ds = DataSet::new(
            Schema::new(vec![Field::new("id", DataType::Int64)]),
            vec![vec![Value::Int64(1)]],
        );
        assert!(matches!(strip_timezones(&ds), Cow::Borrowed(_)));
    }
}
