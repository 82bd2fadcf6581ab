//! CSV writer.

use std::io::Write;
use std::path::Path;

use crate::error::WriteResult;
use crate::types::DataSet;

use super::write_atomically;

/// Write `dataset` as CSV: one header row, then every row in order. No index column.
///
/// Timezone-aware timestamps keep their offset (`2024-01-01 09:00:00+02:00`); nulls are
/// empty cells.
pub fn write_csv(dataset: &DataSet, path: &Path) -> WriteResult<()> {
    write_atomically(path, |tmp| {
        let mut wtr = csv::Writer::from_writer(tmp);
        write_csv_to(&mut wtr, dataset)?;
        wtr.flush()?;
        Ok(())
    })
}

/// Write `dataset` through an existing CSV writer.
pub fn write_csv_to<W: Write>(wtr: &mut csv::Writer<W>, dataset: &DataSet) -> WriteResult<()> {
    wtr.write_record(dataset.schema.field_names())?;
    for row in &dataset.rows {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    Ok(())
}
