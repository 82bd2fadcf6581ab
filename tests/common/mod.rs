#![allow(dead_code)]

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use parquet::column::writer::ColumnWriter;
use parquet::data_type::ByteArray;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;

/// `(id, name, score)`; `None` is written as a null.
pub type PersonRow<'a> = (i64, Option<&'a str>, Option<f64>);

fn def_levels(present: impl Iterator<Item = bool>) -> Vec<i16> {
    present.map(i16::from).collect()
}

fn open_writer(path: &Path, message: &str) -> SerializedFileWriter<File> {
    let schema = Arc::new(parse_message_type(message).unwrap());
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).unwrap();
    SerializedFileWriter::new(file, schema, props).unwrap()
}

pub fn write_people(path: &Path, rows: &[PersonRow<'_>]) {
    let mut writer = open_writer(
        path,
        r#"
        message schema {
          REQUIRED INT64 id;
          OPTIONAL BINARY name (UTF8);
          OPTIONAL DOUBLE score;
        }
        "#,
    );

    let mut rg = writer.next_row_group().unwrap();
    let mut col_idx: usize = 0;
    while let Some(mut col) = rg.next_column().unwrap() {
        match (col_idx, col.untyped()) {
            (0, ColumnWriter::Int64ColumnWriter(w)) => {
                let ids: Vec<i64> = rows.iter().map(|r| r.0).collect();
                w.write_batch(&ids, None, None).unwrap();
            }
            (1, ColumnWriter::ByteArrayColumnWriter(w)) => {
                let names: Vec<ByteArray> =
                    rows.iter().filter_map(|r| r.1).map(ByteArray::from).collect();
                let defs = def_levels(rows.iter().map(|r| r.1.is_some()));
                w.write_batch(&names, Some(defs.as_slice()), None).unwrap();
            }
            (2, ColumnWriter::DoubleColumnWriter(w)) => {
                let scores: Vec<f64> = rows.iter().filter_map(|r| r.2).collect();
                let defs = def_levels(rows.iter().map(|r| r.2.is_some()));
                w.write_batch(&scores, Some(defs.as_slice()), None).unwrap();
            }
            _ => panic!("unexpected column writer in test"),
        }
        col.close().unwrap();
        col_idx += 1;
    }
    rg.close().unwrap();
    writer.close().unwrap();
}

/// `(id, at)` with `at` in epoch milliseconds, annotated as a UTC-adjusted timestamp when
/// `utc` is set.
pub fn write_events(path: &Path, rows: &[(i64, Option<i64>)], utc: bool) {
    let message = format!(
        r#"
        message schema {{
          REQUIRED INT64 id;
          OPTIONAL INT64 at (TIMESTAMP(MILLIS,{utc}));
        }}
        "#
    );
    let mut writer = open_writer(path, &message);

    let mut rg = writer.next_row_group().unwrap();
    let mut col_idx: usize = 0;
    while let Some(mut col) = rg.next_column().unwrap() {
        match (col_idx, col.untyped()) {
            (0, ColumnWriter::Int64ColumnWriter(w)) => {
                let ids: Vec<i64> = rows.iter().map(|r| r.0).collect();
                w.write_batch(&ids, None, None).unwrap();
            }
            (1, ColumnWriter::Int64ColumnWriter(w)) => {
                let at: Vec<i64> = rows.iter().filter_map(|r| r.1).collect();
                let defs = def_levels(rows.iter().map(|r| r.1.is_some()));
                w.write_batch(&at, Some(defs.as_slice()), None).unwrap();
            }
            _ => panic!("unexpected column writer in test"),
        }
        col.close().unwrap();
        col_idx += 1;
    }
    rg.close().unwrap();
    writer.close().unwrap();
}

/// A single `id` column stored as text, for type-conflict tests.
pub fn write_text_ids(path: &Path, ids: &[&str]) {
    let mut writer = open_writer(
        path,
        r#"
        message schema {
          REQUIRED BINARY id (UTF8);
        }
        "#,
    );

    let mut rg = writer.next_row_group().unwrap();
    while let Some(mut col) = rg.next_column().unwrap() {
        match col.untyped() {
            ColumnWriter::ByteArrayColumnWriter(w) => {
                let values: Vec<ByteArray> = ids.iter().copied().map(ByteArray::from).collect();
                w.write_batch(&values, None, None).unwrap();
            }
            _ => panic!("unexpected column writer in test"),
        }
        col.close().unwrap();
    }
    rg.close().unwrap();
    writer.close().unwrap();
}

pub fn write_corrupt(path: &Path) {
    std::fs::write(path, b"this is not a parquet file").unwrap();
}

/// File names directly inside `dir`, sorted.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
