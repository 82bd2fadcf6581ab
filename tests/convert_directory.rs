mod common;

use std::fs;

use parquet_convert::ConvertError;
use parquet_convert::convert::{ConversionMode, ConvertOptions, convert_path};
use parquet_convert::ingestion::csv::ingest_csv_from_path;
use parquet_convert::types::{DataType, Field, Schema, Value};

use common::{file_names, write_corrupt, write_people, write_text_ids};

fn people_schema() -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::Int64),
        Field::new("name", DataType::Utf8),
        Field::new("score", DataType::Float64),
    ])
}

#[test]
fn per_file_mode_writes_one_output_per_input() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in");
    fs::create_dir(&src).unwrap();
    write_people(&src.join("a.parquet"), &[(1, Some("Ada"), Some(1.0))]);
    write_people(&src.join("b.pq"), &[(2, Some("Grace"), Some(2.0))]);
    write_people(&src.join("c.parquet"), &[(3, None, None)]);
    fs::write(src.join("notes.txt"), "ignored").unwrap();
    let out = dir.path().join("out").join("nested");

    let summary = convert_path(&src, &out, &ConvertOptions::default()).unwrap();
    assert_eq!(summary.mode, ConversionMode::PerFile);
    assert_eq!((summary.succeeded, summary.attempted), (3, 3));
    assert!(summary.failures.is_empty());
    assert_eq!(file_names(&out), vec!["a.csv", "b.csv", "c.csv"]);

    let b = ingest_csv_from_path(out.join("b.csv"), &people_schema()).unwrap();
    assert_eq!(
        b.rows,
        vec![vec![Value::Int64(2), Value::Utf8("Grace".into()), Value::Float64(2.0)]]
    );
}

#[test]
fn per_file_mode_uses_requested_extension() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in");
    fs::create_dir(&src).unwrap();
    write_people(&src.join("a.parquet"), &[(1, Some("Ada"), Some(1.0))]);
    write_people(&src.join("b.parquet"), &[(2, Some("Grace"), Some(2.0))]);
    let out = dir.path().join("out");

    let opts = ConvertOptions {
        output_extension: "xlsx".to_string(),
        ..Default::default()
    };
    let summary = convert_path(&src, &out, &opts).unwrap();
    assert!(summary.is_success());
    assert_eq!(file_names(&out), vec!["a.xlsx", "b.xlsx"]);
}

#[test]
fn per_file_mode_with_unsupported_extension_fails_every_file() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in");
    fs::create_dir(&src).unwrap();
    write_people(&src.join("a.parquet"), &[(1, Some("Ada"), Some(1.0))]);
    write_people(&src.join("b.parquet"), &[(2, Some("Grace"), Some(2.0))]);
    let out = dir.path().join("out");

    let opts = ConvertOptions {
        output_extension: "json".to_string(),
        ..Default::default()
    };
    let summary = convert_path(&src, &out, &opts).unwrap();
    assert_eq!((summary.succeeded, summary.attempted), (0, 2));
    assert!(
        summary
            .failures
            .iter()
            .all(|f| matches!(f.error, ConvertError::UnsupportedOutputFormat { .. }))
    );
    assert!(file_names(&out).is_empty());
}

#[test]
fn one_corrupt_file_does_not_stop_the_others() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in");
    fs::create_dir(&src).unwrap();
    write_people(&src.join("a.parquet"), &[(1, Some("Ada"), Some(1.0))]);
    write_corrupt(&src.join("b.parquet"));
    write_people(&src.join("c.parquet"), &[(3, Some("Linus"), Some(3.0))]);
    let out = dir.path().join("out");

    let summary = convert_path(&src, &out, &ConvertOptions::default()).unwrap();
    assert!(!summary.is_success());
    assert_eq!((summary.succeeded, summary.attempted), (2, 3));
    assert_eq!(summary.outputs, vec![out.join("a.csv"), out.join("c.csv")]);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].source, src.join("b.parquet"));
    assert!(matches!(
        summary.failures[0].error,
        ConvertError::ReadFailure { .. }
    ));
    assert_eq!(file_names(&out), vec!["a.csv", "c.csv"]);
}

#[test]
fn combine_writes_one_output_in_file_name_order() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in");
    fs::create_dir(&src).unwrap();
    write_people(&src.join("b.parquet"), &[(20, Some("b1"), Some(2.0)), (21, Some("b2"), None)]);
    write_people(&src.join("a.parquet"), &[(10, Some("a1"), Some(1.0))]);
    write_people(&src.join("c.pq"), &[(30, None, Some(3.5))]);
    let dst = dir.path().join("all.csv");

    let opts = ConvertOptions {
        combine: true,
        ..Default::default()
    };
    let summary = convert_path(&src, &dst, &opts).unwrap();
    assert_eq!(summary.mode, ConversionMode::CombineAll);
    assert_eq!((summary.succeeded, summary.attempted), (1, 1));
    assert_eq!(file_names(dir.path()), vec!["all.csv", "in"]);

    let ds = ingest_csv_from_path(&dst, &people_schema()).unwrap();
    let ids: Vec<&Value> = ds.rows.iter().map(|r| &r[0]).collect();
    assert_eq!(
        ids,
        vec![
            &Value::Int64(10),
            &Value::Int64(20),
            &Value::Int64(21),
            &Value::Int64(30)
        ]
    );
}

#[test]
fn combine_into_directory_is_named_combined() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in");
    fs::create_dir(&src).unwrap();
    write_people(&src.join("a.parquet"), &[(1, Some("Ada"), Some(1.0))]);
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();

    let opts = ConvertOptions {
        combine: true,
        output_extension: "xlsx".to_string(),
        ..Default::default()
    };
    let summary = convert_path(&src, &out, &opts).unwrap();
    assert_eq!(summary.outputs, vec![out.join("combined.xlsx")]);
}

#[test]
fn combine_unions_columns_and_widens_conflicts() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in");
    fs::create_dir(&src).unwrap();
    write_people(&src.join("a.parquet"), &[(1, Some("Ada"), Some(1.0))]);
    write_text_ids(&src.join("b.parquet"), &["x-2"]);
    let dst = dir.path().join("all.csv");

    let opts = ConvertOptions {
        combine: true,
        ..Default::default()
    };
    convert_path(&src, &dst, &opts).unwrap();

    let text = fs::read_to_string(&dst).unwrap();
    assert_eq!(text, "id,name,score\n1,Ada,1.0\nx-2,,\n");
}

#[test]
fn combine_aborts_on_unreadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in");
    fs::create_dir(&src).unwrap();
    write_people(&src.join("a.parquet"), &[(1, Some("Ada"), Some(1.0))]);
    write_corrupt(&src.join("b.parquet"));
    let dst = dir.path().join("all.csv");

    let opts = ConvertOptions {
        combine: true,
        ..Default::default()
    };
    let err = convert_path(&src, &dst, &opts).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::ReadFailure { ref path, .. } if path.ends_with("b.parquet")
    ));
    assert!(!dst.exists());
}

#[test]
fn empty_directory_produces_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("data.csv"), "id\n1\n").unwrap();
    let out = dir.path().join("out");

    for combine in [false, true] {
        let opts = ConvertOptions {
            combine,
            ..Default::default()
        };
        let err = convert_path(&src, &out, &opts).unwrap_err();
        assert!(matches!(err, ConvertError::NoInputFilesFound { .. }));
    }
    assert!(!out.exists());
    assert_eq!(file_names(&src), vec!["data.csv"]);
}

#[test]
fn per_file_destination_extension_selects_format() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in");
    fs::create_dir(&src).unwrap();
    write_people(&src.join("a.parquet"), &[(1, Some("Ada"), Some(1.0))]);
    write_people(&src.join("b.parquet"), &[(2, Some("Grace"), Some(2.0))]);
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();

    let summary = convert_path(&src, out.join("report.xlsx"), &ConvertOptions::default()).unwrap();
    assert!(summary.is_success());
    assert_eq!(summary.outputs, vec![out.join("a.xlsx"), out.join("b.xlsx")]);
    assert_eq!(file_names(&out), vec!["a.xlsx", "b.xlsx"]);
}

#[test]
fn per_file_destination_with_unknown_extension_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in");
    fs::create_dir(&src).unwrap();
    write_people(&src.join("a.parquet"), &[(1, Some("Ada"), Some(1.0))]);
    let out = dir.path().join("out");

    let err = convert_path(&src, out.join("report.json"), &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::UnsupportedOutputFormat { .. }));
    assert!(!out.exists());
    assert_eq!(file_names(dir.path()), vec!["in"]);
}

#[test]
fn inputs_sharing_a_stem_get_distinct_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in");
    fs::create_dir(&src).unwrap();
    write_people(&src.join("a.parquet"), &[(1, Some("Ada"), Some(1.0))]);
    write_people(&src.join("a.pq"), &[(2, Some("Bob"), Some(2.0))]);
    let out = dir.path().join("out");

    let summary = convert_path(&src, &out, &ConvertOptions::default()).unwrap();
    assert_eq!((summary.succeeded, summary.attempted), (2, 2));
    assert_eq!(file_names(&out), vec!["a.parquet.csv", "a.pq.csv"]);

    let ada = ingest_csv_from_path(out.join("a.parquet.csv"), &people_schema()).unwrap();
    let bob = ingest_csv_from_path(out.join("a.pq.csv"), &people_schema()).unwrap();
    assert_eq!(ada.rows[0][1], Value::Utf8("Ada".into()));
    assert_eq!(bob.rows[0][1], Value::Utf8("Bob".into()));
}
