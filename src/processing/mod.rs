//! In-memory dataset transformations used between loading and writing.
//!
//! - [`concat()`]: merge datasets row-wise (combine mode)
//! - [`strip_timezones()`]: timezone-naive copy for spreadsheet output
//! - [`reduce()`]: column reductions (count/nulls/sum/min/max/mean)
//! - [`profile()`]: debug-mode dataset profiles built on [`reduce()`]
//!
//! ## Example: combine, then summarize
//!
//! ```rust
//! use parquet_convert::processing::{concat, reduce, ReduceOp};
//! use parquet_convert::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![Field::new("score", DataType::Float64)]);
//! let a = DataSet::new(schema.clone(), vec![vec![Value::Float64(1.5)]]);
//! let b = DataSet::new(schema, vec![vec![Value::Null], vec![Value::Float64(2.5)]]);
//!
//! let combined = concat(vec![a, b]).unwrap();
//! assert_eq!(combined.row_count(), 3);
//! assert_eq!(reduce(&combined, "score", ReduceOp::Sum), Some(Value::Float64(4.0)));
//! ```

pub mod concat;
pub mod normalize;
pub mod profile;
pub mod reduce;

pub use concat::concat;
pub use normalize::{has_timezone_values, strip_timezones};
pub use profile::{ColumnSummary, DatasetProfile, profile};
pub use reduce::{ReduceOp, reduce};
