//! Convert dense CSV tables into the sparse "matrix" text format, optionally
//! extracting one column as a label vector and recoding it into dense
//! category codes.

pub mod config;
pub mod convert;
pub mod data;
pub mod error;

pub use config::{ConvertConfig, LabelMode};
pub use convert::{convert_file, convert_table, ConversionSummary, OutputPaths};
pub use error::{ConvertError, Result};
