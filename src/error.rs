use std::io;

/// Errors raised while reading a table or writing the matrix artifacts.
///
/// Row and column numbers are 1-based: `row` counts data rows (the header
/// is not counted) and `column` is the original CSV column position.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}, column {column}: '{value}' is not a number")]
    InvalidNumber {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("row {row}, column {column}: '{value}' is not a usable categorical label")]
    InvalidLabel {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
