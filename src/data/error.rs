use thiserror::Error;

/// Problems found while turning a file into a [`Dataset`](super::model::Dataset).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{ext}")]
    UnsupportedExtension { ext: String },

    #[error("expected a top-level JSON array of records")]
    NotAnArray,

    #[error("row {row} is not a JSON object")]
    NotAnObject { row: usize },

    #[error("row {row}: missing required field '{field}'")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row}: cannot read '{value}' as a date")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: field '{field}' is not {expected}")]
    InvalidField {
        row: usize,
        field: &'static str,
        expected: &'static str,
    },

    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedColumnType { column: String, data_type: String },
}
