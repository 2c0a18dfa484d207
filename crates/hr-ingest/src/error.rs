use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// A required column is absent from the table header.
    #[error("required column {field:?} is missing from the input table")]
    MissingColumn { field: String },

    /// Filtering and coercion left nothing to play back.
    #[error("no matching records for model {model_filter:?}")]
    EmptyResult { model_filter: String },

    #[error("unsupported input format {0:?}: expected .csv, .json or .xlsx")]
    UnsupportedFormat(String),

    #[error("table parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Excel error: {0}")]
    Xlsx(#[from] calamine::XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type IngestResult<T> = Result<T, IngestError>;
