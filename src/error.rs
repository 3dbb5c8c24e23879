use thiserror::Error;

pub const REQUIRED_COLUMNS: [&str; 3] = ["month", "revenue", "expenses"];

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Please upload a valid CSV file.")]
    InvalidFileType,

    #[error("Parsing error: {0}")]
    MalformedInput(String),

    #[error("CSV file is empty or improperly formatted.")]
    EmptyInput,

    #[error("Missing required columns. CSV must contain: {required}.")]
    MissingColumns { required: String },

    #[error("Row {row} in your CSV is missing a value for the \"Month\" column.")]
    MissingMonthValue { row: usize },

    #[error("Row {index} does not exist (dataset has {len} rows)")]
    RecordIndexOutOfRange { index: usize, len: usize },

    #[error("Analysis failed: {0}")]
    AnalysisFailure(String),

    #[error("Failed to fetch forecast data: {0}")]
    ForecastFailure(String),

    #[error("Document request failed: {0}")]
    DocumentFailure(String),

    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    HttpError(#[source] reqwest::Error),
}

/// Request URLs can carry credentials or user identifiers, so they are
/// dropped before the error is stored.
#[cfg(feature = "gemini")]
impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.without_url())
    }
}

impl AssistantError {
    pub fn missing_columns() -> Self {
        Self::MissingColumns {
            required: REQUIRED_COLUMNS.join(", "),
        }
    }

    /// True for the rejections produced while loading an upload.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidFileType
                | Self::MalformedInput(_)
                | Self::EmptyInput
                | Self::MissingColumns { .. }
                | Self::MissingMonthValue { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_names_required_set() {
        let err = AssistantError::missing_columns();
        assert_eq!(
            err.to_string(),
            "Missing required columns. CSV must contain: month, revenue, expenses."
        );
        assert!(err.is_load_error());
    }

    #[test]
    fn test_remote_failures_are_not_load_errors() {
        assert!(!AssistantError::AnalysisFailure("bad json".into()).is_load_error());
        assert!(!AssistantError::ForecastFailure("status 500".into()).is_load_error());
        assert!(!AssistantError::DocumentFailure("Upload failed".into()).is_load_error());
        assert!(!AssistantError::RecordIndexOutOfRange { index: 4, len: 2 }.is_load_error());
    }
}
