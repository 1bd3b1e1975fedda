use thiserror::Error;

/// Every way the load → normalize → view → chart pipeline can fail.
///
/// None of these are retried: the dashboard either renders a complete view or
/// reports the first failure.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DashboardError {
    /// The source could not be fetched, read, or parsed as CSV.
    #[error("source unavailable ({source_name}): {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    /// A canonical column is missing from the raw headers.
    #[error("missing column '{0}'")]
    MissingColumn(String),

    /// A cell failed numeric coercion.
    #[error("malformed value '{value}' in column '{column}' (row {row})")]
    MalformedData {
        column: String,
        /// 1-based data row, header excluded.
        row: usize,
        value: String,
    },

    /// A UI control yielded a value outside its enumeration.
    #[error("invalid selection '{value}' for {control}")]
    InvalidSelector { control: String, value: String },
}

impl DashboardError {
    pub(crate) fn source_unavailable(source_name: &str, reason: impl ToString) -> Self {
        DashboardError::SourceUnavailable {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }
}
