use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: {0}")]
    NotEnoughData(String),

    #[error("Required column is missing from the merged data: {0}")]
    MissingColumn(String),

    #[error("An unexpected error occurred during analytics calculation: {0}")]
    InternalError(String),

    #[error("Error in calculation: {0}")]
    Calculation(String),
}
