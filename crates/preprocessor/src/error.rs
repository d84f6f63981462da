use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreprocessError {
    #[error("The {table} table has no '{column}' column")]
    MissingColumn { table: &'static str, column: String },

    /// `row` is the 1-based data row, not counting the header.
    #[error("Could not parse '{value}' in column '{column}' (row {row}): {reason}")]
    Parse {
        column: String,
        row: usize,
        value: String,
        reason: String,
    },
}
