use crate::error::PreprocessError;
use configuration::ParsingConfig;
use core_types::DerivedFields;
use loader::RawTable;

/// Column positions in the trade log, resolved once from the header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeColumns {
    pub timestamp: usize,
    pub side: usize,
    pub performance: PerformanceColumns,
}

/// Whether the trade log can feed the derived fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PerformanceColumns {
    Present { pnl: usize, size: usize },
    /// One or both source columns are absent. Whichever exists is still read.
    Missing {
        pnl: Option<usize>,
        size: Option<usize>,
        absent: Vec<String>,
    },
}

impl PerformanceColumns {
    pub fn pnl(&self) -> Option<usize> {
        match self {
            PerformanceColumns::Present { pnl, .. } => Some(*pnl),
            PerformanceColumns::Missing { pnl, .. } => *pnl,
        }
    }

    pub fn size(&self) -> Option<usize> {
        match self {
            PerformanceColumns::Present { size, .. } => Some(*size),
            PerformanceColumns::Missing { size, .. } => *size,
        }
    }

    /// The table-level derived-field decision these columns lead to.
    pub fn derived_fields(&self) -> DerivedFields {
        match self {
            PerformanceColumns::Present { .. } => DerivedFields::Computed,
            PerformanceColumns::Missing { absent, .. } => DerivedFields::MissingDerivedFields {
                absent: absent.clone(),
            },
        }
    }
}

impl TradeColumns {
    pub fn resolve(table: &RawTable, parsing: &ParsingConfig) -> Result<Self, PreprocessError> {
        let timestamp = required(table, "trade", &parsing.timestamp_column)?;
        let side = required(table, "trade", &parsing.side_column)?;

        let pnl = table.column(&parsing.pnl_column);
        let size = table.column(&parsing.size_column);
        let performance = match (pnl, size) {
            (Some(pnl), Some(size)) => PerformanceColumns::Present { pnl, size },
            _ => {
                let absent = [(pnl, &parsing.pnl_column), (size, &parsing.size_column)]
                    .into_iter()
                    .filter(|(index, _)| index.is_none())
                    .map(|(_, name)| name.clone())
                    .collect();
                PerformanceColumns::Missing { pnl, size, absent }
            }
        };

        Ok(Self {
            timestamp,
            side,
            performance,
        })
    }
}

/// Column positions in the sentiment index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentimentColumns {
    pub date: usize,
    /// Header of the column used as the date key, for messages.
    pub date_name: String,
    pub classification: usize,
}

impl SentimentColumns {
    /// The date column is looked up by name and falls back to the first column.
    pub fn resolve(table: &RawTable, parsing: &ParsingConfig) -> Result<Self, PreprocessError> {
        let date = table
            .column_or_first(&parsing.sentiment_date_column)
            .ok_or_else(|| PreprocessError::MissingColumn {
                table: "sentiment",
                column: parsing.sentiment_date_column.clone(),
            })?;
        let date_name = table.headers[date].clone();
        if date_name != parsing.sentiment_date_column {
            tracing::debug!(
                expected = %parsing.sentiment_date_column,
                using = %date_name,
                "Sentiment date column not found by name, using the first column"
            );
        }

        let classification = required(table, "sentiment", &parsing.classification_column)?;

        Ok(Self {
            date,
            date_name,
            classification,
        })
    }
}

fn required(table: &RawTable, name: &'static str, column: &str) -> Result<usize, PreprocessError> {
    table.column(column).ok_or_else(|| PreprocessError::MissingColumn {
        table: name,
        column: column.to_string(),
    })
}
