use analytics::AnalyticsError;
use loader::LoaderError;
use preprocessor::PreprocessError;
use reporter::ReportError;
use thiserror::Error;

/// The closed set of ways a run can fail. Callers decide what each means for
/// the process (exit code, retry, alert).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An input file does not exist.
    MissingFile,
    /// An input file exists but its contents could not be read as expected.
    Parse,
    /// No trade matched a sentiment date, so there is nothing to report.
    EmptyResult,
    /// A column needed by the join or the aggregation is absent.
    MissingColumn,
    /// The filesystem refused a read or write.
    Io,
    /// An invariant broke inside a calculation.
    Internal,
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),

    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error("No trades matched a sentiment date ({trades_total} trades read)")]
    EmptyResult { trades_total: usize },

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Load(LoaderError::MissingFile { .. }) => ErrorKind::MissingFile,
            PipelineError::Load(e) if e.is_io() => ErrorKind::Io,
            PipelineError::Load(_) => ErrorKind::Parse,
            PipelineError::Preprocess(PreprocessError::MissingColumn { .. }) => ErrorKind::MissingColumn,
            PipelineError::Preprocess(PreprocessError::Parse { .. }) => ErrorKind::Parse,
            PipelineError::EmptyResult { .. } => ErrorKind::EmptyResult,
            PipelineError::Analytics(AnalyticsError::MissingColumn(_)) => ErrorKind::MissingColumn,
            PipelineError::Analytics(AnalyticsError::NotEnoughData(_)) => ErrorKind::EmptyResult,
            PipelineError::Analytics(_) => ErrorKind::Internal,
            PipelineError::Report(_) => ErrorKind::Io,
        }
    }
}
