use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file not found: {}. {hint}", path.display())]
    MissingFile { path: PathBuf, hint: String },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} has no header row", path.display())]
    NoHeader { path: PathBuf },
}

impl LoaderError {
    /// `true` when the underlying failure came from the filesystem rather than the file's contents.
    pub fn is_io(&self) -> bool {
        matches!(self, LoaderError::Read { source, .. } if matches!(source.kind(), csv::ErrorKind::Io(_)))
    }
}
