//! # Input Loader
//!
//! Reads the trade log and the fear & greed index into `RawTable`s. This is
//! the only crate that touches the input files; it fails fast with a
//! remediation hint when either is absent.

use configuration::DataPaths;
use csv::{ReaderBuilder, Trim};
use std::io;
use std::path::Path;

pub mod error;
pub mod table;

pub use error::LoaderError;
pub use table::RawTable;

const MISSING_FILE_HINT: &str =
    "Place the file at this path, point the config at it, or run `sentiment-report generate` to create sample data.";

/// Reads a comma-separated file with a header row.
pub fn load_table(path: &Path) -> Result<RawTable, LoaderError> {
    if !path.exists() {
        return Err(missing_file(path));
    }

    let mut reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .from_path(path)
        .map_err(|e| read_error(path, e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| read_error(path, e))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();
    if headers.is_empty() {
        return Err(LoaderError::NoHeader {
            path: path.to_path_buf(),
        });
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| read_error(path, e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), columns = headers.len(), "Loaded table");
    Ok(RawTable::new(path, headers, rows))
}

/// Loads the trade log and the sentiment index, in that order.
pub fn load_inputs(paths: &DataPaths) -> Result<(RawTable, RawTable), LoaderError> {
    let trades = load_logged(&paths.trades_path)?;
    let sentiment = load_logged(&paths.sentiment_path)?;
    tracing::info!(
        trades = trades.len(),
        sentiment_days = sentiment.len(),
        "Loaded input tables"
    );
    Ok((trades, sentiment))
}

fn load_logged(path: &Path) -> Result<RawTable, LoaderError> {
    load_table(path).inspect_err(|e| match e {
        LoaderError::MissingFile { path, hint } => {
            tracing::error!(path = %path.display(), "Input file not found");
            tracing::error!("{hint}");
        }
        other => tracing::error!("{other}"),
    })
}

fn missing_file(path: &Path) -> LoaderError {
    LoaderError::MissingFile {
        path: path.to_path_buf(),
        hint: MISSING_FILE_HINT.to_string(),
    }
}

fn read_error(path: &Path, source: csv::Error) -> LoaderError {
    // The file can vanish between the existence check and the open.
    if let csv::ErrorKind::Io(io_err) = source.kind() {
        if io_err.kind() == io::ErrorKind::NotFound {
            return missing_file(path);
        }
    }
    LoaderError::Read {
        path: path.to_path_buf(),
        source,
    }
}
