use std::path::PathBuf;

/// An in-memory copy of one delimited input file.
///
/// Cells are kept as text; typing happens in the preprocessor once the
/// columns it needs have been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(path: impl Into<PathBuf>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            path: path.into(),
            headers,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column with exactly this header.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of the named column, or of the first column when no header matches.
    ///
    /// Returns `None` only for a table without columns.
    pub fn column_or_first(&self, name: &str) -> Option<usize> {
        self.column(name)
            .or_else(|| (!self.headers.is_empty()).then_some(0))
    }

    /// All values of one column, in row order. Short rows yield "".
    pub fn values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(String::as_str).unwrap_or(""))
    }
}
