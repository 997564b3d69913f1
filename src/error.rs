use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a run. Per-row anomalies never reach this type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("column '{column}' not found in {}", .path.display())]
    MissingColumn { column: String, path: PathBuf },
    #[error(
        "{}: line {line}: row has {fields} fields but the header has {expected}",
        .path.display()
    )]
    RowTooLong {
        path: PathBuf,
        line: u64,
        fields: usize,
        expected: usize,
    },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("annotator error: {0}")]
    Annotator(String),
    #[error("{}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Error::Csv {
            path: path.into(),
            source,
        }
    }
}
