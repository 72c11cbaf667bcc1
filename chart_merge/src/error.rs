use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Fatal errors: any of these aborts the stage before its output is written.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{} not found.", path.display())]
    MissingInputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Table error: {0}")]
    Polars(#[from] PolarsError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An optional column was absent, so the transform tied to it was skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{column}' column not found in the data.")]
pub struct MissingColumn {
    pub column: String,
}

impl MissingColumn {
    pub fn new(column: &str) -> Self {
        Self {
            column: column.to_string(),
        }
    }
}
