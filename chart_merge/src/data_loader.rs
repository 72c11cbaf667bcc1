use crate::error::{PipelineError, Result};
use log::info;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Reads and writes the pipeline's CSV tables.
#[derive(Default)]
pub struct DataLoader;

impl DataLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a headed CSV file. A file that cannot be opened is fatal.
    pub fn load_csv(&self, path: &Path) -> Result<DataFrame> {
        let file = File::open(path).map_err(|source| PipelineError::MissingInputFile {
            path: path.to_path_buf(),
            source,
        })?;

        // Types come from every row, so a float that first shows up deep in
        // the file does not break parsing.
        let df = CsvReader::new(file)
            .has_header(true)
            .infer_schema(None)
            .finish()?;

        info!("Successfully loaded {}", path.display());
        Ok(df)
    }

    /// Write `df` with a header row; nulls become empty fields.
    pub fn write_csv(&self, df: &mut DataFrame, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        CsvWriter::new(file).has_header(true).finish(df)?;

        info!("Processed data saved to {}", path.display());
        Ok(())
    }
}
