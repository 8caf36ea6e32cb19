//! Load failures. Malformed rows are not errors: they are dropped.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a dataset from loading at all
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source file could not be opened or inspected.
    #[error("opening {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required column is absent from the header row.
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    /// CSV framing or encoding error.
    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),
}
