use datafusion::common::DataFusionError;
use thiserror::Error;

/// Errors raised while binding a scan or copy, before any record I/O starts.
///
/// Every variant is terminal for its operation: nothing is retried, and no
/// scan or write state is created once binding has failed.
#[derive(Debug, Error)]
pub enum BindError {
    /// A glob pattern matched no files.
    #[error("no files found for glob: {pattern}")]
    FileSetEmpty {
        /// The pattern that matched nothing.
        pattern: String,
    },

    /// A literal input path does not exist.
    #[error("file not found: {path}")]
    FileNotFound {
        /// The missing path.
        path: String,
    },

    /// The glob pattern itself could not be parsed.
    #[error("invalid file pattern {pattern}: {source}")]
    InvalidPattern {
        /// The malformed pattern.
        pattern: String,
        /// The underlying pattern error.
        #[source]
        source: glob::PatternError,
    },

    /// The filesystem failed while expanding a glob.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path that could not be read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A copy input schema is not one of the accepted column shapes.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A copy destination already exists; output files are never overwritten.
    #[error("destination already exists: {path}")]
    DestinationExists {
        /// The occupied output path.
        path: String,
    },
}

impl From<BindError> for DataFusionError {
    fn from(e: BindError) -> Self {
        DataFusionError::External(Box::new(e))
    }
}
