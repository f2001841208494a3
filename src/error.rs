use std::io;
use std::path::PathBuf;
use thiserror::Error;

// Fatal failures of an export run. Per-period fetch problems are not errors: they are logged and skipped.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to read credentials: {0}")]
    Credentials(#[source] io::Error),

    #[error("invalid {key}: {source}")]
    Config {
        key: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("could not write to {}: {source}", path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}
