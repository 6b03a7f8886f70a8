use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating and reading filter definition files.
///
/// A missing or unreadable filter file is the only hard failure in this
/// crate: without the definition text there is nothing to extract. Broken
/// rule fragments inside an existing file are not errors; they surface as
/// [`CompileDiagnostic`](super::CompileDiagnostic) entries instead.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Filter file not found: {}", .path.display())]
    MissingInput { path: PathBuf },

    #[error("Failed to read filter file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
