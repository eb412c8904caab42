//! Errors returned to the host when a file cannot be turned into a module.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Lex or parse errors; they have already been reported.
    #[error("{}: syntax error", path.display())]
    Syntax { path: PathBuf },

    /// The path cannot be bound as a string.
    #[error("{}: path is not valid UTF-8", path.display())]
    Encoding { path: PathBuf },

    /// Evaluation failed; the error has already been reported.
    #[error("{}: evaluation failed", path.display())]
    Eval { path: PathBuf },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Io { path, .. }
            | LoadError::Syntax { path }
            | LoadError::Encoding { path }
            | LoadError::Eval { path } => path.as_path(),
        }
    }
}
