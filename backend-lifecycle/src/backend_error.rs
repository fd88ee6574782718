use std::{io, path::PathBuf};

use thiserror::Error;

pub type BackendResult<T> = Result<T, BackendError>;

#[derive(Debug, Error)]
pub enum BackendError {
    /// The running executable's location could not be turned into a
    /// companion path.
    #[error("failed to resolve companion backend path: {0}")]
    PathResolution(String),

    #[error("failed to spawn backend process {}: {source}", .program.display())]
    ProcessCreation {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("backend process is already running (pid {pid})")]
    AlreadyRunning { pid: u32 },

    #[error("invalid backend configuration: {0}")]
    Config(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl BackendError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
