//! Crate-level error type.

use crate::config::ConfigError;
use crate::crypto::VerifyError;
use crate::worker::QueueClosed;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Verification failed: {0}")]
    Verify(#[from] VerifyError),

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Task queue closed before the search finished")]
    QueueClosed,
}

impl From<QueueClosed> for Error {
    fn from(_: QueueClosed) -> Self {
        Error::QueueClosed
    }
}
