use thiserror::Error;

use flumore_geom::DecompositionError;

/// Result type local to flumore-plugin.
pub type Result<T> = std::result::Result<T, PluginError>;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("dataset load: {0}")]
    Load(#[from] flumore_io::Error),

    #[error("geometry decomposition: {0}")]
    Decomposition(#[from] DecompositionError),

    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolViolation),

    #[error("invalid parameters: {0}")]
    Parameters(#[from] flumore_core::Error),
}

/// Calls made in an order the session protocol does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProtocolViolation {
    #[error("session is not open")]
    NotOpen,

    #[error("session is already open")]
    AlreadyOpen,

    #[error("schema requested from a session opened in data mode")]
    SchemaInDataMode,
}

/// Pass/fail summary for hosts that only track status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
}

impl Status {
    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success)
    }
}

impl<T, E> From<&std::result::Result<T, E>> for Status {
    fn from(result: &std::result::Result<T, E>) -> Self {
        if result.is_ok() {
            Status::Success
        } else {
            Status::Failure
        }
    }
}
