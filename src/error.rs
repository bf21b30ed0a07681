use thiserror::Error;

/// Failures reported by a transport collaborator while fetching a remote
/// boundary slice. The core never retries; it hands these back unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("Timed out waiting for boundary data from unit {owner}")]
    Timeout { owner: usize },

    #[error("Boundary data from unit {owner} was lost in transit")]
    Lost { owner: usize },

    #[error("No route to unit {owner}: tile ({i}, {j}) is not reachable")]
    Unreachable { owner: usize, i: usize, j: usize },

    #[error("Fatal transport failure: {0}")]
    Fatal(String),
}

impl TransportError {
    /// Timeouts and lost messages may succeed if the caller re-runs the step.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransportError::Timeout { .. } | TransportError::Lost { .. }
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PicError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Tile ({i}, {j}) is already registered")]
    DuplicateTile { i: usize, j: usize },

    #[error("Tile {0} not found")]
    NotFound(String),

    #[error("Index {index} out of range [-1, {n}] along axis {axis}")]
    IndexOutOfRange { axis: usize, index: isize, n: usize },

    #[error("Topology error: tile ({i}, {j}) is owned locally but not registered")]
    Topology { i: usize, j: usize },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, PicError>;
