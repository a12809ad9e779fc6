//! Pipeline error model.

use modpipe_types::DispatchError;

/// Error from one event-handling run.
///
/// `Dispatch` carries the typed terminal conditions (missing or invalid
/// configuration, invalid model). `Infrastructure` wraps host-side failures
/// (I/O, malformed counter metadata) that sit outside the dispatch taxonomy.
#[derive(Debug)]
pub enum PipelineError {
    Dispatch(DispatchError),
    Infrastructure(anyhow::Error),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dispatch(e) => write!(f, "{e}"),
            Self::Infrastructure(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<DispatchError> for PipelineError {
    fn from(e: DispatchError) -> Self {
        Self::Dispatch(e)
    }
}

impl From<anyhow::Error> for PipelineError {
    fn from(e: anyhow::Error) -> Self {
        Self::Infrastructure(e)
    }
}

impl PipelineError {
    /// Returns the typed dispatch condition if this is a `Dispatch` error.
    #[must_use]
    pub fn as_dispatch(&self) -> Option<&DispatchError> {
        match self {
            Self::Dispatch(e) => Some(e),
            Self::Infrastructure(_) => None,
        }
    }
}
