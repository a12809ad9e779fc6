//! The resolve/invoke contract model plugins are driven through.

use std::path::{Path, PathBuf};

use crate::capture::LogCapture;
use crate::error::RuntimeError;

/// A resolved plugin entry point, valid for one handler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginHandle {
    path: PathBuf,
    entry_point: String,
}

impl PluginHandle {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, entry_point: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            entry_point: entry_point.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }
}

/// Strategy for resolving and invoking plugin entry points.
///
/// The pipeline depends only on this contract; the mechanism behind it (an
/// interpreter subprocess, dynamic loading, FFI) is interchangeable.
pub trait PluginRuntime: Send + Sync {
    /// Resolve the entry point named `entry_point` from the plugin file at
    /// `path`.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::Resolution`] when the file cannot be loaded, the
    /// entry point is absent, or the resolved value is not invocable.
    fn resolve(&self, path: &Path, entry_point: &str) -> Result<PluginHandle, RuntimeError>;

    /// Invoke a resolved entry point with positional path arguments,
    /// capturing console output into `logs`.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::Invocation`] when the entry point fails.
    fn invoke(
        &self,
        handle: &PluginHandle,
        args: &[PathBuf],
        logs: &mut LogCapture,
    ) -> Result<(), RuntimeError>;
}
