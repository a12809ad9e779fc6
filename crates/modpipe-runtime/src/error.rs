//! Runtime error types.

use std::path::PathBuf;

/// Errors from the plugin runtime layer.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The designated entry point could not be resolved from the plugin file.
    #[error("failed to resolve entry point '{entry_point}' in '{}': {detail}", path.display())]
    Resolution {
        path: PathBuf,
        entry_point: String,
        detail: String,
    },

    /// The resolved entry point failed during invocation.
    #[error("entry point '{entry_point}' in '{}' failed: {detail}", path.display())]
    Invocation {
        path: PathBuf,
        entry_point: String,
        detail: String,
    },

    /// I/O error (log sinks, interpreter spawn).
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_error_names_file_and_entry_point() {
        let err = RuntimeError::Resolution {
            path: PathBuf::from("/tmp/run/models/combine.py"),
            entry_point: "combine".to_string(),
            detail: "AttributeError: module 'combine' has no attribute 'combine'".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("combine.py"));
        assert!(message.contains("AttributeError"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = RuntimeError::from(io_err);
        assert!(err.to_string().contains("gone"));
    }
}
