//! Scoped console-output capture.
//!
//! Each pipeline step writes its console output into a dedicated
//! `<prefix>stdout.log` / `<prefix>stderr.log` pair inside the artifact
//! area. The sink is an explicit value handed to the step, never a
//! process-global stream.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::RuntimeError;

/// Whether a capture pair truncates or extends existing log files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    Overwrite,
    Append,
}

/// An open stdout/stderr log pair for one pipeline step.
///
/// Both files are created on open, so the pair is present in the artifact
/// tree even when the step stays silent.
#[derive(Debug)]
pub struct LogCapture {
    stdout: File,
    stderr: File,
}

impl LogCapture {
    /// Open `<prefix>stdout.log` and `<prefix>stderr.log` under `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if either log file cannot be opened.
    pub fn open(dir: &Path, prefix: &str, mode: CaptureMode) -> Result<Self, RuntimeError> {
        Ok(Self {
            stdout: open_log(dir, prefix, "stdout.log", mode)?,
            stderr: open_log(dir, prefix, "stderr.log", mode)?,
        })
    }

    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write_stdout(&mut self, bytes: &[u8]) -> Result<(), RuntimeError> {
        self.stdout.write_all(bytes)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write_stderr(&mut self, bytes: &[u8]) -> Result<(), RuntimeError> {
        self.stderr.write_all(bytes)?;
        Ok(())
    }
}

fn open_log(dir: &Path, prefix: &str, name: &str, mode: CaptureMode) -> Result<File, RuntimeError> {
    let path = dir.join(format!("{prefix}{name}"));
    let file = match mode {
        CaptureMode::Overwrite => File::create(path)?,
        CaptureMode::Append => OpenOptions::new().create(true).append(true).open(path)?,
    };
    Ok(file)
}
