//! Subprocess Python strategy for the plugin contract.
//!
//! Each resolve or invoke runs a short shim through the configured
//! interpreter. The resolve shim loads the plugin file as a module and
//! fetches the attribute named after the file's base name; an absent
//! attribute lets the interpreter's own lookup error escape unmodified,
//! while a present but uncallable attribute is called so the natural type
//! error is what gets reported.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::capture::LogCapture;
use crate::error::RuntimeError;
use crate::plugin::{PluginHandle, PluginRuntime};

const RESOLVE_SHIM: &str = r"
import importlib.util, sys
path, name = sys.argv[1], sys.argv[2]
spec = importlib.util.spec_from_file_location(name, path)
module = importlib.util.module_from_spec(spec)
spec.loader.exec_module(module)
func = getattr(module, name)
if not callable(func):
    func()
";

const INVOKE_SHIM: &str = r"
import importlib.util, sys
path, name = sys.argv[1], sys.argv[2]
spec = importlib.util.spec_from_file_location(name, path)
module = importlib.util.module_from_spec(spec)
spec.loader.exec_module(module)
getattr(module, name)(*sys.argv[3:])
";

/// Runs plugin files through a Python interpreter subprocess.
#[derive(Debug, Clone)]
pub struct PythonRuntime {
    interpreter: PathBuf,
}

impl Default for PythonRuntime {
    fn default() -> Self {
        Self::new("python3")
    }
}

impl PythonRuntime {
    #[must_use]
    pub fn new(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    fn shim_command(&self, shim: &str, path: &Path, entry_point: &str) -> Command {
        let mut command = Command::new(&self.interpreter);
        command.arg("-c").arg(shim).arg(path).arg(entry_point);
        command
    }
}

impl PluginRuntime for PythonRuntime {
    fn resolve(&self, path: &Path, entry_point: &str) -> Result<PluginHandle, RuntimeError> {
        tracing::debug!(
            interpreter = %self.interpreter.display(),
            plugin = %path.display(),
            entry_point,
            "resolving plugin entry point"
        );
        let output = self.shim_command(RESOLVE_SHIM, path, entry_point).output()?;
        if output.status.success() {
            Ok(PluginHandle::new(path, entry_point))
        } else {
            Err(RuntimeError::Resolution {
                path: path.to_path_buf(),
                entry_point: entry_point.to_string(),
                detail: failure_detail(&output.stderr, &output.status.to_string()),
            })
        }
    }

    fn invoke(
        &self,
        handle: &PluginHandle,
        args: &[PathBuf],
        logs: &mut LogCapture,
    ) -> Result<(), RuntimeError> {
        let mut command = self.shim_command(INVOKE_SHIM, handle.path(), handle.entry_point());
        command.args(args);
        let output = command.output()?;
        logs.write_stdout(&output.stdout)?;
        logs.write_stderr(&output.stderr)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(RuntimeError::Invocation {
                path: handle.path().to_path_buf(),
                entry_point: handle.entry_point().to_string(),
                detail: failure_detail(&output.stderr, &output.status.to_string()),
            })
        }
    }
}

/// Last non-empty stderr line. For a Python failure this is the exception
/// line itself, e.g. `AttributeError: module 'foo' has no attribute 'foo'`.
fn last_error_line(stderr: &[u8]) -> Option<String> {
    String::from_utf8_lossy(stderr)
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

fn failure_detail(stderr: &[u8], status: &str) -> String {
    last_error_line(stderr).unwrap_or_else(|| format!("interpreter exited with {status}"))
}
