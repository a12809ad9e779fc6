//! Plugin execution substrate for modpipe.
//!
//! Provides the resolve/invoke contract model plugins are driven through,
//! a subprocess Python strategy, and the scoped log-capture sink each
//! pipeline step writes console output into.

pub mod capture;
pub mod error;
pub mod plugin;
pub mod python;

pub use capture::{CaptureMode, LogCapture};
pub use error::RuntimeError;
pub use plugin::{PluginHandle, PluginRuntime};
pub use python::PythonRuntime;
