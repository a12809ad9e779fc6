//! Terminal dispatch conditions.
//!
//! All three variants are terminal for the current event: no retry happens
//! inside the pipeline, and the caller (the surrounding task runtime)
//! decides requeue policy. Temporary resources are still released on the
//! way out.

use std::fmt;

use crate::config::ConfigBlock;

/// A condition that terminates handling of one event.
#[derive(Debug)]
pub enum DispatchError {
    /// A required configuration identifier was absent from the assembled map.
    ConfigNotFound { config_id: String },
    /// An assembled block failed schema validation.
    InvalidConfig {
        config_id: String,
        config: ConfigBlock,
    },
    /// A plugin file failed to resolve, was not invocable, or raised during
    /// invocation.
    InvalidModel { path: String, reason: anyhow::Error },
}

fn escape_quotes(value: &str) -> String {
    value.replace('\'', "\\'")
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigNotFound { config_id } => {
                write!(
                    f,
                    "proxymod configuration '{}' not found",
                    escape_quotes(config_id)
                )
            }
            Self::InvalidConfig { config_id, .. } => {
                write!(
                    f,
                    "proxymod configuration '{}' is invalid",
                    escape_quotes(config_id)
                )
            }
            Self::InvalidModel { path, reason } => {
                write!(
                    f,
                    "proxymod model for file '{}' is invalid: {}",
                    escape_quotes(path),
                    reason
                )
            }
        }
    }
}

impl std::error::Error for DispatchError {}
