//! CLI subcommand implementations.

pub mod check;
pub mod handle;

use std::path::Path;

use anyhow::{Context, Result};

use modpipe_types::Event;

pub(crate) fn load_event(path: &Path) -> Result<Event> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read event bundle '{}'", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("malformed event bundle '{}'", path.display()))
}
