use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use modpipe_engine::transfer::{LocalDownloader, LocalUploader};
use modpipe_engine::EventDispatcher;
use modpipe_runtime::PythonRuntime;

pub fn execute(event_path: &Path, data_dir: &Path, output: &Path, python: &Path) -> Result<()> {
    let event = super::load_event(event_path)?;
    let dispatcher = EventDispatcher::new(
        Arc::new(LocalDownloader::new(data_dir)),
        Arc::new(LocalUploader::new(output)),
        Arc::new(PythonRuntime::new(python)),
    );
    dispatcher.handle(&event)?;
    tracing::info!(
        transaction = event.transaction.id,
        output = %output.display(),
        "event handled"
    );
    Ok(())
}
