//! The staging/execution state machine for one event.
//!
//! Steps run strictly in order: download plugins, resolve entry points,
//! download inputs, rewrite configs, write config files, invoke plugins,
//! upload. Both temporary areas and all staged files are scoped to one
//! `handle` call and removed on every exit path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tempfile::TempDir;

use modpipe_runtime::{CaptureMode, LogCapture, PluginHandle, PluginRuntime};
use modpipe_types::event::{Event, FileEntry};
use modpipe_types::DispatchError;

use crate::classify::{classify_files, ClassifiedFiles};
use crate::config::validator::validated_configs;
use crate::error::PipelineError;
use crate::stage::{stage_configs, write_audit_configs, write_staged_configs};
use crate::transfer::{Downloader, Uploader};

/// Drives one event through download, staging, plugin invocation, and
/// upload. Collaborators are injected so the transport and byte-moving
/// services stay outside the core.
pub struct EventDispatcher {
    downloader: Arc<dyn Downloader>,
    uploader: Arc<dyn Uploader>,
    runtime: Arc<dyn PluginRuntime>,
}

impl EventDispatcher {
    #[must_use]
    pub fn new(
        downloader: Arc<dyn Downloader>,
        uploader: Arc<dyn Uploader>,
        runtime: Arc<dyn PluginRuntime>,
    ) -> Self {
        Self {
            downloader,
            uploader,
            runtime,
        }
    }

    /// Handle one event end to end.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Dispatch`] for the terminal conditions (missing or
    /// invalid configuration, invalid model);
    /// [`PipelineError::Infrastructure`] for host-side failures. In both
    /// cases every temporary resource acquired so far is released.
    pub fn handle(&self, event: &Event) -> Result<(), PipelineError> {
        let configs = validated_configs(&event.key_values)?;
        let ClassifiedFiles { inputs, models } = classify_files(&configs, &event.files);
        tracing::info!(
            transaction = event.transaction.id,
            configs = configs.len(),
            inputs = inputs.len(),
            models = models.len(),
            "event accepted"
        );

        let download_area = TempDir::new().context("failed to create download area")?;
        let upload_area = TempDir::new().context("failed to create upload area")?;

        let model_paths = {
            let mut logs =
                LogCapture::open(upload_area.path(), "download-", CaptureMode::Overwrite)
                    .context("failed to open download logs")?;
            self.downloader
                .materialize(download_area.path(), &models, &mut logs)
                .context("failed to materialize model files")?
        };
        let handles = self.resolve_models(&models, &model_paths)?;
        tracing::info!(count = handles.len(), "model entry points resolved");

        let input_paths = {
            let mut logs = LogCapture::open(upload_area.path(), "download-", CaptureMode::Append)
                .context("failed to reopen download logs")?;
            self.downloader
                .materialize(download_area.path(), &inputs, &mut logs)
                .context("failed to materialize input files")?
        };

        let staged = stage_configs(&configs, &input_paths, upload_area.path())?;
        write_audit_configs(&configs, upload_area.path())?;
        let staged_paths = write_staged_configs(&staged)?;
        let staged_args: Vec<PathBuf> = staged_paths.iter().map(|p| p.to_path_buf()).collect();

        self.invoke_models(&models, &handles, &staged_args, upload_area.path())?;
        // Staged config files are gone before anything is uploaded.
        drop(staged_paths);

        let receipt = {
            let mut logs = LogCapture::open(upload_area.path(), "upload-", CaptureMode::Overwrite)
                .context("failed to open upload logs")?;
            self.uploader
                .upload(
                    upload_area.path(),
                    &event.transaction,
                    &[event.transaction.linkage_key_value()],
                    &mut logs,
                )
                .context("artifact upload failed")?
        };
        tracing::info!(
            transaction = event.transaction.id,
            bundle = %receipt.bundle,
            job_id = receipt.job_id,
            state = %receipt.state,
            "artifact directory uploaded"
        );

        Ok(())
    }

    /// Resolve one entry point per model file, named after the file's base
    /// name. Any failure aborts the whole run.
    fn resolve_models(
        &self,
        models: &[FileEntry],
        model_paths: &[PathBuf],
    ) -> Result<Vec<PluginHandle>, PipelineError> {
        let mut handles = Vec::with_capacity(models.len());
        for (file, local_path) in models.iter().zip(model_paths) {
            let handle = self
                .runtime
                .resolve(local_path, file.stem())
                .map_err(|reason| DispatchError::InvalidModel {
                    path: file.path.clone(),
                    reason: reason.into(),
                })?;
            tracing::debug!(model = %file.path, entry_point = handle.entry_point(), "entry point resolved");
            handles.push(handle);
        }
        Ok(handles)
    }

    /// Invoke every resolved entry point sequentially, each with the full
    /// staged-config path list. The first failure aborts the rest.
    fn invoke_models(
        &self,
        models: &[FileEntry],
        handles: &[PluginHandle],
        staged_args: &[PathBuf],
        upload_dir: &Path,
    ) -> Result<(), PipelineError> {
        let mut logs = LogCapture::open(upload_dir, "", CaptureMode::Overwrite)
            .context("failed to open invocation logs")?;
        for (file, handle) in models.iter().zip(handles) {
            tracing::info!(model = %file.path, "invoking model");
            self.runtime
                .invoke(handle, staged_args, &mut logs)
                .map_err(|reason| DispatchError::InvalidModel {
                    path: file.path.clone(),
                    reason: reason.into(),
                })?;
        }
        Ok(())
    }
}
