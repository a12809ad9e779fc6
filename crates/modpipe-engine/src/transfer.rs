//! Collaborator boundary for moving file bytes in and out of a run.
//!
//! The remote services that actually move bytes live outside this crate;
//! the pipeline sees only these traits. The local-filesystem
//! implementations serve tests and single-machine runs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use modpipe_runtime::LogCapture;
use modpipe_types::event::{FileEntry, Transaction, TransactionKeyValue};

/// Receipt returned by an uploader for one artifact bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub bundle: String,
    pub job_id: i64,
    pub state: String,
}

/// Materializes file bytes into a run's download area.
pub trait Downloader: Send + Sync {
    /// Fetch `files` into `target_dir`, returning the local path of each
    /// file in the same order as the input slice.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be materialized.
    fn materialize(
        &self,
        target_dir: &Path,
        files: &[FileEntry],
        logs: &mut LogCapture,
    ) -> Result<Vec<PathBuf>>;
}

/// Uploads a finished artifact directory together with transaction identity.
pub trait Uploader: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the upload fails.
    fn upload(
        &self,
        source_dir: &Path,
        transaction: &Transaction,
        key_values: &[TransactionKeyValue],
        logs: &mut LogCapture,
    ) -> Result<UploadReceipt>;
}

/// Downloader serving file bytes from a local base directory.
#[derive(Debug, Clone)]
pub struct LocalDownloader {
    base_dir: PathBuf,
}

impl LocalDownloader {
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl Downloader for LocalDownloader {
    fn materialize(
        &self,
        target_dir: &Path,
        files: &[FileEntry],
        logs: &mut LogCapture,
    ) -> Result<Vec<PathBuf>> {
        let mut local_paths = Vec::with_capacity(files.len());
        for file in files {
            let relative = match &file.subdir {
                Some(subdir) => Path::new(subdir).join(&file.name),
                None => PathBuf::from(&file.name),
            };
            let source = self.base_dir.join(&relative);
            let target = target_dir.join(&relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create download subdir '{}'", parent.display())
                })?;
            }
            fs::copy(&source, &target).with_context(|| {
                format!("failed to materialize '{}'", source.display())
            })?;
            logs.write_stdout(format!("downloaded {}\n", relative.display()).as_bytes())?;
            local_paths.push(target);
        }
        tracing::debug!(count = local_paths.len(), "materialized files locally");
        Ok(local_paths)
    }
}

/// Uploader copying the artifact tree into a local target directory.
#[derive(Debug, Clone)]
pub struct LocalUploader {
    target_dir: PathBuf,
}

impl LocalUploader {
    #[must_use]
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
        }
    }
}

impl Uploader for LocalUploader {
    fn upload(
        &self,
        source_dir: &Path,
        transaction: &Transaction,
        key_values: &[TransactionKeyValue],
        logs: &mut LogCapture,
    ) -> Result<UploadReceipt> {
        fs::create_dir_all(&self.target_dir).with_context(|| {
            format!("failed to create upload target '{}'", self.target_dir.display())
        })?;
        let copied = copy_tree(source_dir, &self.target_dir)?;
        for kv in key_values {
            logs.write_stdout(format!("{} = {}\n", kv.key, kv.value).as_bytes())?;
        }
        logs.write_stdout(
            format!("uploaded {copied} entries for transaction {}\n", transaction.id).as_bytes(),
        )?;
        Ok(UploadReceipt {
            bundle: format!("transaction-{}", transaction.id),
            job_id: transaction.id,
            state: "OK".to_string(),
        })
    }
}

fn copy_tree(source: &Path, target: &Path) -> Result<usize> {
    let mut copied = 0;
    for entry in fs::read_dir(source)
        .with_context(|| format!("failed to read upload source '{}'", source.display()))?
    {
        let entry = entry?;
        let source_path = entry.path();
        let target_path = target.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            fs::create_dir_all(&target_path)?;
            copied += copy_tree(&source_path, &target_path)?;
        } else {
            fs::copy(&source_path, &target_path).with_context(|| {
                format!("failed to copy artifact '{}'", source_path.display())
            })?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use modpipe_runtime::CaptureMode;

    fn entry(name: &str, subdir: Option<&str>) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            subdir: subdir.map(str::to_string),
            mimetype: "text/csv".to_string(),
            path: name.to_string(),
        }
    }

    #[test]
    fn local_downloader_copies_in_order() {
        let base = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        let logs_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(base.path().join("data")).unwrap();
        std::fs::write(base.path().join("data/b.csv"), "b").unwrap();
        std::fs::write(base.path().join("data/a.csv"), "a").unwrap();

        let mut logs = LogCapture::open(logs_dir.path(), "download-", CaptureMode::Overwrite).unwrap();
        let downloader = LocalDownloader::new(base.path());
        let paths = downloader
            .materialize(
                target.path(),
                &[entry("b.csv", Some("data/")), entry("a.csv", Some("data/"))],
                &mut logs,
            )
            .unwrap();

        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("data/b.csv"));
        assert!(paths[1].ends_with("data/a.csv"));
        assert_eq!(std::fs::read_to_string(&paths[0]).unwrap(), "b");
    }

    #[test]
    fn local_downloader_missing_source_fails() {
        let base = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        let logs_dir = tempfile::tempdir().unwrap();
        let mut logs = LogCapture::open(logs_dir.path(), "download-", CaptureMode::Overwrite).unwrap();
        let downloader = LocalDownloader::new(base.path());
        let err = downloader
            .materialize(target.path(), &[entry("ghost.csv", None)], &mut logs)
            .unwrap_err();
        assert!(err.to_string().contains("ghost.csv"));
    }

    #[test]
    fn local_uploader_copies_tree_and_reports() {
        let source = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        let logs_dir = tempfile::tempdir().unwrap();
        std::fs::write(source.path().join("config_1.ini"), "[PROJECT]\n").unwrap();
        std::fs::create_dir_all(source.path().join("out_1")).unwrap();
        std::fs::write(source.path().join("out_1/result.txt"), "done").unwrap();

        let transaction = Transaction {
            id: 67,
            submitter: 10,
            instrument: 54,
            project: "1234a".to_string(),
        };
        let mut logs = LogCapture::open(logs_dir.path(), "upload-", CaptureMode::Overwrite).unwrap();
        let uploader = LocalUploader::new(target.path().join("bundle"));
        let receipt = uploader
            .upload(
                source.path(),
                &transaction,
                &[transaction.linkage_key_value()],
                &mut logs,
            )
            .unwrap();

        assert_eq!(receipt.job_id, 67);
        assert_eq!(receipt.state, "OK");
        assert!(target.path().join("bundle/config_1.ini").exists());
        assert_eq!(
            std::fs::read_to_string(target.path().join("bundle/out_1/result.txt")).unwrap(),
            "done"
        );
        drop(logs);
        let chatter =
            std::fs::read_to_string(logs_dir.path().join("upload-stdout.log")).unwrap();
        assert!(chatter.contains("Transactions._id = 67"));
    }
}
