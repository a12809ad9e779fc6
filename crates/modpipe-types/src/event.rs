//! Notification bundle model.
//!
//! One [`Event`] is the immutable input to a single orchestration run: the
//! originating transaction, its flat key-value metadata, and the descriptors
//! of the uploaded files. File content never lives here; bytes are fetched
//! on demand through the downloader collaborator.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Identity fields of the originating transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: i64,
    pub submitter: i64,
    pub instrument: i64,
    pub project: String,
}

impl Transaction {
    /// Key-value pair linking an uploaded artifact bundle back to this
    /// transaction.
    #[must_use]
    pub fn linkage_key_value(&self) -> TransactionKeyValue {
        TransactionKeyValue::new("Transactions._id", self.id.to_string())
    }
}

/// One flat metadata entry attached to a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionKeyValue {
    pub key: String,
    pub value: String,
}

impl TransactionKeyValue {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Metadata for one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    #[serde(default)]
    pub subdir: Option<String>,
    pub mimetype: String,
    /// Storage-relative path; used to identify the file in error messages.
    pub path: String,
}

impl FileEntry {
    /// Base name with the final extension stripped. For plugin files this is
    /// the name of the entry point the file must expose.
    #[must_use]
    pub fn stem(&self) -> &str {
        Path::new(self.name.as_str())
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(self.name.as_str())
    }
}

/// Immutable notification bundle that triggers one orchestration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub transaction: Transaction,
    #[serde(default)]
    pub key_values: Vec<TransactionKeyValue>,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            subdir: None,
            mimetype: "text/x-python".to_string(),
            path: format!("models/{name}"),
        }
    }

    #[test]
    fn stem_strips_final_extension() {
        assert_eq!(file("combine.py").stem(), "combine");
        assert_eq!(file("archive.tar.gz").stem(), "archive.tar");
        assert_eq!(file("noext").stem(), "noext");
    }

    #[test]
    fn linkage_key_value_names_the_transaction() {
        let transaction = Transaction {
            id: 67,
            submitter: 10,
            instrument: 54,
            project: "1234a".to_string(),
        };
        let kv = transaction.linkage_key_value();
        assert_eq!(kv.key, "Transactions._id");
        assert_eq!(kv.value, "67");
    }

    #[test]
    fn event_deserializes_from_bundle_json() {
        let json = r#"{
            "transaction": {"_id": 67, "submitter": 10, "instrument": 54, "project": "1234a"},
            "key_values": [{"key": "proxymod.configs_count", "value": "1"}],
            "files": [{"name": "in_one.csv", "subdir": "data/", "mimetype": "text/csv", "path": "data/in_one.csv"}]
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.transaction.id, 67);
        assert_eq!(event.key_values.len(), 1);
        assert_eq!(event.files[0].subdir.as_deref(), Some("data/"));
    }

    #[test]
    fn key_values_and_files_default_to_empty() {
        let json = r#"{"transaction": {"_id": 1, "submitter": 2, "instrument": 3, "project": "p"}}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert!(event.key_values.is_empty());
        assert!(event.files.is_empty());
    }
}
