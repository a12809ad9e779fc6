//! Partitions the event's file list into input data and model plugins.

use modpipe_types::config::ConfigsById;
use modpipe_types::event::FileEntry;

/// CSV media type marking input data files.
pub const INPUT_MIMETYPE: &str = "text/csv";
/// Python-source media type marking model plugin files.
pub const MODEL_MIMETYPE: &str = "text/x-python";
/// Fixed subdirectory model plugin files are uploaded under.
pub const MODELS_SUBDIR: &str = "models/";

/// The event's files split into the two roles the pipeline consumes.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedFiles {
    pub inputs: Vec<FileEntry>,
    pub models: Vec<FileEntry>,
}

/// Classify the file list against the validated `config_1` INPUTS section.
///
/// An input file is a CSV whose subdirectory equals `INPUTS.in_dir` and
/// whose name equals `in_file_one` or `in_file_two`. A model file is Python
/// source under `models/`. Files matching neither predicate are ignored.
#[must_use]
pub fn classify_files(configs: &ConfigsById, files: &[FileEntry]) -> ClassifiedFiles {
    let inputs_section = configs.get("config_1").and_then(|c| c.section("INPUTS"));
    let in_dir = inputs_section.and_then(|s| s.get("in_dir")).map(String::as_str);
    let in_file_one = inputs_section.and_then(|s| s.get("in_file_one")).map(String::as_str);
    let in_file_two = inputs_section.and_then(|s| s.get("in_file_two")).map(String::as_str);

    let mut classified = ClassifiedFiles::default();
    for file in files {
        let subdir = file.subdir.as_deref();
        let in_dir_matches = subdir.is_some() && subdir == in_dir;
        let name_matches =
            Some(file.name.as_str()) == in_file_one || Some(file.name.as_str()) == in_file_two;

        if file.mimetype == INPUT_MIMETYPE && in_dir_matches && name_matches {
            classified.inputs.push(file.clone());
        } else if file.mimetype == MODEL_MIMETYPE && subdir == Some(MODELS_SUBDIR) {
            classified.models.push(file.clone());
        }
    }
    classified
}
