//! Staged derivations of assembled configuration blocks.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempPath;

use modpipe_types::config::ConfigsById;

/// Derive staged copies of every block. `INPUTS.in_dir` is rewritten to the
/// absolute directory holding the first materialized input file (only the
/// first, however many inputs were classified). `OUTPUTS.out_dir` is
/// rewritten to an absolute location inside the upload area. Originals are
/// left untouched.
pub fn stage_configs(
    configs: &ConfigsById,
    input_paths: &[PathBuf],
    upload_dir: &Path,
) -> Result<ConfigsById> {
    let staged_in_dir = match input_paths.first() {
        Some(path) => Some(absolute_parent(path)?),
        None => None,
    };

    let mut staged = configs.clone();
    for (_, config) in staged.iter_mut() {
        if let Some(dir) = &staged_in_dir {
            config.rewrite("INPUTS", "in_dir", dir.display().to_string());
        }
        if let Some(out_dir) = config.get("OUTPUTS", "out_dir").map(str::to_string) {
            let absolute = std::path::absolute(upload_dir.join(&out_dir)).with_context(|| {
                format!("failed to resolve staged out_dir '{out_dir}'")
            })?;
            config.rewrite("OUTPUTS", "out_dir", absolute.display().to_string());
        }
    }
    Ok(staged)
}

/// Write each original block as `<config_id>.ini` in the upload area. These
/// are audit artifacts, distinct from the staged files plugins consume.
pub fn write_audit_configs(configs: &ConfigsById, upload_dir: &Path) -> Result<()> {
    for (config_id, config) in configs {
        let path = upload_dir.join(format!("{config_id}.ini"));
        fs::write(&path, config.render_ini())
            .with_context(|| format!("failed to write audit config '{}'", path.display()))?;
    }
    Ok(())
}

/// Write each staged block to a `.ini` temp file consumed only by plugin
/// invocation. The returned paths delete their files on drop, so the staged
/// files disappear after invocation whatever the outcome.
pub fn write_staged_configs(staged: &ConfigsById) -> Result<Vec<TempPath>> {
    let mut paths = Vec::with_capacity(staged.len());
    for (_, config) in staged {
        let mut file = tempfile::Builder::new()
            .suffix(".ini")
            .tempfile()
            .context("failed to create staged config file")?;
        file.write_all(config.render_ini().as_bytes())
            .context("failed to write staged config")?;
        paths.push(file.into_temp_path());
    }
    Ok(paths)
}

fn absolute_parent(path: &Path) -> Result<PathBuf> {
    let parent = path
        .parent()
        .with_context(|| format!("input path '{}' has no parent directory", path.display()))?;
    std::path::absolute(parent)
        .with_context(|| format!("failed to resolve input directory '{}'", parent.display()))
}
