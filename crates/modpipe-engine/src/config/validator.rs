//! Schema validation for assembled configuration blocks.

use modpipe_types::config::{ConfigBlock, ConfigsById};
use modpipe_types::event::TransactionKeyValue;
use modpipe_types::DispatchError;

use crate::config::assembler::{assemble_configs, configs_count};
use crate::error::PipelineError;

/// Allowed sections and, per section, the exact required key set.
const CONFIG_SCHEMA: &[(&str, &[&str])] = &[
    ("PROJECT", &["runtime", "failure"]),
    ("INPUTS", &["in_dir", "in_file_one", "in_file_two"]),
    ("OUTPUTS", &["out_dir"]),
];

/// A block is valid iff every present section is known and carries exactly
/// its required key set: no missing keys, no extras.
#[must_use]
pub fn is_valid_proxymod_config(config: &ConfigBlock) -> bool {
    for (section, entries) in config.sections() {
        let Some((_, required)) = CONFIG_SCHEMA.iter().find(|(name, _)| *name == section.as_str())
        else {
            return false;
        };
        if required.iter().any(|key| !entries.contains_key(*key)) {
            return false;
        }
        if entries.keys().any(|key| !required.contains(&key.as_str())) {
            return false;
        }
    }
    true
}

/// Assemble the event's configuration blocks and check the ones it declares.
///
/// # Errors
///
/// `ConfigNotFound` when the declared count is non-positive or a numbered
/// identifier is missing; `InvalidConfig` when a declared block fails the
/// schema; an infrastructure error when the counter value is malformed.
pub fn validated_configs(
    key_values: &[TransactionKeyValue],
) -> Result<ConfigsById, PipelineError> {
    let configs = assemble_configs(key_values);
    let count = configs_count(key_values)?;

    if count <= 0 {
        return Err(DispatchError::ConfigNotFound {
            config_id: "config_1".to_string(),
        }
        .into());
    }

    for index in 1..=count {
        let config_id = format!("config_{index}");
        let Some(config) = configs.get(&config_id) else {
            return Err(DispatchError::ConfigNotFound { config_id }.into());
        };
        if !is_valid_proxymod_config(config) {
            return Err(DispatchError::InvalidConfig {
                config_id,
                config: config.clone(),
            }
            .into());
        }
    }

    Ok(configs)
}
