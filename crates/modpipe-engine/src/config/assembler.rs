//! Rebuilds nested configuration blocks from flat namespaced key-values.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use modpipe_types::config::ConfigsById;
use modpipe_types::event::TransactionKeyValue;

/// Counter key declaring how many sequentially numbered configuration
/// identifiers are mandatory.
pub const CONFIGS_COUNT_KEY: &str = "proxymod.configs_count";

/// `proxymod.<config_id>.<section>.<key>`: four dot-separated segments,
/// each of the last three non-empty and dot-free.
static KEY_QUAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^proxymod\.([^.]+)\.([^.]+)\.([^.]+)$").expect("valid key pattern")
});

/// Assemble configuration blocks from the event's key-value sequence.
///
/// Keys that do not match the namespaced pattern are ignored. The first
/// occurrence of a (`config_id`, section, key) triple wins; later duplicates
/// are no-ops. Identifiers sharing a stem order by numeric suffix, so
/// `config_2` sorts before `config_10`; downstream iteration (audit files,
/// staging, invocation arguments) follows this order.
#[must_use]
pub fn assemble_configs(key_values: &[TransactionKeyValue]) -> ConfigsById {
    let mut configs = ConfigsById::new();
    for kv in key_values {
        let Some(caps) = KEY_QUAD_RE.captures(&kv.key) else {
            continue;
        };
        configs
            .entry(caps[1].to_string())
            .or_default()
            .insert_once(&caps[2], &caps[3], kv.value.clone());
    }
    configs.sort_by(|a_id, _, b_id, _| id_sort_key(a_id).cmp(&id_sort_key(b_id)));
    configs
}

/// Read the declared configuration count. The counter key may appear more
/// than once; the last occurrence wins.
///
/// # Errors
///
/// Returns an error if the counter value is not an integer.
pub fn configs_count(key_values: &[TransactionKeyValue]) -> Result<i64> {
    let mut count = 0i64;
    for kv in key_values {
        if kv.key == CONFIGS_COUNT_KEY {
            count = kv.value.trim().parse().with_context(|| {
                format!("malformed '{CONFIGS_COUNT_KEY}' value '{}'", kv.value)
            })?;
        }
    }
    Ok(count)
}

fn id_sort_key(id: &str) -> (&str, u64) {
    let stem_len = id.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    let (stem, digits) = id.split_at(stem_len);
    match digits.parse::<u64>() {
        Ok(number) => (stem, number),
        Err(_) => (id, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kv(key: &str, value: &str) -> TransactionKeyValue {
        TransactionKeyValue::new(key, value)
    }

    #[test]
    fn matching_keys_land_under_id_section_key() {
        let configs = assemble_configs(&[
            kv("proxymod.config_1.PROJECT.runtime", "local"),
            kv("proxymod.config_1.PROJECT.failure", "0"),
            kv("proxymod.config_2.OUTPUTS.out_dir", "outputs"),
        ]);
        assert_eq!(configs.len(), 2);
        assert_eq!(
            configs["config_1"].get("PROJECT", "runtime"),
            Some("local")
        );
        assert_eq!(
            configs["config_2"].get("OUTPUTS", "out_dir"),
            Some("outputs")
        );
    }

    #[test]
    fn non_matching_keys_are_ignored() {
        let configs = assemble_configs(&[
            kv("proxymod.configs_count", "2"),
            kv("proxymod.config_1.PROJECT", "too-short"),
            kv("proxymod.config_1.PROJECT.runtime.extra", "too-long"),
            kv("other.config_1.PROJECT.runtime", "wrong-namespace"),
            kv("proxymod.config_1..runtime", "empty-segment"),
        ]);
        assert!(configs.is_empty());
    }

    #[test]
    fn duplicate_triple_first_write_wins() {
        let configs = assemble_configs(&[
            kv("proxymod.config_1.PROJECT.runtime", "a"),
            kv("proxymod.config_1.PROJECT.runtime", "b"),
        ]);
        assert_eq!(configs["config_1"].get("PROJECT", "runtime"), Some("a"));
    }

    #[test]
    fn identifiers_order_by_numeric_suffix() {
        let configs = assemble_configs(&[
            kv("proxymod.config_10.PROJECT.runtime", "x"),
            kv("proxymod.config_2.PROJECT.runtime", "y"),
            kv("proxymod.config_1.PROJECT.runtime", "z"),
        ]);
        let ids: Vec<_> = configs.keys().map(String::as_str).collect();
        assert_eq!(ids, ["config_1", "config_2", "config_10"]);
    }

    #[test]
    fn counter_last_occurrence_wins() {
        let count = configs_count(&[
            kv(CONFIGS_COUNT_KEY, "1"),
            kv("proxymod.config_1.PROJECT.runtime", "local"),
            kv(CONFIGS_COUNT_KEY, "3"),
        ])
        .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn counter_defaults_to_zero_when_absent() {
        assert_eq!(configs_count(&[kv("unrelated", "1")]).unwrap(), 0);
    }

    #[test]
    fn malformed_counter_is_an_error() {
        let err = configs_count(&[kv(CONFIGS_COUNT_KEY, "three")]).unwrap_err();
        assert!(err.to_string().contains(CONFIGS_COUNT_KEY));
    }
}
