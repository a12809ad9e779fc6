//! Ordered configuration block model and its INI text rendering.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Assembled configuration blocks keyed by configuration identifier.
pub type ConfigsById = IndexMap<String, ConfigBlock>;

/// One nested `section -> key -> value` configuration block.
///
/// Sections and keys iterate in insertion order. [`ConfigBlock::insert_once`]
/// keeps the first value written for a pair; later duplicates are no-ops.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigBlock(IndexMap<String, IndexMap<String, String>>);

impl ConfigBlock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value unless the (section, key) pair already holds one.
    pub fn insert_once(
        &mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.0
            .entry(section.into())
            .or_default()
            .entry(key.into())
            .or_insert_with(|| value.into());
    }

    /// Overwrite a value, but only when the (section, key) pair exists.
    /// Returns whether anything was rewritten.
    pub fn rewrite(&mut self, section: &str, key: &str, value: impl Into<String>) -> bool {
        match self.0.get_mut(section).and_then(|entries| entries.get_mut(key)) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.0.get(section)?.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&IndexMap<String, String>> {
        self.0.get(name)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&String, &IndexMap<String, String>)> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the block in the INI dialect the model plugins consume: one
    /// `[SECTION]` line per section, `key = value` per entry, no blank lines
    /// between sections, a single trailing newline.
    #[must_use]
    pub fn render_ini(&self) -> String {
        let mut out = String::new();
        for (section, entries) in &self.0 {
            out.push('[');
            out.push_str(section);
            out.push_str("]\n");
            for (key, value) in entries {
                out.push_str(key);
                out.push_str(" = ");
                out.push_str(value);
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConfigBlock {
        let mut config = ConfigBlock::new();
        config.insert_once("PROJECT", "runtime", "local");
        config.insert_once("PROJECT", "failure", "0");
        config.insert_once("OUTPUTS", "out_dir", "outputs");
        config
    }

    #[test]
    fn first_write_wins() {
        let mut config = ConfigBlock::new();
        config.insert_once("PROJECT", "runtime", "a");
        config.insert_once("PROJECT", "runtime", "b");
        assert_eq!(config.get("PROJECT", "runtime"), Some("a"));
    }

    #[test]
    fn rewrite_touches_only_existing_pairs() {
        let mut config = sample();
        assert!(config.rewrite("OUTPUTS", "out_dir", "/abs/outputs"));
        assert_eq!(config.get("OUTPUTS", "out_dir"), Some("/abs/outputs"));
        assert!(!config.rewrite("INPUTS", "in_dir", "/abs/in"));
        assert!(config.section("INPUTS").is_none());
    }

    #[test]
    fn render_ini_exact_format() {
        let rendered = sample().render_ini();
        assert_eq!(
            rendered,
            "[PROJECT]\nruntime = local\nfailure = 0\n[OUTPUTS]\nout_dir = outputs\n"
        );
    }

    #[test]
    fn render_ini_preserves_insertion_order() {
        let mut config = ConfigBlock::new();
        config.insert_once("OUTPUTS", "out_dir", "o");
        config.insert_once("PROJECT", "runtime", "r");
        let rendered = config.render_ini();
        assert!(rendered.starts_with("[OUTPUTS]\n"));
    }

    #[test]
    fn render_ini_empty_block() {
        assert_eq!(ConfigBlock::new().render_ini(), "");
    }
}
