use std::path::Path;

use anyhow::Result;

use modpipe_engine::classify::classify_files;
use modpipe_engine::config::validator::validated_configs;

pub fn execute(event_path: &Path) -> Result<()> {
    let event = super::load_event(event_path)?;
    let configs = validated_configs(&event.key_values)?;
    let classified = classify_files(&configs, &event.files);

    let ids: Vec<_> = configs.keys().map(String::as_str).collect();
    println!("configurations: {}", ids.join(", "));
    println!("input files:    {}", classified.inputs.len());
    println!("model files:    {}", classified.models.len());
    Ok(())
}
