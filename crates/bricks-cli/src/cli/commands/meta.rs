//! `bricks meta` – show the configuration a provider would be built from.

use anyhow::Result;
use bricks_core::config::ProviderMeta;
use std::path::Path;

pub fn run_meta(config_path: &Path, meta: &ProviderMeta) -> Result<()> {
    println!("# {}", config_path.display());
    println!("{}", serde_json::to_string_pretty(meta)?);
    Ok(())
}
