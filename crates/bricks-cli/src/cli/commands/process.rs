//! `bricks process <path>` – dispatch a local file through the provider.

use anyhow::Result;
use bricks_core::{BrickFile, ConfiguredProvider, DataProvider, Processed};
use std::path::Path;

pub fn run_process(provider: &ConfiguredProvider, path: &Path) -> Result<()> {
    let file = BrickFile::open(path, None)?;
    let processed = provider.process_file(file)?;
    print_processed(&processed);
    Ok(())
}

pub(super) fn print_processed(processed: &Processed) {
    match processed {
        Processed::Archive(summary) => {
            println!("{:>10}  {:>10}  {}", "SIZE", "PACKED", "NAME");
            for e in &summary.entries {
                println!("{:>10}  {:>10}  {}", e.size, e.compressed_size, e.name);
            }
            println!(
                "{} entries, {} bytes",
                summary.entries.len(),
                summary.total_size()
            );
            if let Some(dir) = &summary.extracted_to {
                println!("extracted to {}", dir.display());
            }
            for name in &summary.skipped {
                println!("skipped {name} (outside extraction directory)");
            }
        }
    }
}
