//! `bricks fetch <url>` – permission check, download, optional processing.

use anyhow::{bail, Context, Result};
use bricks_core::{ConfiguredProvider, DataProvider};

use super::process::print_processed;

pub fn run_fetch(provider: &mut ConfiguredProvider, url: &str, process: bool) -> Result<()> {
    if !provider.fetch(url)? {
        bail!("crawl policy denies fetching {}", url);
    }
    let brick = provider
        .files()
        .last()
        .cloned()
        .context("fetch reported success without a brick")?;
    println!(
        "{}  {} bytes  sha256 {}",
        brick.path.display(),
        brick.size,
        brick.sha256
    );

    if process {
        let processed = provider.process_file(brick.open()?)?;
        print_processed(&processed);
    }
    Ok(())
}
