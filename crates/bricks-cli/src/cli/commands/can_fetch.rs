//! `bricks can-fetch <url>` – evaluate the host's crawl policy.

use anyhow::Result;
use bricks_core::{ConfiguredProvider, DataProvider};

pub fn run_can_fetch(provider: &ConfiguredProvider, url: &str) -> Result<()> {
    let verdict = if provider.can_fetch(url)? {
        "allowed"
    } else {
        "denied"
    };
    println!("{verdict}");
    Ok(())
}
