//! `bricks headers <url>` – declared content type.

use anyhow::Result;
use bricks_core::{ConfiguredProvider, DataProvider};

pub fn run_headers(provider: &ConfiguredProvider, url: &str) -> Result<()> {
    match provider.check_headers(url)? {
        Some(content_type) => println!("{content_type}"),
        None => println!("(none)"),
    }
    Ok(())
}
