//! CLI for bricks data providers.

mod commands;

use anyhow::Result;
use bricks_core::config::{self, ProviderMeta};
use bricks_core::ConfiguredProvider;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use commands::{run_can_fetch, run_checksum, run_fetch, run_headers, run_meta, run_process};

/// Top-level CLI for bricks.
#[derive(Debug, Parser)]
#[command(name = "bricks")]
#[command(about = "bricks: fetch and process remote data files through configured providers", long_about = None)]
pub struct Cli {
    /// Provider configuration file (default: config/html.toml, then the XDG config).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Check whether the host's crawl policy permits fetching a URL.
    CanFetch {
        url: String,
    },

    /// Show the Content-Type a URL declares (HEAD request).
    Headers {
        url: String,
    },

    /// Fetch a URL into the download directory if the crawl policy permits it.
    Fetch {
        url: String,
        /// Process the brick after fetching it.
        #[arg(long)]
        process: bool,
        /// Override the configured download directory.
        #[arg(long, value_name = "DIR")]
        download_dir: Option<PathBuf>,
    },

    /// Process a local file as a brick.
    Process {
        path: PathBuf,
        /// Extract archives next to the file.
        #[arg(long)]
        extract: bool,
    },

    /// Print the loaded provider metadata as JSON.
    Meta,

    /// Compute SHA-256 of a file.
    Checksum {
        path: PathBuf,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        if let CliCommand::Checksum { path } = &cli.command {
            return run_checksum(path);
        }

        let (config_path, mut meta) = config::load_or_init(cli.config.as_deref())?;
        tracing::debug!("loaded config {}: {:?}", config_path.display(), meta);

        if let CliCommand::Meta = cli.command {
            return run_meta(&config_path, &meta);
        }

        apply_overrides(&mut meta, &cli.command);
        let mut provider = ConfiguredProvider::new(meta)?;

        match cli.command {
            CliCommand::CanFetch { url } => run_can_fetch(&provider, &url)?,
            CliCommand::Headers { url } => run_headers(&provider, &url)?,
            CliCommand::Fetch { url, process, .. } => run_fetch(&mut provider, &url, process)?,
            CliCommand::Process { path, .. } => run_process(&provider, &path)?,
            CliCommand::Meta | CliCommand::Checksum { .. } => {}
        }

        Ok(())
    }
}

/// Command-line flags that stand in for configuration keys.
fn apply_overrides(meta: &mut ProviderMeta, command: &CliCommand) {
    match command {
        CliCommand::Fetch {
            download_dir: Some(dir),
            ..
        } => {
            meta.insert("download_dir".into(), path_value(dir));
        }
        CliCommand::Process { extract: true, .. } => {
            meta.insert("extract_archives".into(), toml::Value::Boolean(true));
        }
        _ => {}
    }
}

fn path_value(p: &Path) -> toml::Value {
    toml::Value::String(p.display().to_string())
}

#[cfg(test)]
mod tests;
