//! bricks: configured providers that fetch and process remote data files.
//!
//! A provider is built from a TOML table ([`config`]), checks a host's crawl
//! policy before fetching ([`robots`]), downloads bricks over HTTP
//! ([`transport`]) and dispatches processing on the brick's kind ([`brick`]).

pub mod archive;
pub mod brick;
pub mod checksum;
pub mod config;
pub mod error;
pub mod logging;
pub mod provider;
pub mod robots;
pub mod transport;
pub mod url_model;

pub use brick::{Brick, BrickFile, FileKind};
pub use config::{ProviderMeta, ProviderSettings};
pub use error::{FetchError, ProviderError};
pub use provider::{ConfiguredProvider, DataProvider, Processed};
