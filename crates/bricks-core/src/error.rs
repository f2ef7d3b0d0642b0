//! Error types surfaced by providers.
//!
//! Network and permission-path failures are `FetchError`; everything a provider
//! can fail with (including fetch failures) is `ProviderError`. A crawl policy
//! that denies access is not an error: `fetch` reports it as `Ok(false)`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::brick::FileKind;

/// Failure talking to a remote host.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported URL scheme {scheme:?} in {url} (expected http or https)")]
    UnsupportedScheme { url: String, scheme: String },

    /// libcurl reported an error (resolve, connect, timeout, ...).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },

    #[error("{method} {url} returned HTTP {status}")]
    Http {
        method: &'static str,
        url: String,
        status: u32,
    },

    #[error("response from {url} exceeded {limit} bytes")]
    TooLarge { url: String, limit: u64 },

    #[error("writing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    /// True for failures that say nothing about the remote resource itself:
    /// the host could not be reached or the body was cut off.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, FetchError::Transport { .. } | FetchError::TooLarge { .. })
    }
}

/// Any failure of a [`DataProvider`](crate::provider::DataProvider) operation.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// `process_file` has no handler for this kind of file.
    #[error("unsupported file type {kind} for {}", .path.display())]
    UnsupportedFileType { kind: FileKind, path: PathBuf },

    #[error("archive {}: {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("archive {} has {count} entries, limit is {limit}", .path.display())]
    TooManyEntries {
        path: PathBuf,
        count: usize,
        limit: usize,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid provider configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl ProviderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ProviderError::Io {
            path: path.into(),
            source,
        }
    }
}
