//! The provider contract.
//!
//! A [`DataProvider`] knows how to decide whether it may retrieve a URL, how to
//! retrieve it, and how to process the resulting file. Permission checking and
//! header probing are shared by every provider and come as default methods;
//! retrieval and processing are each provider's own.

mod configured;

pub use configured::ConfiguredProvider;

use crate::archive::ArchiveSummary;
use crate::brick::{Brick, BrickFile};
use crate::config::{ProviderMeta, ProviderSettings};
use crate::error::ProviderError;
use crate::robots;
use crate::transport::{self, CurlOptions};

/// Outcome of [`DataProvider::process_file`], one variant per handled kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Processed {
    Archive(ArchiveSummary),
}

pub trait DataProvider {
    /// Configuration this provider was built from, verbatim.
    fn meta(&self) -> &ProviderMeta;

    fn settings(&self) -> &ProviderSettings;

    /// Bricks retrieved so far, in fetch order.
    fn files(&self) -> &[Brick];

    /// Whether the host's crawl policy permits retrieving `url`.
    fn can_fetch(&self, url: &str) -> Result<bool, ProviderError> {
        Ok(robots::can_fetch(url, self.settings())?)
    }

    /// Declared `Content-Type` of `url` from a HEAD request, if the server sends one.
    fn check_headers(&self, url: &str) -> Result<Option<String>, ProviderError> {
        transport::parse_http_url(url)?;
        let head = transport::probe(url, &CurlOptions::from(self.settings()))?;
        Ok(head.content_type)
    }

    /// Retrieves `url`. Returns `Ok(false)` without touching the resource when
    /// [`can_fetch`](Self::can_fetch) says no.
    fn fetch(&mut self, url: &str) -> Result<bool, ProviderError>;

    /// Processes an opened brick according to its kind.
    fn process_file(&self, file: BrickFile) -> Result<Processed, ProviderError>;
}
