//! Provider driven entirely by a configuration table.

use std::fs;
use std::path::Path;

use super::{DataProvider, Processed};
use crate::archive::{self, ArchiveOptions};
use crate::brick::{Brick, BrickFile};
use crate::checksum;
use crate::config::{ProviderMeta, ProviderSettings};
use crate::error::{FetchError, ProviderError};
use crate::transport::{self, CurlOptions, HeadResult};
use crate::url_model;

/// A [`DataProvider`] whose behavior comes from a configuration table.
#[derive(Debug, Clone)]
pub struct ConfiguredProvider {
    meta: ProviderMeta,
    settings: ProviderSettings,
    files: Vec<Brick>,
}

impl ConfiguredProvider {
    /// Keeps `meta` as given. Fails only if a known settings key has the wrong type.
    pub fn new(meta: ProviderMeta) -> Result<Self, ProviderError> {
        let settings = ProviderSettings::from_meta(&meta)?;
        Ok(Self {
            meta,
            settings,
            files: Vec::new(),
        })
    }

    /// Loads a configuration document and builds a provider from it.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let meta = crate::config::load_from(path)?;
        Ok(Self::new(meta)?)
    }

    fn archive_options(&self) -> ArchiveOptions {
        ArchiveOptions {
            extract: self.settings.extract_archives,
            max_entries: self.settings.max_archive_entries,
        }
    }

    /// HEAD before GET for naming hints. Servers that reject HEAD still get fetched.
    fn head_hints(&self, url: &str, opts: &CurlOptions) -> Result<HeadResult, FetchError> {
        match transport::probe(url, opts) {
            Ok(head) => Ok(head),
            Err(FetchError::Http { status, .. }) => {
                tracing::debug!(url, status, "HEAD rejected; fetching without hints");
                Ok(HeadResult::default())
            }
            Err(e) => Err(e),
        }
    }

    fn retrieve(&self, url: &str) -> Result<Brick, ProviderError> {
        let opts = CurlOptions::from(&self.settings);
        let head = self.head_hints(url, &opts)?;

        let dir = &self.settings.download_dir;
        fs::create_dir_all(dir).map_err(|e| ProviderError::io(dir, e))?;
        let name = url_model::brick_filename(
            url,
            head.content_disposition.as_deref(),
            head.content_type.as_deref(),
        );
        let path = url_model::available_path(dir, &name);

        let size = transport::download_to(url, &opts, &path)?;
        if let Some(expected) = head.content_length.filter(|&n| n != size) {
            tracing::warn!(url, expected, size, "brick size differs from HEAD Content-Length");
        }
        let sha256 = checksum::sha256_path(&path).map_err(|e| ProviderError::io(&path, e))?;

        Ok(Brick {
            url: url.to_string(),
            path,
            content_type: head.content_type,
            size,
            sha256,
        })
    }
}

impl DataProvider for ConfiguredProvider {
    fn meta(&self) -> &ProviderMeta {
        &self.meta
    }

    fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    fn files(&self) -> &[Brick] {
        &self.files
    }

    fn fetch(&mut self, url: &str) -> Result<bool, ProviderError> {
        if !self.can_fetch(url)? {
            tracing::info!(url, "crawl policy denies fetch");
            return Ok(false);
        }
        let brick = self.retrieve(url)?;
        tracing::info!(
            url,
            path = %brick.path.display(),
            size = brick.size,
            "fetched brick"
        );
        self.files.push(brick);
        Ok(true)
    }

    fn process_file(&self, file: BrickFile) -> Result<Processed, ProviderError> {
        match file {
            BrickFile::Zip(zip) => {
                archive::process(zip, self.archive_options()).map(Processed::Archive)
            }
            other => Err(ProviderError::UnsupportedFileType {
                kind: other.kind(),
                path: other.path().to_path_buf(),
            }),
        }
    }
}
