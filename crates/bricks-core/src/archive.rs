//! Zip brick processing: entry listing and optional extraction.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::brick::ZipBrick;
use crate::error::ProviderError;

/// How a zip brick is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveOptions {
    pub extract: bool,
    pub max_entries: usize,
}

/// One member of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub size: u64,
    pub compressed_size: u64,
    pub is_dir: bool,
}

/// Result of processing a zip brick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    /// Entries in archive order.
    pub entries: Vec<ArchiveEntry>,
    /// Directory the archive was extracted into, when extraction ran.
    pub extracted_to: Option<PathBuf>,
    /// Entries not extracted because their names escape the destination.
    pub skipped: Vec<String>,
}

impl ArchiveSummary {
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|e| e.size).sum()
    }
}

/// Directory a brick is extracted into: the brick path without its extension,
/// or `<name>.d` when there is no extension to strip.
pub fn extraction_dir(brick_path: &Path) -> PathBuf {
    let stripped = brick_path.with_extension("");
    if stripped == brick_path {
        let mut o = brick_path.as_os_str().to_owned();
        o.push(".d");
        PathBuf::from(o)
    } else {
        stripped
    }
}

/// Lists every entry of `zip` and extracts it when `opts.extract` is set.
pub fn process(mut zip: ZipBrick, opts: ArchiveOptions) -> Result<ArchiveSummary, ProviderError> {
    let count = zip.archive.len();
    if count > opts.max_entries {
        return Err(ProviderError::TooManyEntries {
            path: zip.path,
            count,
            limit: opts.max_entries,
        });
    }

    let dest = opts.extract.then(|| extraction_dir(&zip.path));
    if let Some(dest) = &dest {
        fs::create_dir_all(dest).map_err(|e| ProviderError::io(dest, e))?;
    }

    let mut entries = Vec::with_capacity(count);
    let mut skipped = Vec::new();

    for i in 0..count {
        let mut entry = zip
            .archive
            .by_index(i)
            .map_err(|source| ProviderError::Archive {
                path: zip.path.clone(),
                source,
            })?;
        entries.push(ArchiveEntry {
            name: entry.name().to_string(),
            size: entry.size(),
            compressed_size: entry.compressed_size(),
            is_dir: entry.is_dir(),
        });

        let Some(dest) = &dest else {
            continue;
        };
        let Some(relative) = entry.enclosed_name().map(Path::to_path_buf) else {
            tracing::warn!(
                archive = %zip.path.display(),
                entry = entry.name(),
                "skipping entry outside extraction directory"
            );
            skipped.push(entry.name().to_string());
            continue;
        };
        let target = dest.join(relative);
        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| ProviderError::io(&target, e))?;
        } else {
            write_entry(&mut entry, &target).map_err(|e| ProviderError::io(&target, e))?;
        }
    }

    tracing::info!(
        archive = %zip.path.display(),
        entries = entries.len(),
        extracted = dest.is_some(),
        "processed zip brick"
    );

    Ok(ArchiveSummary {
        path: zip.path,
        entries,
        extracted_to: dest,
        skipped,
    })
}

fn write_entry(entry: &mut impl io::Read, target: &Path) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = File::create(target)?;
    io::copy(entry, &mut out)?;
    Ok(())
}
