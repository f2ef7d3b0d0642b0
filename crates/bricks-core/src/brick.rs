//! Bricks: retrieved data files and their kinds.
//!
//! [`BrickFile`] is what `process_file` dispatches on. Opening one detects the
//! kind from magic bytes first, then the declared content type, then the file
//! extension, and holds whatever resource the kind needs (an open archive for
//! zip files) until it is dropped.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::ProviderError;

/// A file retrieved by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brick {
    /// URL the brick was fetched from.
    pub url: String,
    pub path: PathBuf,
    /// `Content-Type` the server declared, if any.
    pub content_type: Option<String>,
    pub size: u64,
    /// Lowercase hex SHA-256 of the file contents.
    pub sha256: String,
}

impl Brick {
    pub fn open(&self) -> Result<BrickFile, ProviderError> {
        BrickFile::open(&self.path, self.content_type.as_deref())
    }
}

/// Detected kind of a brick file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Zip,
    Gzip,
    Tar,
    Html,
    Text,
    Unknown,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileKind::Zip => "zip",
            FileKind::Gzip => "gzip",
            FileKind::Tar => "tar",
            FileKind::Html => "html",
            FileKind::Text => "text",
            FileKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Enough of the file to see a tar header's `ustar` magic at offset 257.
const SNIFF_LEN: u64 = 512;

impl FileKind {
    /// Detects the kind of the file at `path`, using `content_type` and the
    /// extension when the contents are not conclusive.
    pub fn detect(path: &Path, content_type: Option<&str>) -> std::io::Result<FileKind> {
        let mut head = Vec::with_capacity(SNIFF_LEN as usize);
        File::open(path)?.take(SNIFF_LEN).read_to_end(&mut head)?;

        let kind = Self::from_magic(&head)
            .or_else(|| content_type.and_then(Self::from_content_type))
            .or_else(|| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .and_then(Self::from_extension)
            })
            .unwrap_or(FileKind::Unknown);
        tracing::trace!(path = %path.display(), %kind, "detected brick kind");
        Ok(kind)
    }

    fn from_magic(head: &[u8]) -> Option<FileKind> {
        match head {
            [0x50, 0x4B, 0x03, 0x04, ..]
            | [0x50, 0x4B, 0x05, 0x06, ..]
            | [0x50, 0x4B, 0x07, 0x08, ..] => Some(FileKind::Zip),
            [0x1F, 0x8B, ..] => Some(FileKind::Gzip),
            _ if head.get(257..262) == Some(b"ustar".as_slice()) => Some(FileKind::Tar),
            _ => None,
        }
    }

    fn from_content_type(content_type: &str) -> Option<FileKind> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "application/zip" | "application/x-zip-compressed" => Some(FileKind::Zip),
            "application/gzip" | "application/x-gzip" => Some(FileKind::Gzip),
            "application/x-tar" => Some(FileKind::Tar),
            "text/html" | "application/xhtml+xml" => Some(FileKind::Html),
            e if e.starts_with("text/") => Some(FileKind::Text),
            _ => None,
        }
    }

    fn from_extension(ext: &str) -> Option<FileKind> {
        match ext.to_ascii_lowercase().as_str() {
            "zip" => Some(FileKind::Zip),
            "gz" | "tgz" => Some(FileKind::Gzip),
            "tar" => Some(FileKind::Tar),
            "html" | "htm" => Some(FileKind::Html),
            "txt" | "csv" | "tsv" | "json" | "xml" => Some(FileKind::Text),
            _ => None,
        }
    }
}

/// An opened zip brick.
pub struct ZipBrick {
    pub path: PathBuf,
    pub archive: zip::ZipArchive<File>,
}

impl fmt::Debug for ZipBrick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZipBrick")
            .field("path", &self.path)
            .field("entries", &self.archive.len())
            .finish()
    }
}

/// A brick opened for processing, tagged by kind.
#[derive(Debug)]
pub enum BrickFile {
    Zip(ZipBrick),
    /// Any kind without a dedicated handle.
    Other { path: PathBuf, kind: FileKind },
}

impl BrickFile {
    /// Opens `path` as a brick. A file that looks like a zip but cannot be read
    /// as one is an error rather than falling through to `Other`.
    pub fn open(path: &Path, content_type: Option<&str>) -> Result<BrickFile, ProviderError> {
        let kind =
            FileKind::detect(path, content_type).map_err(|e| ProviderError::io(path, e))?;
        match kind {
            FileKind::Zip => {
                let file = File::open(path).map_err(|e| ProviderError::io(path, e))?;
                let archive =
                    zip::ZipArchive::new(file).map_err(|source| ProviderError::Archive {
                        path: path.to_path_buf(),
                        source,
                    })?;
                Ok(BrickFile::Zip(ZipBrick {
                    path: path.to_path_buf(),
                    archive,
                }))
            }
            kind => Ok(BrickFile::Other {
                path: path.to_path_buf(),
                kind,
            }),
        }
    }

    pub fn kind(&self) -> FileKind {
        match self {
            BrickFile::Zip(_) => FileKind::Zip,
            BrickFile::Other { kind, .. } => *kind,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            BrickFile::Zip(z) => &z.path,
            BrickFile::Other { path, .. } => path,
        }
    }
}
