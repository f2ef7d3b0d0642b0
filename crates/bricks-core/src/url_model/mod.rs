//! Local names for fetched bricks.
//!
//! A brick is named after the server's `Content-Disposition` filename when one
//! is given, else after the last URL path segment. Names without an extension
//! get one from the declared content type so later kind detection can use it.

mod content_disposition;
mod path;
mod sanitize;

pub use content_disposition::disposition_filename;
pub use path::last_path_segment;
pub use sanitize::sanitize_filename;

pub(crate) use content_disposition::percent_decode;

use std::path::{Path, PathBuf};

/// Used when neither the headers nor the URL give a usable name.
pub const FALLBACK_NAME: &str = "brick";

/// File extensions for the content types bricks commonly arrive as.
const EXTENSIONS: &[(&str, &str)] = &[
    ("application/zip", "zip"),
    ("application/x-zip-compressed", "zip"),
    ("application/gzip", "gz"),
    ("application/x-gzip", "gz"),
    ("application/x-tar", "tar"),
    ("text/html", "html"),
    ("text/plain", "txt"),
    ("text/csv", "csv"),
    ("application/json", "json"),
];

/// Extension registered for a `Content-Type` value, ignoring parameters and case.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    EXTENSIONS
        .iter()
        .find(|(mime, _)| mime.eq_ignore_ascii_case(essence))
        .map(|(_, ext)| *ext)
}

/// Picks a safe local filename for a brick fetched from `url`.
pub fn brick_filename(
    url: &str,
    content_disposition: Option<&str>,
    content_type: Option<&str>,
) -> String {
    let name = content_disposition
        .and_then(disposition_filename)
        .map(|n| sanitize_filename(&n))
        .filter(|n| is_usable(n))
        .or_else(|| {
            last_path_segment(url)
                .map(|n| sanitize_filename(&n))
                .filter(|n| is_usable(n))
        })
        .unwrap_or_else(|| FALLBACK_NAME.to_string());

    if name.contains('.') {
        return name;
    }
    match content_type.and_then(extension_for) {
        Some(ext) => format!("{}.{}", name, ext),
        None => name,
    }
}

/// Path for `name` in `dir` that no existing file occupies: `name` itself, else
/// `stem (1).ext`, `stem (2).ext` and so on.
pub fn available_path(dir: &Path, name: &str) -> PathBuf {
    let first = dir.join(name);
    if !first.exists() {
        return first;
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    (1u32..)
        .map(|n| match ext {
            Some(ext) => dir.join(format!("{} ({}).{}", stem, n, ext)),
            None => dir.join(format!("{} ({})", stem, n)),
        })
        .find(|p| !p.exists())
        .unwrap_or(first)
}

fn is_usable(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".."
}
