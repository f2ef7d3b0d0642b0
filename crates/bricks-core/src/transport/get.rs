//! HTTP GET: small bodies into memory, bricks onto disk.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use super::{easy_for, is_success, temp_path, CurlOptions};
use crate::error::FetchError;

/// A GET response held in memory. Any status is returned; callers decide.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: u32,
    pub body: Vec<u8>,
}

/// GETs `url` into memory, failing with `TooLarge` once the body passes `limit` bytes.
pub fn get_capped(url: &str, opts: &CurlOptions, limit: u64) -> Result<Fetched, FetchError> {
    let transport = |source| FetchError::Transport {
        url: url.to_string(),
        source,
    };
    let mut body: Vec<u8> = Vec::new();
    let mut overflow = false;

    let mut easy = easy_for(url, opts)?;
    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| {
                if body.len() as u64 + data.len() as u64 > limit {
                    overflow = true;
                    return Ok(0); // abort transfer
                }
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(transport)?;
        transfer.perform()
    };
    if overflow {
        return Err(FetchError::TooLarge {
            url: url.to_string(),
            limit,
        });
    }
    performed.map_err(transport)?;

    let status = easy.response_code().map_err(transport)?;
    Ok(Fetched { status, body })
}

/// GETs `url` into `dest`, writing to `dest.part` first and renaming on success.
///
/// The partial file is removed on every failure path. Returns bytes written.
pub fn download_to(url: &str, opts: &CurlOptions, dest: &Path) -> Result<u64, FetchError> {
    let part = temp_path(dest);
    let mut file = File::create(&part).map_err(|source| FetchError::Io {
        path: part.clone(),
        source,
    })?;

    match stream_into(url, opts, &mut file) {
        Ok(written) => {
            let synced = file.sync_all();
            drop(file);
            if let Err(source) = synced.and_then(|()| fs::rename(&part, dest)) {
                let _ = fs::remove_file(&part);
                return Err(FetchError::Io {
                    path: dest.to_path_buf(),
                    source,
                });
            }
            tracing::debug!(url, bytes = written, path = %dest.display(), "download complete");
            Ok(written)
        }
        Err(e) => {
            drop(file);
            let _ = fs::remove_file(&part);
            Err(match e {
                StreamError::Fetch(e) => e,
                StreamError::Write(source) => FetchError::Io { path: part, source },
            })
        }
    }
}

enum StreamError {
    Fetch(FetchError),
    Write(io::Error),
}

fn stream_into(url: &str, opts: &CurlOptions, file: &mut File) -> Result<u64, StreamError> {
    let transport = |source| {
        StreamError::Fetch(FetchError::Transport {
            url: url.to_string(),
            source,
        })
    };
    let mut written = 0u64;
    let mut write_err: Option<io::Error> = None;

    let mut easy = easy_for(url, opts).map_err(StreamError::Fetch)?;
    easy.get(true).map_err(transport)?;
    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| match file.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    tracing::warn!("brick write failed: {}", e);
                    write_err = Some(e);
                    Ok(0) // abort transfer
                }
            })
            .map_err(transport)?;
        transfer.perform()
    };
    if let Some(e) = write_err {
        return Err(StreamError::Write(e));
    }
    performed.map_err(transport)?;

    let code = easy.response_code().map_err(transport)?;
    if !is_success(code) {
        return Err(StreamError::Fetch(FetchError::Http {
            method: "GET",
            url: url.to_string(),
            status: code,
        }));
    }
    Ok(written)
}
