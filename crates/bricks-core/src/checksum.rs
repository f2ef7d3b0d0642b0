//! SHA-256 fingerprints for bricks.
//!
//! Computed once after a brick is written, reading in chunks so large bricks
//! do not need to fit in memory.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// SHA-256 of everything `reader` yields, as lowercase hex.
pub fn sha256_reader(mut reader: impl Read) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// SHA-256 of the file at `path`, as lowercase hex.
pub fn sha256_path(path: &Path) -> io::Result<String> {
    sha256_reader(File::open(path)?)
}
