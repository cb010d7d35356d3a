//! Streaming content hashing
//!
//! Files are read in fixed-size chunks so archives of any size hash in
//! constant memory.

use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Chunk size for reading files during hashing (8 KiB)
const CHUNK_SIZE: usize = 8 * 1024;

/// Hex-encoded digest of everything `reader` yields.
pub fn hash_reader<D: Digest>(reader: &mut impl Read) -> std::io::Result<String> {
    let mut hasher = D::new();
    let mut buffer = [0u8; CHUNK_SIZE];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Hex-encoded SHA256 digest of a file on disk.
pub fn sha256_file(path: &Path) -> std::io::Result<String> {
    let mut f = std::fs::File::open(path)?;
    hash_reader::<Sha256>(&mut f)
}
