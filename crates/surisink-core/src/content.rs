//! Content hashing.
//!
//! A file is streamed once through SHA-256; the digest and the byte count come
//! from the same pass, so a record never carries a hash for a different size.

use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;

use crate::constants::HASH_BUFFER_SIZE;
use crate::error::AppError;

/// Hex SHA-256 digest and exact size of a file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDigest {
    pub sha256: String,
    pub size_bytes: u64,
}

/// Hash the file at `path`.
///
/// Fails if the file cannot be opened or a read fails mid-stream; no digest
/// is returned for a partial read.
pub async fn hash_file(path: &Path) -> Result<ContentDigest, AppError> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|source| AppError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; HASH_BUFFER_SIZE];
    let mut size_bytes: u64 = 0;

    loop {
        let n = file.read(&mut buf).await.map_err(|source| AppError::Read {
            path: path.to_path_buf(),
            bytes_read: size_bytes,
            source,
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        size_bytes += n as u64;
    }

    Ok(ContentDigest {
        sha256: hex::encode(hasher.finalize()),
        size_bytes,
    })
}
