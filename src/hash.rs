//! Content hashing for duplicate detection.
//!
//! Files are hashed with BLAKE3 by streaming fixed-size blocks, so memory
//! use stays constant regardless of file size. Two files get the same
//! digest exactly when their byte content is identical; names, timestamps,
//! and permissions play no part.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Block size used when streaming file contents into the hasher.
pub const HASH_BLOCK_SIZE: usize = 65536;

/// Hashes a file's content, reading it in [`HASH_BLOCK_SIZE`] blocks.
///
/// # Errors
///
/// Returns the underlying IO error if the file cannot be opened or a read
/// fails mid-stream. Callers decide whether that is fatal or skippable.
pub fn hash_file(path: &Path) -> io::Result<blake3::Hash> {
    let mut file = File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; HASH_BLOCK_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize())
}

/// Hashes an in-memory byte slice.
pub fn hash_bytes(data: &[u8]) -> blake3::Hash {
    blake3::hash(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_identical_content_same_digest() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let first = temp_dir.path().join("first.bin");
        let second = temp_dir.path().join("second.bin");
        fs::write(&first, b"same bytes").expect("Failed to write file");
        fs::write(&second, b"same bytes").expect("Failed to write file");

        let digest_a = hash_file(&first).expect("Failed to hash file");
        let digest_b = hash_file(&second).expect("Failed to hash file");
        assert_eq!(digest_a, digest_b);
    }

    #[test]
    fn test_different_content_different_digest() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let first = temp_dir.path().join("first.bin");
        let second = temp_dir.path().join("second.bin");
        fs::write(&first, b"some bytes").expect("Failed to write file");
        fs::write(&second, b"other bytes").expect("Failed to write file");

        let digest_a = hash_file(&first).expect("Failed to hash file");
        let digest_b = hash_file(&second).expect("Failed to hash file");
        assert_ne!(digest_a, digest_b);
    }

    #[test]
    fn test_hash_file_matches_hash_bytes() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("data.bin");
        fs::write(&path, b"streamed or not, same digest").expect("Failed to write file");

        let from_file = hash_file(&path).expect("Failed to hash file");
        assert_eq!(from_file, hash_bytes(b"streamed or not, same digest"));
    }

    #[test]
    fn test_content_larger_than_one_block() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("big.bin");
        let data = vec![0xA5u8; HASH_BLOCK_SIZE * 2 + 17];
        fs::write(&path, &data).expect("Failed to write file");

        let from_file = hash_file(&path).expect("Failed to hash file");
        assert_eq!(from_file, hash_bytes(&data));
    }

    #[test]
    fn test_missing_file_errors() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("missing.bin");

        assert!(hash_file(&missing).is_err());
    }
}
