//! Checksum sidecar generation
//!
//! Computes a SHA-256 digest of a downloaded file and persists it as a
//! sidecar next to the file (`<name>.mp4.sha256`). Sidecars are produced
//! here for a separate verification pass; nothing in the download path
//! reads them back.

use super::{OutputError, OutputResult};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

const BUF_SIZE: usize = 64 * 1024;

/// Compute SHA-256 of a file and return the digest as lowercase hex.
///
/// Reads in chunks to keep memory use bounded; suitable for large files.
pub fn sha256_path(path: &Path) -> OutputResult<String> {
    let mut f = File::open(path)
        .map_err(|e| OutputError::IoError(format!("open {}: {e}", path.display())))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .map_err(|e| OutputError::IoError(format!("read {}: {e}", path.display())))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Sidecar path for a target file: the full filename plus `.sha256`.
///
/// `0001_111.mp4` → `0001_111.mp4.sha256`.
pub fn sidecar_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".sha256");
    target.with_file_name(name)
}

/// Compute the digest of `target` and write it to the sidecar file.
///
/// Returns the digest that was written.
///
/// # Errors
///
/// Fails if the target cannot be read or the sidecar cannot be written.
pub fn write_sidecar(target: &Path) -> OutputResult<String> {
    let digest = sha256_path(target)?;
    let sidecar = sidecar_path(target);
    std::fs::write(&sidecar, &digest)
        .map_err(|e| OutputError::IoError(format!("write {}: {e}", sidecar.display())))?;
    Ok(digest)
}
