//! Password-protected export containers.
//!
//! A selected set of limits is serialized to the same decimal-preserving
//! JSON document used by storage, then sealed with AES-256-GCM. The key
//! is derived directly from the user's password with SHA-256, and a
//! random 96-bit nonce is prefixed to the ciphertext. Containers carry
//! the fixed `.serenedata` extension. The progress engine never sees any
//! of this: limits round-trip through plain structured serialization and
//! this module wraps the result at the boundary.

use std::path::{Path, PathBuf};

use rand::RngCore;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::ExportError;
use crate::limit::Limit;

/// Fixed file extension for export containers.
pub const FILE_EXTENSION: &str = "serenedata";

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

fn derive_key(password: &str) -> [u8; 32] {
    Sha256::digest(password.as_bytes()).into()
}

/// Encrypt `limits` into a container byte buffer.
pub fn seal(limits: &[Limit], password: &str) -> Result<Vec<u8>, ExportError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ExportError::WeakPassword {
            min: MIN_PASSWORD_LEN,
        });
    }

    let mut in_out = serde_json::to_vec(limits)?;

    let unbound =
        UnboundKey::new(&AES_256_GCM, &derive_key(password)).map_err(|_| ExportError::EncryptFailed)?;
    let key = LessSafeKey::new(unbound);

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    key.seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| ExportError::EncryptFailed)?;

    let mut container = Vec::with_capacity(NONCE_LEN + in_out.len());
    container.extend_from_slice(&nonce_bytes);
    container.extend_from_slice(&in_out);
    Ok(container)
}

/// Decrypt a container produced by [`seal`].
pub fn unseal(container: &[u8], password: &str) -> Result<Vec<Limit>, ExportError> {
    if container.len() < NONCE_LEN + AES_256_GCM.tag_len() {
        return Err(ExportError::Truncated);
    }
    let (nonce_bytes, ciphertext) = container.split_at(NONCE_LEN);

    let unbound =
        UnboundKey::new(&AES_256_GCM, &derive_key(password)).map_err(|_| ExportError::DecryptFailed)?;
    let key = LessSafeKey::new(unbound);
    let nonce =
        Nonce::try_assume_unique_for_key(nonce_bytes).map_err(|_| ExportError::DecryptFailed)?;

    let mut in_out = ciphertext.to_vec();
    let plaintext = key
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| ExportError::DecryptFailed)?;

    Ok(serde_json::from_slice(plaintext)?)
}

/// Seal `limits` and write the container to `path`, appending the fixed
/// extension when missing. Returns the path actually written.
pub fn export_to_file(
    path: &Path,
    limits: &[Limit],
    password: &str,
) -> Result<PathBuf, ExportError> {
    let bytes = seal(limits, password)?;
    let path = if path
        .extension()
        .map(|e| e.eq_ignore_ascii_case(FILE_EXTENSION))
        .unwrap_or(false)
    {
        path.to_path_buf()
    } else {
        path.with_extension(FILE_EXTENSION)
    };
    std::fs::write(&path, bytes)?;
    debug!(path = %path.display(), "wrote export container");
    Ok(path)
}

/// Read and unseal a container file.
pub fn import_from_file(path: &Path, password: &str) -> Result<Vec<Limit>, ExportError> {
    let bytes = std::fs::read(path)?;
    unseal(&bytes, password)
}
