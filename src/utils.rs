use std::path::Path;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::types::PkcePair;

/// Raw entropy behind a verifier. 64 bytes encode to 86 characters, inside
/// the 43..=128 range PKCE allows.
pub const VERIFIER_BYTES: usize = 64;

/// Longest file stem produced by [`sanitize_name`].
pub const MAX_NAME_LEN: usize = 80;

pub fn generate_code_verifier() -> String {
    let mut bytes = [0u8; VERIFIER_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// S256 challenge: base64url(SHA-256(ASCII verifier)), unpadded.
pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

pub fn generate_pkce_pair() -> PkcePair {
    let verifier = generate_code_verifier();
    let challenge = generate_code_challenge(&verifier);
    PkcePair {
        verifier,
        challenge,
    }
}

/// Turns arbitrary text into a filesystem-safe token.
///
/// Every run of characters outside `[A-Za-z0-9_-]` collapses into a single
/// `_` and the result is cut to [`MAX_NAME_LEN`] characters.
pub fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }

    // only ASCII is left, so byte and char positions agree
    out.truncate(MAX_NAME_LEN);
    out
}

/// Persists `contents` at `path`, creating missing parent directories.
pub async fn write_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            async_fs::create_dir_all(parent).await?;
        }
    }
    async_fs::write(path, contents).await
}
