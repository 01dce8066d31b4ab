//! SHA-256 fingerprints in the format printed by `ssh-keygen -l`.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use sha2::{Digest, Sha256};
use ssh_key::PublicKey;

use crate::{
    error::{DecodeError, Error, Result},
    key::KeyPair,
};

pub const PREFIX: &str = "SHA256:";

/// `SHA256:` followed by the unpadded base64 SHA-256 of the public key blob.
pub fn fingerprint(public_blob: &[u8]) -> String {
    let digest = Sha256::digest(public_blob);
    format!("{}{}", PREFIX, STANDARD_NO_PAD.encode(digest))
}

pub fn fingerprint_key(key: &KeyPair) -> Result<String> {
    Ok(fingerprint(&key.public_blob()?))
}

/// Fingerprints an authorized-keys line (`<type> <base64 blob> [comment]`).
///
/// The comment plays no part; the blob must decode and carry the line's type.
pub fn fingerprint_of_line(line: &str) -> Result<String> {
    let line = line.trim();
    if line.split_whitespace().count() < 2 {
        return Err(malformed("expected `<type> <base64 key> [comment]`".to_string()));
    }

    let public = PublicKey::from_openssh(line).map_err(|e| malformed(e.to_string()))?;
    let blob = public.to_bytes().map_err(|e| malformed(e.to_string()))?;
    Ok(fingerprint(&blob))
}

fn malformed(reason: String) -> Error {
    Error::Decode(DecodeError::Malformed(format!("public key line: {}", reason)))
}
