//! Text renderings of a key pair.
//!
//! Private keys go into an OpenSSH or PKCS#8 container, encrypted when a
//! passphrase is given. Public keys become a single authorized-keys line.

mod openssh;
mod pkcs8;

use rand_core::CryptoRngCore;
use tracing::debug;
use zeroize::Zeroizing;

use crate::{
    error::{DecodeError, Error, Result},
    key::KeyPair,
    types::{Comment, Passphrase, PrivateKeyFormat},
};

/// Renders the private key. The output always ends with a newline.
///
/// PKCS#8 has no comment field, so `comment` only lands in OpenSSH containers.
pub fn encode_private<R: CryptoRngCore>(
    key: &KeyPair,
    comment: Option<&Comment>,
    passphrase: Option<&Passphrase>,
    format: PrivateKeyFormat,
    rng: &mut R,
) -> Result<Zeroizing<String>> {
    debug!(
        key_type = key.key_type(),
        %format,
        encrypted = passphrase.is_some(),
        "encoding private key"
    );

    let mut text = match format {
        PrivateKeyFormat::OpenSsh => openssh::encode(key, comment, passphrase, rng)?,
        PrivateKeyFormat::Pkcs8 => pkcs8::encode(key, passphrase, rng)?,
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

/// Renders `<key-type> <base64 blob>[ <comment>]\n`.
pub fn encode_public(key: &KeyPair, comment: Option<&Comment>) -> Result<String> {
    let mut line = key
        .public_key(comment)?
        .to_openssh()
        .map_err(|e| Error::Encoding(format!("{} public key line encoding failed: {}", key.algorithm(), e)))?;
    line.push('\n');
    Ok(line)
}

/// Loads a private key produced by [`encode_private`] to check it, e.g. that
/// its passphrase protection holds.
///
/// Distinguishes a missing passphrase from a wrong one.
pub fn decode_private(
    text: &str,
    passphrase: Option<&str>,
) -> std::result::Result<KeyPair, DecodeError> {
    let armour = text.trim_start();
    if armour.starts_with(openssh::BEGIN) {
        openssh::decode(armour, passphrase)
    } else if armour.starts_with(pkcs8::BEGIN_PLAIN) || armour.starts_with(pkcs8::BEGIN_ENCRYPTED) {
        pkcs8::decode(armour, passphrase)
    } else {
        Err(DecodeError::Malformed(
            "no OpenSSH or PKCS#8 private key block found".to_string(),
        ))
    }
}
