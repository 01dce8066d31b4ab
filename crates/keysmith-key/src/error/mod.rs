use thiserror::Error;

use crate::catalog::Algorithm;

/// Errors returned by key generation and encoding.
///
/// Messages never carry key material, passphrases or comments.
#[derive(Error, Debug)]
pub enum Error {
    /// Request rejected before any cryptographic work started
    #[error("Invalid parameter: {0}")]
    InvalidParameter(#[from] ParameterError),

    /// Entropy source or key construction failure
    #[error("Crypto backend error: {0}")]
    CryptoBackend(String),

    /// Serialization of otherwise valid key material failed
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Loading an encoded private key back failed
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Validation failures, each tied to one request field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    #[error("unknown algorithm `{0}` (expected ed25519, rsa or ecdsa)")]
    UnknownAlgorithm(String),

    #[error("{algorithm} does not accept a key size")]
    SizeNotAccepted { algorithm: Algorithm },

    #[error("{algorithm} does not support size {size} (allowed: {allowed:?})")]
    UnsupportedSize {
        algorithm: Algorithm,
        size: u32,
        allowed: &'static [u32],
    },

    #[error("comment must be a single line")]
    CommentContainsNewline,

    #[error("passphrase must not be empty or whitespace")]
    EmptyPassphrase,

    #[error("unknown private key format `{0}` (expected openssh or pkcs8)")]
    UnknownFormat(String),
}

/// Why an encoded private key could not be loaded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed private key: {0}")]
    Malformed(String),

    #[error("private key is encrypted and no passphrase was supplied")]
    PassphraseRequired,

    #[error("decryption failed: wrong passphrase or corrupted key")]
    Decryption,

    #[error("unsupported key: {0}")]
    Unsupported(String),
}

impl Error {
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Error::InvalidParameter(_))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
