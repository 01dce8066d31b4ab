//! Single request/response entry point for key generation.

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::{
    catalog::Algorithm,
    encoding::{encode_private, encode_public},
    entropy::{EntropySource, OsEntropy},
    error::{Error, ParameterError, Result},
    fingerprint::fingerprint,
    key::KeyPair,
    types::{Comment, Passphrase, PrivateKeyFormat},
};

/// What the caller wants generated.
///
/// ```
/// use keysmith_key::{Algorithm, GenerationRequest};
///
/// let request = GenerationRequest::new(Algorithm::Rsa)
///     .size(4096)
///     .comment("alice@laptop")
///     .passphrase("correct horse");
/// ```
#[derive(Clone)]
pub struct GenerationRequest {
    pub algorithm: Algorithm,
    /// Omitted sizes fall back to the catalog default
    pub size: Option<u32>,
    pub comment: Option<String>,
    pub passphrase: Option<Zeroizing<String>>,
    pub format: PrivateKeyFormat,
}

impl GenerationRequest {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            size: None,
            comment: None,
            passphrase: None,
            format: PrivateKeyFormat::default(),
        }
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(Zeroizing::new(passphrase.into()));
        self
    }

    pub fn format(mut self, format: PrivateKeyFormat) -> Self {
        self.format = format;
        self
    }

    fn validate(&self) -> std::result::Result<ValidatedRequest, ParameterError> {
        let size = self.algorithm.resolve_size(self.size)?;
        let comment = Comment::parse(self.comment.as_deref())?;
        let passphrase = self
            .passphrase
            .as_ref()
            .map(|p| Passphrase::new(p.as_str()))
            .transpose()?;

        Ok(ValidatedRequest {
            algorithm: self.algorithm,
            size,
            comment,
            passphrase,
            format: self.format,
        })
    }
}

impl fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("algorithm", &self.algorithm)
            .field("size", &self.size)
            .field("comment", &self.comment)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .field("format", &self.format)
            .finish()
    }
}

struct ValidatedRequest {
    algorithm: Algorithm,
    size: Option<u32>,
    comment: Option<Comment>,
    passphrase: Option<Passphrase>,
    format: PrivateKeyFormat,
}

/// A complete, internally consistent key pair rendering.
pub struct GenerationResult {
    algorithm: Algorithm,
    size: Option<u32>,
    format: PrivateKeyFormat,
    encrypted: bool,
    private_key: Zeroizing<String>,
    public_key: String,
    fingerprint: String,
}

impl GenerationResult {
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Size actually used; `None` for ED25519
    pub fn size(&self) -> Option<u32> {
        self.size
    }

    pub fn format(&self) -> PrivateKeyFormat {
        self.format
    }

    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    /// Private key file contents, newline terminated
    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// Public key file contents: one line, newline terminated
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn summary(&self) -> PublicKeySummary {
        PublicKeySummary {
            algorithm: self.algorithm,
            size: self.size,
            format: self.format,
            encrypted: self.encrypted,
            public_key: self.public_key.trim_end().to_string(),
            fingerprint: self.fingerprint.clone(),
        }
    }
}

impl fmt::Debug for GenerationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationResult")
            .field("algorithm", &self.algorithm)
            .field("size", &self.size)
            .field("format", &self.format)
            .field("encrypted", &self.encrypted)
            .field("public_key", &self.public_key)
            .field("fingerprint", &self.fingerprint)
            .finish_non_exhaustive()
    }
}

/// The shareable half of a [`GenerationResult`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicKeySummary {
    pub algorithm: Algorithm,
    pub size: Option<u32>,
    pub format: PrivateKeyFormat,
    pub encrypted: bool,
    pub public_key: String,
    pub fingerprint: String,
}

/// Runs catalog validation, generation, encoding and fingerprinting as one
/// operation over an [`EntropySource`].
///
/// Holds no mutable state, so one generator can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct KeyGenerator<E = OsEntropy> {
    entropy: E,
}

impl KeyGenerator<OsEntropy> {
    pub fn new() -> Self {
        Self { entropy: OsEntropy }
    }
}

impl<E: EntropySource> KeyGenerator<E> {
    pub fn with_entropy(entropy: E) -> Self {
        Self { entropy }
    }

    /// Either returns every artifact or an error; never a partial result.
    ///
    /// Parameter errors are returned before any entropy is drawn.
    pub fn generate_key(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let request = request.validate().map_err(|e| {
            warn!(algorithm = %request.algorithm, size = ?request.size, error = %e, "rejected key generation request");
            Error::from(e)
        })?;

        info!(
            algorithm = %request.algorithm,
            size = ?request.size,
            format = %request.format,
            encrypted = request.passphrase.is_some(),
            "generating key pair"
        );

        let mut rng = self.entropy.rng()?;
        let key = KeyPair::generate_with_rng(request.algorithm, request.size, &mut rng)?;

        let private_key = encode_private(
            &key,
            request.comment.as_ref(),
            request.passphrase.as_ref(),
            request.format,
            &mut rng,
        )?;
        let public_key = encode_public(&key, request.comment.as_ref())?;
        let fingerprint = fingerprint(&key.public_blob()?);

        info!(algorithm = %request.algorithm, fingerprint = %fingerprint, "key pair ready");

        Ok(GenerationResult {
            algorithm: request.algorithm,
            size: request.size,
            format: request.format,
            encrypted: request.passphrase.is_some(),
            private_key,
            public_key,
            fingerprint,
        })
    }
}

/// [`KeyGenerator::generate_key`] with the operating system CSPRNG
pub fn generate_key(request: &GenerationRequest) -> Result<GenerationResult> {
    KeyGenerator::new().generate_key(request)
}
