//! In-memory key pairs and their generation.
//!
//! [`KeyPair`] is a closed set of variants, one per concrete primitive. Each
//! variant module generates its key and converts it to and from the `ssh-key`
//! keypair representation; public encodings are derived from that.

pub(crate) mod ecdsa;
pub(crate) mod ed25519;
pub(crate) mod rsa;

use pkcs8::{EncodePrivateKey, SecretDocument};
use rand_core::CryptoRngCore;
use ssh_key::{private::KeypairData, PrivateKey, PublicKey};
use tracing::{debug, info, warn};

use crate::{
    catalog::{Algorithm, EcdsaCurve},
    entropy::{EntropySource, OsEntropy},
    error::{DecodeError, Error, Result},
    types::Comment,
};

/// A freshly generated private key together with its public half.
///
/// All backing types wipe their secret material on drop.
pub enum KeyPair {
    Ed25519(ed25519_dalek::SigningKey),
    Rsa(::rsa::RsaPrivateKey),
    EcdsaP256(p256::SecretKey),
    EcdsaP384(p384::SecretKey),
    EcdsaP521(p521::SecretKey),
}

impl KeyPair {
    /// Generates a key pair from the given secure generator.
    ///
    /// The size is checked against the catalog here as well, so callers that
    /// bypass [`generate`] cannot slip an unsupported size through.
    pub fn generate_with_rng<R: CryptoRngCore>(
        algorithm: Algorithm,
        size: Option<u32>,
        rng: &mut R,
    ) -> Result<Self> {
        let size = algorithm.resolve_size(size)?;

        let pair = match (algorithm, size) {
            (Algorithm::Ed25519, None) => KeyPair::Ed25519(ed25519::generate(rng)),
            (Algorithm::Rsa, Some(bits)) => KeyPair::Rsa(rsa::generate(rng, bits)?),
            (Algorithm::Ecdsa, Some(size)) => {
                let curve = EcdsaCurve::from_size(size).ok_or_else(|| {
                    Error::CryptoBackend(format!("no curve for ECDSA size {}", size))
                })?;
                ecdsa::generate(rng, curve)
            }
            (algorithm, _) => {
                return Err(Error::CryptoBackend(format!(
                    "no generator for {} with the given size",
                    algorithm
                )))
            }
        };

        debug!(algorithm = %pair.algorithm(), bits = pair.bits(), "key pair generated");
        Ok(pair)
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            KeyPair::Ed25519(_) => Algorithm::Ed25519,
            KeyPair::Rsa(_) => Algorithm::Rsa,
            KeyPair::EcdsaP256(_) | KeyPair::EcdsaP384(_) | KeyPair::EcdsaP521(_) => {
                Algorithm::Ecdsa
            }
        }
    }

    /// Size as the catalog knows it; `None` for the fixed-size ED25519
    pub fn size(&self) -> Option<u32> {
        match self {
            KeyPair::Ed25519(_) => None,
            _ => Some(self.bits()),
        }
    }

    /// Effective key strength in bits
    pub fn bits(&self) -> u32 {
        match self {
            KeyPair::Ed25519(_) => 256,
            KeyPair::Rsa(key) => rsa::modulus_bits(key),
            KeyPair::EcdsaP256(_) => EcdsaCurve::NistP256.size(),
            KeyPair::EcdsaP384(_) => EcdsaCurve::NistP384.size(),
            KeyPair::EcdsaP521(_) => EcdsaCurve::NistP521.size(),
        }
    }

    /// Type tag that prefixes the public key line and the key blob
    pub fn key_type(&self) -> &'static str {
        match self {
            KeyPair::Ed25519(_) => ed25519::KEY_TYPE,
            KeyPair::Rsa(_) => rsa::KEY_TYPE,
            KeyPair::EcdsaP256(_) => EcdsaCurve::NistP256.key_type(),
            KeyPair::EcdsaP384(_) => EcdsaCurve::NistP384.key_type(),
            KeyPair::EcdsaP521(_) => EcdsaCurve::NistP521.key_type(),
        }
    }

    /// Public half in the `ssh-key` representation, carrying `comment`
    pub fn public_key(&self, comment: Option<&Comment>) -> Result<PublicKey> {
        let comment = comment.map(Comment::as_str).unwrap_or_default();
        let private = PrivateKey::new(self.to_keypair_data()?, comment)
            .map_err(|e| Error::Encoding(format!("{} public key assembly failed: {}", self.algorithm(), e)))?;
        Ok(private.public_key().clone())
    }

    /// Canonical SSH wire encoding of the public key
    pub fn public_blob(&self) -> Result<Vec<u8>> {
        self.public_key(None)?
            .to_bytes()
            .map_err(|e| Error::Encoding(format!("{} public key blob encoding failed: {}", self.algorithm(), e)))
    }

    pub(crate) fn to_keypair_data(&self) -> Result<KeypairData> {
        match self {
            KeyPair::Ed25519(key) => Ok(ed25519::keypair_data(key)),
            KeyPair::Rsa(key) => rsa::keypair_data(key),
            KeyPair::EcdsaP256(key) => Ok(KeypairData::Ecdsa(ecdsa::p256_keypair(key))),
            KeyPair::EcdsaP384(key) => Ok(KeypairData::Ecdsa(ecdsa::p384_keypair(key))),
            KeyPair::EcdsaP521(key) => Ok(KeypairData::Ecdsa(ecdsa::p521_keypair(key))),
        }
    }

    pub(crate) fn from_keypair_data(data: &KeypairData) -> std::result::Result<Self, DecodeError> {
        match data {
            KeypairData::Ed25519(pair) => Ok(ed25519::from_keypair(pair)),
            KeypairData::Rsa(pair) => rsa::from_keypair(pair),
            KeypairData::Ecdsa(pair) => ecdsa::from_keypair(pair),
            KeypairData::Encrypted(_) => Err(DecodeError::PassphraseRequired),
            _ => Err(DecodeError::Unsupported(
                "only Ed25519, RSA and ECDSA keys are supported".to_string(),
            )),
        }
    }

    /// Unencrypted PKCS#8 `PrivateKeyInfo` DER
    pub(crate) fn to_pkcs8_der(&self) -> Result<SecretDocument> {
        let encoded = match self {
            KeyPair::Ed25519(key) => key.to_pkcs8_der(),
            KeyPair::Rsa(key) => key.to_pkcs8_der(),
            KeyPair::EcdsaP256(key) => key.to_pkcs8_der(),
            KeyPair::EcdsaP384(key) => key.to_pkcs8_der(),
            KeyPair::EcdsaP521(key) => key.to_pkcs8_der(),
        };
        encoded.map_err(|e| Error::Encoding(format!("{} PKCS#8 export failed: {}", self.algorithm(), e)))
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("key_type", &self.key_type())
            .field("bits", &self.bits())
            .finish_non_exhaustive()
    }
}

/// Validates `algorithm`/`size` against the catalog, then generates a key pair
/// with randomness from `entropy`.
///
/// Nothing is drawn from the source when validation fails.
pub fn generate<E: EntropySource>(
    entropy: &E,
    algorithm: Algorithm,
    size: Option<u32>,
) -> Result<KeyPair> {
    let size = algorithm.resolve_size(size).map_err(|e| {
        warn!(%algorithm, ?size, "rejected key generation parameters");
        Error::from(e)
    })?;

    info!(%algorithm, ?size, "generating key pair");
    let mut rng = entropy.rng()?;
    KeyPair::generate_with_rng(algorithm, size, &mut rng)
}

/// [`generate`] bound to the operating system CSPRNG
pub fn generate_os(algorithm: Algorithm, size: Option<u32>) -> Result<KeyPair> {
    generate(&OsEntropy, algorithm, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{entropy::testing::CountingEntropy, error::ParameterError};

    #[test]
    fn test_ed25519_generation() {
        let key = generate_os(Algorithm::Ed25519, None).unwrap();
        assert_eq!(key.algorithm(), Algorithm::Ed25519);
        assert_eq!(key.size(), None);
        assert_eq!(key.bits(), 256);
        assert_eq!(key.key_type(), "ssh-ed25519");
    }

    #[test]
    fn test_ecdsa_generation_per_curve() {
        for (size, key_type) in [
            (256, "ecdsa-sha2-nistp256"),
            (384, "ecdsa-sha2-nistp384"),
            (521, "ecdsa-sha2-nistp521"),
        ] {
            let key = generate_os(Algorithm::Ecdsa, Some(size)).unwrap();
            assert_eq!(key.algorithm(), Algorithm::Ecdsa);
            assert_eq!(key.size(), Some(size));
            assert_eq!(key.key_type(), key_type);
        }
    }

    #[test]
    fn test_rsa_generation() {
        let key = generate_os(Algorithm::Rsa, Some(2048)).unwrap();
        assert_eq!(key.algorithm(), Algorithm::Rsa);
        assert_eq!(key.size(), Some(2048));
        assert_eq!(key.key_type(), "ssh-rsa");
    }

    #[test]
    fn test_default_size_applied() {
        let key = generate_os(Algorithm::Ecdsa, None).unwrap();
        assert_eq!(key.size(), Some(256));
    }

    #[test]
    fn test_invalid_size_draws_no_entropy() {
        let entropy = CountingEntropy::seeded(1);

        let err = generate(&entropy, Algorithm::Rsa, Some(1024)).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidParameter(ParameterError::UnsupportedSize { size: 1024, .. })
        ));

        let err = generate(&entropy, Algorithm::Ed25519, Some(256)).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidParameter(ParameterError::SizeNotAccepted { .. })
        ));

        assert_eq!(entropy.draws(), 0);
    }

    #[test]
    fn test_generate_with_rng_rechecks_size() {
        let mut rng = rand::rngs::OsRng;
        let err = KeyPair::generate_with_rng(Algorithm::Ecdsa, Some(512), &mut rng).unwrap_err();
        assert!(err.is_invalid_parameter());
        let err = KeyPair::generate_with_rng(Algorithm::Ed25519, Some(256), &mut rng).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let entropy = CountingEntropy::seeded(42);
        let a = generate(&entropy, Algorithm::Ed25519, None).unwrap();
        let b = generate(&entropy, Algorithm::Ed25519, None).unwrap();
        assert_eq!(a.public_blob().unwrap(), b.public_blob().unwrap());
        assert_eq!(entropy.draws(), 2);
    }

    #[test]
    fn test_debug_hides_secret() {
        let key = generate_os(Algorithm::Ed25519, None).unwrap();
        let rendered = format!("{:?}", key);
        assert!(rendered.contains("ssh-ed25519"));
        assert!(!rendered.contains("SigningKey"));
    }
}
