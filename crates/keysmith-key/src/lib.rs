pub mod catalog;
pub mod encoding;
pub mod entropy;
pub mod error;
pub mod fingerprint;
pub mod generate;
pub mod key;
pub mod types;

// Re-export core functionality
pub use catalog::{Algorithm, AlgorithmInfo, EcdsaCurve};
pub use encoding::{decode_private, encode_private, encode_public};
pub use entropy::{EntropySource, OsEntropy};
pub use error::{DecodeError, Error, ParameterError, Result};
pub use fingerprint::{fingerprint, fingerprint_key, fingerprint_of_line};
pub use generate::{generate_key, GenerationRequest, GenerationResult, KeyGenerator, PublicKeySummary};
pub use key::{generate, generate_os, KeyPair};
pub use types::{Comment, Passphrase, PrivateKeyFormat};
