//! Supported algorithms and the key sizes each one accepts.
//!
//! Every size decision goes through this table so an unsupported size is
//! rejected instead of silently replaced with something weaker.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParameterError;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Ed25519,
    Rsa,
    Ecdsa,
}

/// Static parameters of one algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmInfo {
    pub algorithm: Algorithm,
    /// Accepted sizes in ascending order; empty when the size is fixed
    pub allowed_sizes: &'static [u32],
    pub default_size: Option<u32>,
}

const CATALOG: [AlgorithmInfo; 3] = [
    AlgorithmInfo {
        algorithm: Algorithm::Ed25519,
        allowed_sizes: &[],
        default_size: None,
    },
    AlgorithmInfo {
        algorithm: Algorithm::Rsa,
        allowed_sizes: &[2048, 3072, 4096],
        default_size: Some(3072),
    },
    AlgorithmInfo {
        algorithm: Algorithm::Ecdsa,
        allowed_sizes: &[256, 384, 521],
        default_size: Some(256),
    },
];

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Ed25519, Algorithm::Rsa, Algorithm::Ecdsa];

    pub fn info(self) -> &'static AlgorithmInfo {
        match self {
            Algorithm::Ed25519 => &CATALOG[0],
            Algorithm::Rsa => &CATALOG[1],
            Algorithm::Ecdsa => &CATALOG[2],
        }
    }

    pub fn allowed_sizes(self) -> &'static [u32] {
        self.info().allowed_sizes
    }

    pub fn default_size(self) -> Option<u32> {
        self.info().default_size
    }

    /// `None` stands for "no explicit size"; only ED25519 accepts it as-is,
    /// the other algorithms pick their default in [`Algorithm::resolve_size`].
    pub fn is_valid_size(self, size: Option<u32>) -> bool {
        match size {
            None => self.allowed_sizes().is_empty(),
            Some(size) => self.allowed_sizes().contains(&size),
        }
    }

    /// Size to generate with: the request's size if allowed, the default if
    /// none was given.
    pub fn resolve_size(self, size: Option<u32>) -> Result<Option<u32>, ParameterError> {
        match (size, self.allowed_sizes()) {
            (None, _) => Ok(self.default_size()),
            (Some(_), []) => Err(ParameterError::SizeNotAccepted { algorithm: self }),
            (Some(size), allowed) if allowed.contains(&size) => Ok(Some(size)),
            (Some(size), allowed) => Err(ParameterError::UnsupportedSize {
                algorithm: self,
                size,
                allowed,
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Ed25519 => "ED25519",
            Algorithm::Rsa => "RSA",
            Algorithm::Ecdsa => "ECDSA",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ed25519" => Ok(Algorithm::Ed25519),
            "rsa" => Ok(Algorithm::Rsa),
            "ecdsa" => Ok(Algorithm::Ecdsa),
            _ => Err(ParameterError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// NIST curves backing the ECDSA sizes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum EcdsaCurve {
    NistP256,
    NistP384,
    NistP521,
}

impl EcdsaCurve {
    pub fn from_size(size: u32) -> Option<Self> {
        match size {
            256 => Some(EcdsaCurve::NistP256),
            384 => Some(EcdsaCurve::NistP384),
            521 => Some(EcdsaCurve::NistP521),
            _ => None,
        }
    }

    pub fn size(self) -> u32 {
        match self {
            EcdsaCurve::NistP256 => 256,
            EcdsaCurve::NistP384 => 384,
            EcdsaCurve::NistP521 => 521,
        }
    }

    /// Curve identifier used inside SSH key blobs
    pub fn identifier(self) -> &'static str {
        match self {
            EcdsaCurve::NistP256 => "nistp256",
            EcdsaCurve::NistP384 => "nistp384",
            EcdsaCurve::NistP521 => "nistp521",
        }
    }

    pub fn key_type(self) -> &'static str {
        match self {
            EcdsaCurve::NistP256 => "ecdsa-sha2-nistp256",
            EcdsaCurve::NistP384 => "ecdsa-sha2-nistp384",
            EcdsaCurve::NistP521 => "ecdsa-sha2-nistp521",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_sizes() {
        assert!(Algorithm::Ed25519.allowed_sizes().is_empty());
        assert_eq!(Algorithm::Rsa.allowed_sizes(), &[2048, 3072, 4096]);
        assert_eq!(Algorithm::Ecdsa.allowed_sizes(), &[256, 384, 521]);
    }

    #[test]
    fn test_default_sizes() {
        assert_eq!(Algorithm::Ed25519.default_size(), None);
        assert_eq!(Algorithm::Rsa.default_size(), Some(3072));
        assert_eq!(Algorithm::Ecdsa.default_size(), Some(256));
    }

    #[test]
    fn test_defaults_are_allowed() {
        for algorithm in Algorithm::ALL {
            if let Some(size) = algorithm.default_size() {
                assert!(algorithm.is_valid_size(Some(size)));
            }
        }
    }

    #[test]
    fn test_is_valid_size() {
        assert!(Algorithm::Ed25519.is_valid_size(None));
        assert!(!Algorithm::Ed25519.is_valid_size(Some(256)));
        assert!(Algorithm::Rsa.is_valid_size(Some(4096)));
        assert!(!Algorithm::Rsa.is_valid_size(Some(1024)));
        assert!(!Algorithm::Rsa.is_valid_size(Some(256)));
        assert!(Algorithm::Ecdsa.is_valid_size(Some(521)));
        assert!(!Algorithm::Ecdsa.is_valid_size(Some(512)));
    }

    #[test]
    fn test_resolve_size() {
        assert_eq!(Algorithm::Ed25519.resolve_size(None), Ok(None));
        assert_eq!(Algorithm::Rsa.resolve_size(None), Ok(Some(3072)));
        assert_eq!(Algorithm::Ecdsa.resolve_size(Some(384)), Ok(Some(384)));

        assert_eq!(
            Algorithm::Ed25519.resolve_size(Some(256)),
            Err(ParameterError::SizeNotAccepted {
                algorithm: Algorithm::Ed25519
            })
        );
        assert!(matches!(
            Algorithm::Rsa.resolve_size(Some(1024)),
            Err(ParameterError::UnsupportedSize { size: 1024, .. })
        ));
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!("ED25519".parse::<Algorithm>().unwrap(), Algorithm::Ed25519);
        assert_eq!(" rsa ".parse::<Algorithm>().unwrap(), Algorithm::Rsa);
        assert_eq!("Ecdsa".parse::<Algorithm>().unwrap(), Algorithm::Ecdsa);
        assert_eq!(
            "dsa".parse::<Algorithm>(),
            Err(ParameterError::UnknownAlgorithm("dsa".to_string()))
        );
    }

    #[test]
    fn test_curve_mapping() {
        for size in Algorithm::Ecdsa.allowed_sizes() {
            let curve = EcdsaCurve::from_size(*size).unwrap();
            assert_eq!(curve.size(), *size);
            assert!(curve.key_type().ends_with(curve.identifier()));
        }
        assert_eq!(EcdsaCurve::from_size(512), None);
    }
}
