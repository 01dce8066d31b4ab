use p256::elliptic_curve::sec1::ToEncodedPoint;
use rand_core::CryptoRngCore;
use ssh_key::private::EcdsaKeypair;

use super::KeyPair;
use crate::{catalog::EcdsaCurve, error::DecodeError};

pub(crate) fn generate<R: CryptoRngCore>(rng: &mut R, curve: EcdsaCurve) -> KeyPair {
    match curve {
        EcdsaCurve::NistP256 => KeyPair::EcdsaP256(p256::SecretKey::random(rng)),
        EcdsaCurve::NistP384 => KeyPair::EcdsaP384(p384::SecretKey::random(rng)),
        EcdsaCurve::NistP521 => KeyPair::EcdsaP521(p521::SecretKey::random(rng)),
    }
}

// Public points are stored uncompressed, as OpenSSH writes them.

pub(crate) fn p256_keypair(key: &p256::SecretKey) -> EcdsaKeypair {
    EcdsaKeypair::NistP256 {
        public: key.public_key().to_encoded_point(false),
        private: key.clone().into(),
    }
}

pub(crate) fn p384_keypair(key: &p384::SecretKey) -> EcdsaKeypair {
    EcdsaKeypair::NistP384 {
        public: key.public_key().to_encoded_point(false),
        private: key.clone().into(),
    }
}

pub(crate) fn p521_keypair(key: &p521::SecretKey) -> EcdsaKeypair {
    EcdsaKeypair::NistP521 {
        public: key.public_key().to_encoded_point(false),
        private: key.clone().into(),
    }
}

pub(crate) fn from_keypair(pair: &EcdsaKeypair) -> std::result::Result<KeyPair, DecodeError> {
    let scalar = pair.private_key_bytes();
    let invalid = |e: p256::elliptic_curve::Error| {
        DecodeError::Malformed(format!("invalid ECDSA private scalar: {}", e))
    };

    match pair {
        EcdsaKeypair::NistP256 { .. } => p256::SecretKey::from_slice(scalar)
            .map(KeyPair::EcdsaP256)
            .map_err(invalid),
        EcdsaKeypair::NistP384 { .. } => p384::SecretKey::from_slice(scalar)
            .map(KeyPair::EcdsaP384)
            .map_err(invalid),
        EcdsaKeypair::NistP521 { .. } => p521::SecretKey::from_slice(scalar)
            .map(KeyPair::EcdsaP521)
            .map_err(invalid),
        #[allow(unreachable_patterns)]
        _ => Err(DecodeError::Unsupported(format!("ECDSA curve {}", pair.curve()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // `string "ecdsa-sha2-<id>"`, `string <id>`, `string Q` (RFC 5656 §3.1)
    #[test]
    fn test_public_blob_layout() {
        let mut rng = rand::rngs::OsRng;
        for (curve, point_len) in [
            (EcdsaCurve::NistP256, 65u32),
            (EcdsaCurve::NistP384, 97),
            (EcdsaCurve::NistP521, 133),
        ] {
            let blob = generate(&mut rng, curve).public_blob().unwrap();

            assert_eq!(&blob[.. 4], &[0, 0, 0, 19]);
            assert_eq!(&blob[4 .. 23], curve.key_type().as_bytes());
            assert_eq!(&blob[23 .. 27], &[0, 0, 0, 8]);
            assert_eq!(&blob[27 .. 35], curve.identifier().as_bytes());
            assert_eq!(&blob[35 .. 39], &point_len.to_be_bytes());
            assert_eq!(blob[39], 0x04);
            assert_eq!(blob.len(), 39 + point_len as usize);
        }
    }

    #[test]
    fn test_keypair_data_round_trip() {
        let mut rng = rand::rngs::OsRng;
        for curve in [EcdsaCurve::NistP256, EcdsaCurve::NistP384, EcdsaCurve::NistP521] {
            let key = generate(&mut rng, curve);
            let data = key.to_keypair_data().unwrap();
            let ssh_key::private::KeypairData::Ecdsa(pair) = &data else {
                panic!("expected ECDSA keypair data");
            };
            assert_eq!(pair.curve().as_str(), curve.identifier());

            let restored = from_keypair(pair).unwrap();
            assert_eq!(restored.public_blob().unwrap(), key.public_blob().unwrap());
        }
    }
}
