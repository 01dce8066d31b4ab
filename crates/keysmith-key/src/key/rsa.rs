use rand_core::CryptoRngCore;
use rsa::{traits::PublicKeyParts, BigUint, RsaPrivateKey};
use ssh_key::{
    private::{KeypairData, RsaKeypair},
    Mpint,
};

use super::KeyPair;
use crate::error::{DecodeError, Error, Result};

pub(crate) const KEY_TYPE: &str = "ssh-rsa";

/// Fixed public exponent F4
pub(crate) const PUBLIC_EXPONENT: u32 = 65537;

pub(crate) fn generate<R: CryptoRngCore>(rng: &mut R, bits: u32) -> Result<RsaPrivateKey> {
    let exponent = BigUint::from(PUBLIC_EXPONENT);
    let key = RsaPrivateKey::new_with_exp(rng, bits as usize, &exponent)
        .map_err(|e| Error::CryptoBackend(format!("RSA-{} generation failed: {}", bits, e)))?;

    let actual = modulus_bits(&key);
    if actual != bits {
        return Err(Error::CryptoBackend(format!(
            "RSA generation produced a {}-bit modulus, expected {}",
            actual, bits
        )));
    }
    Ok(key)
}

pub(crate) fn modulus_bits(key: &RsaPrivateKey) -> u32 {
    key.n().bits() as u32
}

pub(crate) fn keypair_data(key: &RsaPrivateKey) -> Result<KeypairData> {
    let pair = RsaKeypair::try_from(key)
        .map_err(|e| Error::Encoding(format!("RSA OpenSSH conversion failed: {}", e)))?;
    Ok(KeypairData::Rsa(pair))
}

/// Rebuilds the key from `n`, `e`, `d`, `p` and `q`; `iqmp` is recomputed.
pub(crate) fn from_keypair(pair: &RsaKeypair) -> std::result::Result<KeyPair, DecodeError> {
    let key = RsaPrivateKey::from_components(
        to_biguint(&pair.public.n)?,
        to_biguint(&pair.public.e)?,
        to_biguint(&pair.private.d)?,
        vec![to_biguint(&pair.private.p)?, to_biguint(&pair.private.q)?],
    )
    .map_err(|e| DecodeError::Malformed(format!("invalid RSA key: {}", e)))?;

    key.validate()
        .map_err(|e| DecodeError::Malformed(format!("invalid RSA key: {}", e)))?;
    Ok(KeyPair::Rsa(key))
}

fn to_biguint(mpint: &Mpint) -> std::result::Result<BigUint, DecodeError> {
    mpint
        .as_positive_bytes()
        .map(BigUint::from_bytes_be)
        .ok_or_else(|| DecodeError::Malformed("RSA component is not a positive integer".to_string()))
}
