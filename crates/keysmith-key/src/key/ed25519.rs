use ed25519_dalek::SigningKey;
use rand_core::CryptoRngCore;
use ssh_key::private::{Ed25519Keypair, KeypairData};

use super::KeyPair;

pub(crate) const KEY_TYPE: &str = "ssh-ed25519";

pub(crate) fn generate<R: CryptoRngCore>(rng: &mut R) -> SigningKey {
    SigningKey::generate(rng)
}

pub(crate) fn keypair_data(key: &SigningKey) -> KeypairData {
    KeypairData::Ed25519(Ed25519Keypair::from_seed(key.as_bytes()))
}

pub(crate) fn from_keypair(pair: &Ed25519Keypair) -> KeyPair {
    KeyPair::Ed25519(SigningKey::from_bytes(&pair.private.to_bytes()))
}
