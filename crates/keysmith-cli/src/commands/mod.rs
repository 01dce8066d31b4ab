pub mod algorithms;
pub mod fingerprint;
pub mod generate;
