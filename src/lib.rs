//! # keysmith
//!
//! SSH key pair generation.
//!
//! ## Crates
//!
//! - `keysmith_key` - algorithm catalog, generation, encoding and fingerprints
//! - `keysmith-cli` - the `keysmith` command line tool

pub use keysmith_key;
pub use keysmith_key::*;
