//! ECDSA nonce search and private key recovery over secp256k1
//!
//! This library derives key material (public keys, Base58Check
//! addresses), recovers a private key algebraically when a signature's
//! nonce is known, and runs a bounded randomized search for (key, nonce)
//! pairs that satisfy a signature equation. The search is a
//! demonstration: it is expected to exhaust its budget on real
//! signatures.

pub mod codec;
pub mod error;
pub mod math;
pub mod oracle;
pub mod provider;
pub mod recovery;
pub mod search;
pub mod signature;

pub use error::Error;
pub use oracle::NonceOracle;
pub use search::{Search, SearchConfig, SearchOutcome};
pub use signature::{Signature, SignatureInput};
