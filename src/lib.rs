#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

//! PUF-anchored pseudo-identities
//!
//! This crate derives a publishable pseudo-identity (Pid) for a device before it
//! is registered on a public ledger, and runs the challenge-response round used
//! to re-authenticate that device against a physical unclonable function.

// Construction as deployed:
// - Pid = (pidP·cp + pidQ·cq) mod pq, with pidP = pidQ = (r XOR id) mod pq
//   and r a fresh 16-byte nonce
// - Hash: SHA-256 (32-byte output)
// - Challenges: two independent 16-byte values per attempt, bound to the Pid
//   as challenge || H(challenge || pid)
// - Verification: pluggable policy; the bundled policy accepts every response
//
// Ledger transport, HTTP framing and concrete PUF drivers live outside this crate.

// Core modules
pub mod types;
pub mod errors;
pub mod ser;
pub mod modular;
pub mod hashers;
pub mod entropy;
pub mod obfuscator;
pub mod puf;
pub mod verification;
pub mod protocol;
pub mod registration;
pub mod config;

// Re-export commonly used types and functions
pub use types::*;
pub use errors::PidError;
pub use config::{ConfigError, DeploymentConfig};
pub use modular::{mod_inverse, CrtCoefficients};
pub use hashers::{hash, hash_parts, derive_secret_key, binding_digest, challenge_tag, bind_challenge};
pub use obfuscator::{derive_pseudo_identity, IdentityObfuscator};
pub use puf::{from_fn, FnPuf, PufModel, SimulatedPuf};
pub use verification::{AcceptAll, VerificationContext, VerificationPolicy};
pub use protocol::{AuthSession, AuthenticationProtocol, MinerRequest};
pub use registration::{register_device, register_device_with_rng, DeviceRegistration};
pub use ser::{encode_registration, decode_registration};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
