use thiserror::Error;

use crate::types::AuthState;

#[derive(Debug, Error)]
pub enum PidError {
    #[error("no modular inverse exists modulo {modulus}")]
    NoModularInverse { modulus: String },

    #[error("entropy source failure: {0}")]
    EntropySourceFailure(String),

    #[error("malformed identity input: real identity must not be empty")]
    MalformedIdentityInput,

    #[error("malformed device id: must be non-empty and at most {max} bytes")]
    MalformedDeviceId { max: usize },

    #[error("PUF response did not verify")]
    VerificationFailed,

    #[error("PUF capability failure: {0}")]
    PufFailure(String),

    #[error("invalid session state: expected {expected:?} got {found:?}")]
    InvalidState { expected: AuthState, found: AuthState },

    #[error("invalid length: expected {expected} got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("field too large to encode: {got} bytes exceeds {max}")]
    EncodeLimit { max: usize, got: usize },

    #[error("decode error: {0}")]
    DecodeError(&'static str),
}
