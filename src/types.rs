use core::fmt;

use num_bigint::BigUint;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

use crate::{errors::PidError, ser::encode_uint};

pub const NONCE_LEN: usize = 16;                                 // r
pub const CHALLENGE_LEN: usize = 16;                             // challenge1 / challenge2
pub const DIGEST_LEN: usize = 32;                                // SHA-256
pub const BOUND_CHALLENGE_LEN: usize = CHALLENGE_LEN + DIGEST_LEN; // c = challenge || tag
pub const REFERENCE_P: u32 = 107;
pub const REFERENCE_Q: u32 = 113;

pub type Digest = [u8; DIGEST_LEN];

/// The device's true identifier. Wiped from memory on drop and never printed.
pub struct RealIdentity(Zeroizing<Vec<u8>>);

impl RealIdentity {
    /// # Errors
    ///
    /// Returns `PidError::MalformedIdentityInput` for an empty byte sequence.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, PidError> {
        let bytes = Zeroizing::new(bytes.into());
        if bytes.is_empty() {
            return Err(PidError::MalformedIdentityInput);
        }
        Ok(Self(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Big-endian unsigned interpretation of the raw bytes.
    #[must_use]
    pub fn to_uint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0)
    }
}

impl TryFrom<&[u8]> for RealIdentity {
    type Error = PidError;
    fn try_from(b: &[u8]) -> Result<Self, Self::Error> {
        Self::new(b.to_vec())
    }
}

impl TryFrom<&str> for RealIdentity {
    type Error = PidError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s.as_bytes().to_vec())
    }
}

impl fmt::Debug for RealIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RealIdentity(<redacted>)")
    }
}

/// Deployment moduli `(p, q)`. Public, expected to be coprime and each > 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModulusPair {
    p: BigUint,
    q: BigUint,
}

impl ModulusPair {
    #[must_use]
    pub fn new(p: impl Into<BigUint>, q: impl Into<BigUint>) -> Self {
        Self { p: p.into(), q: q.into() }
    }

    #[must_use]
    pub const fn p(&self) -> &BigUint {
        &self.p
    }

    #[must_use]
    pub const fn q(&self) -> &BigUint {
        &self.q
    }

    #[must_use]
    pub fn product(&self) -> BigUint {
        &self.p * &self.q
    }
}

impl Default for ModulusPair {
    fn default() -> Self {
        Self::new(REFERENCE_P, REFERENCE_Q)
    }
}

/// Public pseudo-identity, minimal big-endian bytes of the combined residue.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PseudoIdentity(Vec<u8>);

impl PseudoIdentity {
    /// # Errors
    ///
    /// Returns `PidError::DecodeError` for an empty byte sequence or one with a
    /// leading zero byte (other than the single `0x00`), so each integer has
    /// exactly one encoding and one secret key.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, PidError> {
        let bytes = bytes.into();
        match bytes.as_slice() {
            [] => Err(PidError::DecodeError("empty pseudo-identity")),
            [0, _, ..] => Err(PidError::DecodeError("non-minimal pseudo-identity")),
            _ => Ok(Self(bytes)),
        }
    }

    pub(crate) fn from_uint(value: &BigUint) -> Self {
        // zero encodes as [0x00], so the token is never empty
        Self(encode_uint(value))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    #[must_use]
    pub fn to_uint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0)
    }
}

impl AsRef<[u8]> for PseudoIdentity {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for PseudoIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl fmt::Debug for PseudoIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PseudoIdentity({self})")
    }
}

/// `hash(pid)`. Anyone holding the Pid can derive it.
pub struct SecretKey(Digest);

impl SecretKey {
    pub(crate) const fn new(digest: Digest) -> Self {
        Self(digest)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &Digest {
        &self.0
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for SecretKey {}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct Challenge(pub [u8; CHALLENGE_LEN]);

impl Challenge {
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; CHALLENGE_LEN] {
        &self.0
    }
}

impl fmt::Debug for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Challenge({})", hex::encode(self.0))
    }
}

impl TryFrom<&[u8]> for Challenge {
    type Error = PidError;
    fn try_from(b: &[u8]) -> Result<Self, Self::Error> {
        if b.len() != CHALLENGE_LEN {
            return Err(PidError::InvalidLength { expected: CHALLENGE_LEN, got: b.len() });
        }
        let mut arr = [0u8; CHALLENGE_LEN];
        arr.copy_from_slice(b);
        Ok(Self(arr))
    }
}

/// The two independent challenges issued for one authentication attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChallengePair {
    pub first: Challenge,
    pub second: Challenge,
}

/// `(r1, r2)` as returned by a PUF.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponsePair {
    pub r1: Vec<u8>,
    pub r2: Vec<u8>,
}

impl From<(Vec<u8>, Vec<u8>)> for ResponsePair {
    fn from((r1, r2): (Vec<u8>, Vec<u8>)) -> Self {
        Self { r1, r2 }
    }
}

/// Device physical-channel identifier, typically a MAC address.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChannelId(String);

impl ChannelId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthOutcome {
    Verified,
    Rejected,
}

impl AuthOutcome {
    #[must_use]
    pub const fn is_verified(self) -> bool {
        matches!(self, Self::Verified)
    }

    /// Map a rejection to `PidError::VerificationFailed`.
    ///
    /// # Errors
    ///
    /// Returns `PidError::VerificationFailed` when the outcome is `Rejected`.
    pub const fn into_result(self) -> Result<(), PidError> {
        match self {
            Self::Verified => Ok(()),
            Self::Rejected => Err(PidError::VerificationFailed),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthState {
    Idle,
    ChallengeIssued,
    Verified,
    Rejected,
}

impl AuthState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Verified | Self::Rejected)
    }
}

impl From<AuthOutcome> for AuthState {
    fn from(outcome: AuthOutcome) -> Self {
        match outcome {
            AuthOutcome::Verified => Self::Verified,
            AuthOutcome::Rejected => Self::Rejected,
        }
    }
}
