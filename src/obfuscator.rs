use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};
use tracing::debug;

use crate::{
    entropy::{random_array, OsRng},
    errors::PidError,
    modular::CrtCoefficients,
    types::{ModulusPair, PseudoIdentity, RealIdentity, NONCE_LEN},
};

/// Derives one-time pseudo-identities for a fixed modulus pair.
///
/// The coefficients are computed once in [`IdentityObfuscator::new`]; every
/// derivation draws a fresh 16-byte nonce, so the same real identity never
/// yields the same Pid twice (except by nonce collision).
#[derive(Clone, Debug)]
pub struct IdentityObfuscator {
    moduli: ModulusPair,
    crt: CrtCoefficients,
}

impl IdentityObfuscator {
    /// # Errors
    ///
    /// Returns `PidError::NoModularInverse` if `p` and `q` are not coprime or either is `<= 1`.
    pub fn new(moduli: ModulusPair) -> Result<Self, PidError> {
        let crt = CrtCoefficients::compute(&moduli)?;
        Ok(Self { moduli, crt })
    }

    #[must_use]
    pub const fn moduli(&self) -> &ModulusPair {
        &self.moduli
    }

    #[must_use]
    pub const fn coefficients(&self) -> &CrtCoefficients {
        &self.crt
    }

    /// Derive a Pid with randomness from the operating system.
    ///
    /// # Errors
    ///
    /// Returns `PidError::EntropySourceFailure` if the OS generator fails.
    pub fn derive(&self, identity: RealIdentity) -> Result<PseudoIdentity, PidError> {
        self.derive_with_rng(&mut OsRng, identity)
    }

    /// # Errors
    ///
    /// Returns `PidError::EntropySourceFailure` if `rng` fails.
    pub fn derive_with_rng<R>(&self, rng: &mut R, identity: RealIdentity) -> Result<PseudoIdentity, PidError>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let nonce: [u8; NONCE_LEN] = random_array(rng)?;
        let pid = self.derive_with_nonce(&nonce, &identity);
        // consumed once; the buffer is wiped here
        drop(identity);
        debug!(pid_len = pid.as_bytes().len(), "derived pseudo-identity");
        Ok(pid)
    }

    /// Deterministic core of the derivation for a given nonce `r`.
    ///
    /// Both residues are `(r XOR id) mod pq`. A textbook CRT split would reduce
    /// one mod `p` and the other mod `q`; the identical formula is kept as the
    /// contract and, since `cp + cq ≡ 1 (mod pq)`, the result equals
    /// `(r XOR id) mod pq`.
    #[must_use]
    pub fn derive_with_nonce(&self, nonce: &[u8], identity: &RealIdentity) -> PseudoIdentity {
        let r = BigUint::from_bytes_be(nonce);
        let mixed = r ^ identity.to_uint();
        let pid_p = &mixed % self.crt.modulus();
        let pid_q = &mixed % self.crt.modulus();
        PseudoIdentity::from_uint(&self.crt.combine(&pid_p, &pid_q))
    }
}

/// Three-argument form: validate `(p, q)`, then derive with OS randomness.
///
/// # Errors
///
/// Returns `PidError::MalformedIdentityInput` for an empty identity,
/// `PidError::NoModularInverse` for an invalid modulus pair and
/// `PidError::EntropySourceFailure` if the OS generator fails.
pub fn derive_pseudo_identity(
    real_identity: &[u8],
    p: &BigUint,
    q: &BigUint,
) -> Result<PseudoIdentity, PidError> {
    let identity = RealIdentity::try_from(real_identity)?;
    IdentityObfuscator::new(ModulusPair::new(p.clone(), q.clone()))?.derive(identity)
}
