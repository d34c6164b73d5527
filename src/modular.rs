use num_bigint::{BigInt, BigUint};
use num_traits::{One, Signed, Zero};

use crate::{errors::PidError, types::ModulusPair};

fn no_inverse(m: &BigUint) -> PidError {
    PidError::NoModularInverse { modulus: m.to_string() }
}

/// Unique `x` in `[0, m)` with `a·x ≡ 1 (mod m)`, by the iterative extended Euclidean algorithm.
///
/// # Errors
///
/// Returns `PidError::NoModularInverse` if `m <= 1` or `gcd(a, m) != 1`.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint, PidError> {
    if *m <= BigUint::one() {
        return Err(no_inverse(m));
    }
    let modulus = BigInt::from(m.clone());
    let (mut old_r, mut r) = (BigInt::from(a % m), modulus.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let quotient = &old_r / &r;
        let next_r = &old_r - &quotient * &r;
        old_r = core::mem::replace(&mut r, next_r);
        let next_s = &old_s - &quotient * &s;
        old_s = core::mem::replace(&mut s, next_s);
    }

    // old_r is now gcd(a mod m, m)
    if !old_r.is_one() {
        return Err(no_inverse(m));
    }
    // Bézout coefficient lies in (-m, m): one correction suffices
    if old_s.is_negative() {
        old_s += &modulus;
    }
    old_s.to_biguint().ok_or_else(|| no_inverse(m))
}

/// Recombination coefficients for a modulus pair.
///
/// `cp = (q · (q⁻¹ mod p)) mod pq` and `cq = (p · (p⁻¹ mod q)) mod pq`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrtCoefficients {
    modulus: BigUint,
    cp: BigUint,
    cq: BigUint,
}

impl CrtCoefficients {
    /// # Errors
    ///
    /// Returns `PidError::NoModularInverse` when `p` and `q` are not coprime or either is `<= 1`.
    pub fn compute(pair: &ModulusPair) -> Result<Self, PidError> {
        let (p, q) = (pair.p(), pair.q());
        let q_inv = mod_inverse(q, p)?;
        let p_inv = mod_inverse(p, q)?;
        let modulus = pair.product();
        let cp = (q * (q_inv % p)) % &modulus;
        let cq = (p * (p_inv % q)) % &modulus;
        Ok(Self { modulus, cp, cq })
    }

    /// `p · q`
    #[must_use]
    pub const fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    #[must_use]
    pub const fn cp(&self) -> &BigUint {
        &self.cp
    }

    #[must_use]
    pub const fn cq(&self) -> &BigUint {
        &self.cq
    }

    /// `(pid_p · cp + pid_q · cq) mod pq`
    #[must_use]
    pub fn combine(&self, pid_p: &BigUint, pid_q: &BigUint) -> BigUint {
        (pid_p * &self.cp + pid_q * &self.cq) % &self.modulus
    }
}
