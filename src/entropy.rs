//! Randomness is always injected: callers pass a `RngCore + CryptoRng`,
//! and the convenience entry points use the operating system generator.

use rand_core::{CryptoRng, RngCore};
use tracing::warn;

use crate::errors::PidError;

pub use rand_core::OsRng;

/// Fill `dest` from `rng`, surfacing generator failures instead of falling back.
///
/// # Errors
///
/// Returns `PidError::EntropySourceFailure` when the generator rejects the request.
pub fn fill_random<R>(rng: &mut R, dest: &mut [u8]) -> Result<(), PidError>
where
    R: RngCore + CryptoRng + ?Sized,
{
    rng.try_fill_bytes(dest).map_err(|e| {
        warn!(error = %e, len = dest.len(), "entropy source rejected request");
        PidError::EntropySourceFailure(e.to_string())
    })
}

/// # Errors
///
/// Returns `PidError::EntropySourceFailure` when the generator rejects the request.
pub fn random_array<const N: usize, R>(rng: &mut R) -> Result<[u8; N], PidError>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut out = [0u8; N];
    fill_random(rng, &mut out)?;
    Ok(out)
}
