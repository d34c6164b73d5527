use rand_core::{CryptoRng, RngCore};
use tracing::info;

use crate::{
    entropy::OsRng,
    errors::PidError,
    hashers::derive_secret_key,
    obfuscator::IdentityObfuscator,
    types::{PseudoIdentity, RealIdentity, SecretKey},
};

pub const MAX_DEVICE_ID_LEN: usize = 256;

fn check_device_id(device_id: &str) -> Result<(), PidError> {
    if device_id.is_empty() || device_id.len() > MAX_DEVICE_ID_LEN {
        return Err(PidError::MalformedDeviceId { max: MAX_DEVICE_ID_LEN });
    }
    Ok(())
}

/// `(deviceId, Pid)` as handed to the ledger registration collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceRegistration {
    device_id: String,
    pid: PseudoIdentity,
}

impl DeviceRegistration {
    /// # Errors
    ///
    /// Returns `PidError::MalformedDeviceId` if `device_id` is empty or longer than
    /// [`MAX_DEVICE_ID_LEN`] bytes.
    pub fn new(device_id: impl Into<String>, pid: PseudoIdentity) -> Result<Self, PidError> {
        let device_id = device_id.into();
        check_device_id(&device_id)?;
        Ok(Self { device_id, pid })
    }

    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    #[must_use]
    pub const fn pid(&self) -> &PseudoIdentity {
        &self.pid
    }

    #[must_use]
    pub fn secret_key(&self) -> SecretKey {
        derive_secret_key(&self.pid)
    }

    #[must_use]
    pub fn into_parts(self) -> (String, PseudoIdentity) {
        (self.device_id, self.pid)
    }
}

/// Derive a fresh Pid for `identity` and pair it with the public `device_id`.
///
/// # Errors
///
/// Returns `PidError::MalformedDeviceId` for an unusable device id and
/// `PidError::EntropySourceFailure` if the OS generator fails.
pub fn register_device(
    obfuscator: &IdentityObfuscator,
    device_id: &str,
    identity: RealIdentity,
) -> Result<DeviceRegistration, PidError> {
    register_device_with_rng(obfuscator, &mut OsRng, device_id, identity)
}

/// # Errors
///
/// Same as [`register_device`], with `rng` as the entropy source.
pub fn register_device_with_rng<R>(
    obfuscator: &IdentityObfuscator,
    rng: &mut R,
    device_id: &str,
    identity: RealIdentity,
) -> Result<DeviceRegistration, PidError>
where
    R: RngCore + CryptoRng + ?Sized,
{
    // validated before any randomness is drawn
    check_device_id(device_id)?;
    let pid = obfuscator.derive_with_rng(rng, identity)?;
    info!(device_id, %pid, "device registration prepared");
    DeviceRegistration::new(device_id, pid)
}
