use num_bigint::BigUint;

use crate::{
    errors::PidError,
    registration::{DeviceRegistration, MAX_DEVICE_ID_LEN},
    types::PseudoIdentity,
};

#[inline]
#[must_use]
pub const fn le32(x: u32) -> [u8; 4] {
    x.to_le_bytes()
}

/// Minimal big-endian bytes, no padding. Zero is the single byte `0x00`.
#[must_use]
pub fn encode_uint(value: &BigUint) -> Vec<u8> {
    value.to_bytes_be()
}

#[must_use]
pub fn decode_uint(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

fn len_prefix(len: usize) -> Result<[u8; 4], PidError> {
    u32::try_from(len)
        .map(le32)
        .map_err(|_| PidError::EncodeLimit { max: u32::MAX as usize, got: len })
}

/// Canonical registration payload for the ledger:
/// `LE32(|device_id|) || device_id || LE32(|pid|) || pid`
///
/// # Errors
///
/// Returns `PidError::EncodeLimit` if a field does not fit a 32-bit length prefix.
pub fn encode_registration(reg: &DeviceRegistration) -> Result<Vec<u8>, PidError> {
    let id = reg.device_id().as_bytes();
    let pid = reg.pid().as_bytes();
    let mut v = Vec::with_capacity(4 + id.len() + 4 + pid.len());
    v.extend_from_slice(&len_prefix(id.len())?);
    v.extend_from_slice(id);
    v.extend_from_slice(&len_prefix(pid.len())?);
    v.extend_from_slice(pid);
    Ok(v)
}

fn read_field<'a>(data: &'a [u8], offset: &mut usize) -> Result<&'a [u8], PidError> {
    let Some(prefix) = data.get(*offset..*offset + 4) else {
        return Err(PidError::DecodeError("short length prefix"));
    };
    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(prefix);
    let len = u32::from_le_bytes(len_bytes) as usize;
    let start = *offset + 4;
    let end = start
        .checked_add(len)
        .ok_or(PidError::DecodeError("length prefix overflow"))?;
    if data.len() < end {
        return Err(PidError::InvalidLength { expected: end, got: data.len() });
    }
    *offset = end;
    Ok(&data[start..end])
}

/// Decode a registration payload. Lengths are exact; no trailing bytes.
///
/// # Errors
///
/// Returns `PidError` if the data is truncated, has trailing bytes, the device
/// id is not valid UTF-8 or either field is empty.
pub fn decode_registration(data: &[u8]) -> Result<DeviceRegistration, PidError> {
    let mut offset = 0usize;
    let id = read_field(data, &mut offset)?;
    if id.len() > MAX_DEVICE_ID_LEN {
        return Err(PidError::MalformedDeviceId { max: MAX_DEVICE_ID_LEN });
    }
    let pid = read_field(data, &mut offset)?;
    if offset != data.len() {
        return Err(PidError::InvalidLength { expected: offset, got: data.len() });
    }
    let device_id = core::str::from_utf8(id).map_err(|_| PidError::DecodeError("device id is not UTF-8"))?;
    DeviceRegistration::new(device_id, PseudoIdentity::from_bytes(pid)?)
}
