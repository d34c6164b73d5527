#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint::BigUint;
use puf_pid_core::{derive_pseudo_identity, PidError};

fuzz_target!(|data: &[u8]| {
    // Layout: p(8) || q(8) || real identity
    if data.len() < 16 { return; }
    let p = BigUint::from(u64::from_le_bytes(data[0..8].try_into().unwrap_or([0u8; 8])));
    let q = BigUint::from(u64::from_le_bytes(data[8..16].try_into().unwrap_or([0u8; 8])));
    let identity = &data[16..];

    match derive_pseudo_identity(identity, &p, &q) {
        Ok(pid) => assert!(pid.to_uint() < &p * &q),
        Err(PidError::MalformedIdentityInput) => assert!(identity.is_empty()),
        Err(PidError::NoModularInverse { .. }) => {}
        Err(e) => panic!("unexpected error: {e}"),
    }
});
