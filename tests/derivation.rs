use core::num::NonZeroU32;

use num_bigint::BigUint;
use puf_pid_core::*;
use rand_chacha::ChaCha20Rng;
use rand_core::{CryptoRng, RngCore, SeedableRng};

struct BrokenRng;

impl RngCore for BrokenRng {
    fn next_u32(&mut self) -> u32 {
        0
    }
    fn next_u64(&mut self) -> u64 {
        0
    }
    fn fill_bytes(&mut self, _dest: &mut [u8]) {}
    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand_core::Error> {
        Err(NonZeroU32::new(rand_core::Error::CUSTOM_START + 7).unwrap().into())
    }
}

impl CryptoRng for BrokenRng {}

fn wide_pair() -> ModulusPair {
    // Mersenne primes 2^61 - 1 and 2^31 - 1
    ModulusPair::new(BigUint::from((1u64 << 61) - 1), BigUint::from((1u64 << 31) - 1))
}

#[test]
fn device_42_reference_scenario() {
    let pid = derive_pseudo_identity(b"device-42", &BigUint::from(107u32), &BigUint::from(113u32)).unwrap();
    assert!(!pid.as_bytes().is_empty());
    assert!(pid.as_bytes().len() <= 2);
    assert!(pid.to_uint() < BigUint::from(107u32 * 113));
}

#[test]
fn fixed_nonce_is_reproducible() {
    let obfuscator = IdentityObfuscator::new(ModulusPair::default()).unwrap();
    let identity = RealIdentity::try_from("device-42").unwrap();
    let nonce: Vec<u8> = (0u8..16).collect();
    let pid = obfuscator.derive_with_nonce(&nonce, &identity);
    // (0x000102..0f XOR "device-42") mod 12091 = 5937 = 0x1731
    assert_eq!(pid.as_bytes(), &[0x17, 0x31]);
    assert_eq!(pid.to_string(), "1731");
    assert_eq!(obfuscator.derive_with_nonce(&nonce, &identity), pid);
}

#[test]
fn zero_pid_is_one_byte() {
    let obfuscator = IdentityObfuscator::new(ModulusPair::default()).unwrap();
    let nonce = [0x5au8; NONCE_LEN];
    let identity = RealIdentity::new(nonce.to_vec()).unwrap();
    assert_eq!(obfuscator.derive_with_nonce(&nonce, &identity).as_bytes(), &[0x00]);
}

#[test]
fn repeated_derivations_differ_but_follow_the_formula() {
    let obfuscator = IdentityObfuscator::new(wide_pair()).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(42);
    let a = obfuscator.derive_with_rng(&mut rng, RealIdentity::try_from("device-42").unwrap()).unwrap();
    let b = obfuscator.derive_with_rng(&mut rng, RealIdentity::try_from("device-42").unwrap()).unwrap();
    assert_ne!(a, b);

    // replay the same draws
    let mut replay = ChaCha20Rng::seed_from_u64(42);
    let identity = RealIdentity::try_from("device-42").unwrap();
    for pid in [&a, &b] {
        let mut nonce = [0u8; NONCE_LEN];
        replay.fill_bytes(&mut nonce);
        assert_eq!(&obfuscator.derive_with_nonce(&nonce, &identity), pid);
    }
}

#[test]
fn os_randomness_yields_fresh_pids() {
    let obfuscator = IdentityObfuscator::new(wide_pair()).unwrap();
    let a = obfuscator.derive(RealIdentity::try_from("device-42").unwrap()).unwrap();
    let b = obfuscator.derive(RealIdentity::try_from("device-42").unwrap()).unwrap();
    assert_ne!(a, b);
    assert!(a.to_uint() < wide_pair().product());
}

#[test]
fn empty_identity_rejected_before_arithmetic() {
    assert!(matches!(RealIdentity::new(Vec::new()), Err(PidError::MalformedIdentityInput)));
    // also with moduli that would fail later
    let err = derive_pseudo_identity(b"", &BigUint::from(6u32), &BigUint::from(9u32)).unwrap_err();
    assert!(matches!(err, PidError::MalformedIdentityInput));
}

#[test]
fn non_coprime_moduli_rejected() {
    for (p, q) in [(107u32, 107u32), (6, 9), (1, 113), (107, 0)] {
        let err = derive_pseudo_identity(b"device-42", &BigUint::from(p), &BigUint::from(q)).unwrap_err();
        assert!(matches!(err, PidError::NoModularInverse { .. }), "p={p} q={q}");
    }
    assert!(IdentityObfuscator::new(ModulusPair::new(14u32, 21u32)).is_err());
}

#[test]
fn entropy_failure_propagates() {
    let obfuscator = IdentityObfuscator::new(ModulusPair::default()).unwrap();
    let err = obfuscator
        .derive_with_rng(&mut BrokenRng, RealIdentity::try_from("device-42").unwrap())
        .unwrap_err();
    assert!(matches!(err, PidError::EntropySourceFailure(_)));
}

#[test]
fn secret_key_is_hash_of_pid() {
    let pid = PseudoIdentity::from_bytes(vec![0x17, 0x31]).unwrap();
    let key = derive_secret_key(&pid);
    assert_eq!(key.as_bytes(), &hash(&[0x17, 0x31]));
    assert_eq!(key, derive_secret_key(&pid.clone()));
    assert_ne!(key, derive_secret_key(&PseudoIdentity::from_bytes(vec![0x17, 0x32]).unwrap()));
}

#[test]
fn registration_payload_for_ledger() {
    let obfuscator = IdentityObfuscator::new(ModulusPair::default()).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let reg = register_device_with_rng(
        &obfuscator,
        &mut rng,
        "sensor-0017",
        RealIdentity::try_from("device-42").unwrap(),
    )
    .unwrap();
    assert_eq!(reg.device_id(), "sensor-0017");
    assert!(reg.pid().to_uint() < BigUint::from(12_091u32));
    assert_eq!(reg.secret_key(), derive_secret_key(reg.pid()));

    let bytes = encode_registration(&reg).unwrap();
    assert_eq!(&bytes[..4], &11u32.to_le_bytes());
    assert_eq!(decode_registration(&bytes).unwrap(), reg);
}

#[test]
fn registration_rejects_bad_device_id() {
    let obfuscator = IdentityObfuscator::new(ModulusPair::default()).unwrap();
    let err = register_device(&obfuscator, "", RealIdentity::try_from("device-42").unwrap()).unwrap_err();
    assert!(matches!(err, PidError::MalformedDeviceId { .. }));
    let long = "x".repeat(registration::MAX_DEVICE_ID_LEN + 1);
    assert!(register_device(&obfuscator, &long, RealIdentity::try_from("device-42").unwrap()).is_err());
}

#[test]
fn real_identity_never_printed() {
    let identity = RealIdentity::try_from("device-42").unwrap();
    assert_eq!(format!("{identity:?}"), "RealIdentity(<redacted>)");
}

#[test]
fn pid_bytes_must_be_minimal() {
    assert!(PseudoIdentity::from_bytes(vec![0x00]).is_ok());
    assert!(PseudoIdentity::from_bytes(vec![0x06]).is_ok());
    assert!(matches!(PseudoIdentity::from_bytes(vec![0x00, 0x06]), Err(PidError::DecodeError(_))));
    assert!(matches!(PseudoIdentity::from_bytes(vec![0x00, 0x00]), Err(PidError::DecodeError(_))));

    // the same integer padded on the wire must not yield a second secret key
    let mut padded = Vec::new();
    padded.extend_from_slice(&3u32.to_le_bytes());
    padded.extend_from_slice(b"dev");
    padded.extend_from_slice(&2u32.to_le_bytes());
    padded.extend_from_slice(&[0x00, 0x06]);
    assert!(matches!(decode_registration(&padded), Err(PidError::DecodeError(_))));
}
