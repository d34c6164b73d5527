#![no_main]
use libfuzzer_sys::fuzz_target;
use puf_pid_core::ser::{decode_registration, encode_registration};

fuzz_target!(|data: &[u8]| {
    // Decoding must never panic; accepted payloads re-encode byte-exactly
    if let Ok(reg) = decode_registration(data) {
        let again = encode_registration(&reg).expect("decoded registration re-encodes");
        assert_eq!(again, data);
    }
});
