use sha2::{Digest as _, Sha256};

use crate::types::{
    Challenge, ChallengePair, Digest, PseudoIdentity, SecretKey, BOUND_CHALLENGE_LEN, CHALLENGE_LEN,
};

/// SHA-256 of `data`.
#[must_use]
pub fn hash(data: &[u8]) -> Digest {
    hash_parts(&[data])
}

/// SHA-256 over the plain concatenation of `parts` (no length framing).
#[must_use]
pub fn hash_parts(parts: &[&[u8]]) -> Digest {
    let mut h = Sha256::new();
    for p in parts {
        h.update(p);
    }
    let digest = h.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// secretKey = H( pid )
#[must_use]
pub fn derive_secret_key(pid: &PseudoIdentity) -> SecretKey {
    SecretKey::new(hash(pid.as_bytes()))
}

/// h1 = H( challenge1 || challenge2 || pid )
#[must_use]
pub fn binding_digest(challenges: &ChallengePair, pid: &PseudoIdentity) -> Digest {
    hash_parts(&[&challenges.first.0, &challenges.second.0, pid.as_bytes()])
}

/// tag = H( challenge || pid )
#[must_use]
pub fn challenge_tag(challenge: &Challenge, pid: &PseudoIdentity) -> Digest {
    hash_parts(&[&challenge.0, pid.as_bytes()])
}

/// c = challenge || H( challenge || pid )
#[must_use]
pub fn bind_challenge(challenge: &Challenge, pid: &PseudoIdentity) -> [u8; BOUND_CHALLENGE_LEN] {
    let mut out = [0u8; BOUND_CHALLENGE_LEN];
    out[..CHALLENGE_LEN].copy_from_slice(&challenge.0);
    out[CHALLENGE_LEN..].copy_from_slice(&challenge_tag(challenge, pid));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_answers() {
        assert_eq!(
            hex::encode(hash(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            hex::encode(hash(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn parts_are_concatenated() {
        assert_eq!(hash_parts(&[b"a", b"bc"]), hash(b"abc"));
        assert_eq!(hash_parts(&[b"ab", b"", b"c"]), hash(b"abc"));
    }

    #[test]
    fn bound_challenge_layout() {
        let pid = PseudoIdentity::from_bytes(vec![0x06, 0xc3]).unwrap();
        let ch = Challenge([7u8; CHALLENGE_LEN]);
        let c = bind_challenge(&ch, &pid);
        assert_eq!(&c[..CHALLENGE_LEN], &ch.0);
        let mut expected = ch.0.to_vec();
        expected.extend_from_slice(pid.as_bytes());
        assert_eq!(c[CHALLENGE_LEN..], hash(&expected));
    }

    #[test]
    fn binding_digest_depends_on_order() {
        let pid = PseudoIdentity::from_bytes(vec![1]).unwrap();
        let a = Challenge([1u8; CHALLENGE_LEN]);
        let b = Challenge([2u8; CHALLENGE_LEN]);
        let ab = binding_digest(&ChallengePair { first: a, second: b }, &pid);
        let ba = binding_digest(&ChallengePair { first: b, second: a }, &pid);
        assert_ne!(ab, ba);
    }
}
