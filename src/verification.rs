use crate::types::{ChallengePair, ChannelId, Digest, PseudoIdentity, ResponsePair};

/// Everything a verifier sees for one authentication attempt.
#[derive(Clone, Copy, Debug)]
pub struct VerificationContext<'a> {
    pub pid: &'a PseudoIdentity,
    pub challenges: &'a ChallengePair,
    /// h1 = H(challenge1 || challenge2 || pid)
    pub binding: &'a Digest,
    pub c1: &'a [u8],
    pub c2: &'a [u8],
    pub responses: &'a ResponsePair,
    pub channel: Option<&'a ChannelId>,
}

/// Decision step of the handshake.
///
/// A production policy compares `responses` with enrollment-time responses for
/// the same `pid` (exact or fuzzy match) and checks the physical channel.
pub trait VerificationPolicy {
    fn verify(&self, ctx: &VerificationContext<'_>) -> bool;
}

impl<F> VerificationPolicy for F
where
    F: Fn(&VerificationContext<'_>) -> bool,
{
    fn verify(&self, ctx: &VerificationContext<'_>) -> bool {
        self(ctx)
    }
}

/// Reference policy: accepts every response.
///
/// No enrollment store exists yet, so nothing is compared. Replace it via
/// `AuthenticationProtocol::with_policy` before relying on the outcome.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAll;

impl VerificationPolicy for AcceptAll {
    fn verify(&self, _ctx: &VerificationContext<'_>) -> bool {
        true
    }
}
