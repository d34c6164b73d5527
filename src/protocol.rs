use rand_core::{CryptoRng, RngCore};
use tracing::{info, trace, warn};

use crate::{
    entropy::{random_array, OsRng},
    errors::PidError,
    hashers::{bind_challenge, binding_digest},
    puf::PufModel,
    types::{
        AuthOutcome, AuthState, Challenge, ChallengePair, ChannelId, Digest, PseudoIdentity,
        BOUND_CHALLENGE_LEN,
    },
    verification::{AcceptAll, VerificationContext, VerificationPolicy},
};

/// Bound challenges handed to the PUF: `c = challenge || H(challenge || pid)`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct MinerRequest {
    pub c1: [u8; BOUND_CHALLENGE_LEN],
    pub c2: [u8; BOUND_CHALLENGE_LEN],
}

impl MinerRequest {
    #[must_use]
    pub fn build(challenges: &ChallengePair, pid: &PseudoIdentity) -> Self {
        Self {
            c1: bind_challenge(&challenges.first, pid),
            c2: bind_challenge(&challenges.second, pid),
        }
    }
}

impl core::fmt::Debug for MinerRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MinerRequest")
            .field("c1", &hex::encode(self.c1))
            .field("c2", &hex::encode(self.c2))
            .finish()
    }
}

/// One authentication attempt: `Idle -> ChallengeIssued -> Verified | Rejected`.
///
/// Challenges are generated once per session and consumed by [`AuthSession::conclude`].
#[derive(Debug)]
pub struct AuthSession<'a> {
    pid: &'a PseudoIdentity,
    channel: Option<&'a ChannelId>,
    state: AuthState,
    issued: Option<(ChallengePair, Digest)>,
}

impl<'a> AuthSession<'a> {
    #[must_use]
    pub const fn new(pid: &'a PseudoIdentity, channel: Option<&'a ChannelId>) -> Self {
        Self { pid, channel, state: AuthState::Idle, issued: None }
    }

    #[must_use]
    pub const fn state(&self) -> AuthState {
        self.state
    }

    #[must_use]
    pub fn challenges(&self) -> Option<&ChallengePair> {
        self.issued.as_ref().map(|(c, _)| c)
    }

    /// h1 for the issued challenges.
    #[must_use]
    pub fn binding(&self) -> Option<&Digest> {
        self.issued.as_ref().map(|(_, h1)| h1)
    }

    fn expect_state(&self, expected: AuthState) -> Result<(), PidError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(PidError::InvalidState { expected, found: self.state })
        }
    }

    fn transition(&mut self, to: AuthState) {
        trace!(from = ?self.state, to = ?to, "auth session transition");
        self.state = to;
    }

    /// Draw two independent challenges from `rng`.
    ///
    /// # Errors
    ///
    /// Returns `PidError::InvalidState` unless the session is idle, and
    /// `PidError::EntropySourceFailure` if `rng` fails.
    pub fn issue_challenges<R>(&mut self, rng: &mut R) -> Result<ChallengePair, PidError>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        self.expect_state(AuthState::Idle)?;
        let first = Challenge(random_array(rng)?);
        let second = Challenge(random_array(rng)?);
        self.accept_challenges(ChallengePair { first, second })
    }

    /// Issue caller-chosen challenges, e.g. ones drawn by a remote verifier.
    ///
    /// # Errors
    ///
    /// Returns `PidError::InvalidState` unless the session is idle.
    pub fn accept_challenges(&mut self, challenges: ChallengePair) -> Result<ChallengePair, PidError> {
        self.expect_state(AuthState::Idle)?;
        let h1 = binding_digest(&challenges, self.pid);
        self.issued = Some((challenges, h1));
        self.transition(AuthState::ChallengeIssued);
        Ok(challenges)
    }

    /// # Errors
    ///
    /// Returns `PidError::InvalidState` if no challenges are outstanding.
    pub fn miner_request(&self) -> Result<MinerRequest, PidError> {
        self.expect_state(AuthState::ChallengeIssued)?;
        let (challenges, _) = self.issued.as_ref().ok_or(PidError::InvalidState {
            expected: AuthState::ChallengeIssued,
            found: self.state,
        })?;
        Ok(MinerRequest::build(challenges, self.pid))
    }

    /// Query the PUF with the bound challenges and let `policy` decide.
    ///
    /// A PUF failure ends the session as `Rejected` and is returned as an error.
    ///
    /// # Errors
    ///
    /// Returns `PidError::InvalidState` if no challenges are outstanding and
    /// `PidError::PufFailure` (or any error of the backend) if the PUF fails.
    pub fn conclude<P, V>(&mut self, puf: &P, policy: &V) -> Result<AuthOutcome, PidError>
    where
        P: PufModel + ?Sized,
        V: VerificationPolicy + ?Sized,
    {
        let request = self.miner_request()?;
        let responses = match puf.respond(&request.c1, &request.c2) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "PUF did not respond");
                self.transition(AuthState::Rejected);
                return Err(e);
            }
        };
        let (challenges, binding) = self.issued.as_ref().ok_or(PidError::InvalidState {
            expected: AuthState::ChallengeIssued,
            found: self.state,
        })?;
        let ctx = VerificationContext {
            pid: self.pid,
            challenges,
            binding,
            c1: &request.c1,
            c2: &request.c2,
            responses: &responses,
            channel: self.channel,
        };
        let outcome = if policy.verify(&ctx) { AuthOutcome::Verified } else { AuthOutcome::Rejected };
        self.transition(outcome.into());
        Ok(outcome)
    }
}

/// Runs single authentication rounds under a [`VerificationPolicy`].
#[derive(Clone, Debug, Default)]
pub struct AuthenticationProtocol<V = AcceptAll> {
    policy: V,
}

impl AuthenticationProtocol<AcceptAll> {
    /// Protocol with the reference policy, which accepts every response.
    #[must_use]
    pub const fn new() -> Self {
        Self { policy: AcceptAll }
    }
}

impl<V: VerificationPolicy> AuthenticationProtocol<V> {
    pub const fn with_policy(policy: V) -> Self {
        Self { policy }
    }

    #[must_use]
    pub const fn policy(&self) -> &V {
        &self.policy
    }

    /// One round with OS randomness and no channel identifier.
    ///
    /// # Errors
    ///
    /// Returns `PidError::EntropySourceFailure` if challenge generation fails
    /// and any error reported by the PUF backend.
    pub fn authenticate<P>(&self, pid: &PseudoIdentity, puf: &P) -> Result<AuthOutcome, PidError>
    where
        P: PufModel + ?Sized,
    {
        self.authenticate_with(&mut OsRng, pid, puf, None)
    }

    /// # Errors
    ///
    /// Returns `PidError::EntropySourceFailure` if `rng` fails and any error
    /// reported by the PUF backend.
    pub fn authenticate_with<R, P>(
        &self,
        rng: &mut R,
        pid: &PseudoIdentity,
        puf: &P,
        channel: Option<&ChannelId>,
    ) -> Result<AuthOutcome, PidError>
    where
        R: RngCore + CryptoRng + ?Sized,
        P: PufModel + ?Sized,
    {
        let mut session = AuthSession::new(pid, channel);
        session.issue_challenges(rng)?;
        let outcome = session.conclude(puf, &self.policy)?;
        match outcome {
            AuthOutcome::Verified => info!(%pid, "authentication successful"),
            AuthOutcome::Rejected => warn!(%pid, "authentication failed"),
        }
        Ok(outcome)
    }
}
