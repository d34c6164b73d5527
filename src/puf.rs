use crate::{
    entropy::{random_array, OsRng},
    errors::PidError,
    types::{ResponsePair, CHALLENGE_LEN},
};

/// Physical unclonable function capability queried during authentication.
///
/// `c1` and `c2` are bound challenges (`challenge || H(challenge || pid)`).
pub trait PufModel {
    /// # Errors
    ///
    /// Returns `PidError::PufFailure` when the device cannot produce a response.
    fn respond(&self, c1: &[u8], c2: &[u8]) -> Result<ResponsePair, PidError>;
}

impl<P: PufModel + ?Sized> PufModel for &P {
    fn respond(&self, c1: &[u8], c2: &[u8]) -> Result<ResponsePair, PidError> {
        (**self).respond(c1, c2)
    }
}

/// Adapter turning a closure into a [`PufModel`].
#[derive(Clone, Copy, Debug)]
pub struct FnPuf<F>(F);

/// Wrap `f` as a PUF backend.
pub const fn from_fn<F>(f: F) -> FnPuf<F>
where
    F: Fn(&[u8], &[u8]) -> (Vec<u8>, Vec<u8>),
{
    FnPuf(f)
}

impl<F> PufModel for FnPuf<F>
where
    F: Fn(&[u8], &[u8]) -> (Vec<u8>, Vec<u8>),
{
    fn respond(&self, c1: &[u8], c2: &[u8]) -> Result<ResponsePair, PidError> {
        Ok((self.0)(c1, c2).into())
    }
}

/// Stand-in device that answers every challenge with fresh random bytes.
///
/// Its responses carry no information about the challenge; it only exercises
/// the protocol path where no hardware is attached. Responses always come from
/// the operating system generator. A reproducible stand-in is a [`from_fn`]
/// closure over a caller-owned seeded generator.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimulatedPuf;

impl PufModel for SimulatedPuf {
    fn respond(&self, _c1: &[u8], _c2: &[u8]) -> Result<ResponsePair, PidError> {
        let r1: [u8; CHALLENGE_LEN] = random_array(&mut OsRng)?;
        let r2: [u8; CHALLENGE_LEN] = random_array(&mut OsRng)?;
        Ok(ResponsePair { r1: r1.to_vec(), r2: r2.to_vec() })
    }
}
