use std::fmt;

use stegochannel_beacon::BeaconFailure;
use stegochannel_crypto::CryptoFailure;
use stegochannel_engine::EngineFailure;
use stegochannel_fec::RsFailure;
use stegochannel_protocol::ProtocolFailure;

/// The single error type the facade exposes, one variant per upstream
/// crate. Matches every upstream crate's own shape: a tagged kind with a
/// human-readable detail, never a flat string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Crypto(CryptoFailure),
    Fec(RsFailure),
    Beacon(BeaconFailure),
    Protocol(ProtocolFailure),
    Engine(EngineFailure),
    /// No transmission is in flight; there is nothing to confirm or cancel.
    NoActiveTransmission,
    /// `begin_send` was called while a transmission is already
    /// `Queued`/`Transmitting`; cancel it first.
    TransmissionInProgress,
    /// A post-source adapter failed to produce posts.
    PostSource(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Crypto(e) => write!(f, "{e}"),
            Error::Fec(e) => write!(f, "{e}"),
            Error::Beacon(e) => write!(f, "{e}"),
            Error::Protocol(e) => write!(f, "{e}"),
            Error::Engine(e) => write!(f, "{e}"),
            Error::NoActiveTransmission => write!(f, "no transmission is currently in flight"),
            Error::TransmissionInProgress => {
                write!(f, "a transmission is already in flight on this channel")
            }
            Error::PostSource(detail) => write!(f, "post source failure: {detail}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<CryptoFailure> for Error {
    fn from(e: CryptoFailure) -> Self {
        Error::Crypto(e)
    }
}

impl From<RsFailure> for Error {
    fn from(e: RsFailure) -> Self {
        Error::Fec(e)
    }
}

impl From<BeaconFailure> for Error {
    fn from(e: BeaconFailure) -> Self {
        Error::Beacon(e)
    }
}

impl From<ProtocolFailure> for Error {
    fn from(e: ProtocolFailure) -> Self {
        Error::Protocol(e)
    }
}

impl From<EngineFailure> for Error {
    fn from(e: EngineFailure) -> Self {
        Error::Engine(e)
    }
}
