use std::fmt;

use stegochannel_beacon::BeaconFailure;
use stegochannel_crypto::CryptoFailure;
use stegochannel_protocol::ProtocolFailure;

#[derive(Debug, Clone, PartialEq, Eq)]
enum EngineErrorKind {
    /// A frame codec or key-schedule failure bubbled up from `stegochannel-protocol`.
    Protocol,
    /// The beacon cache couldn't produce a value for the epoch in play.
    Beacon,
    /// A `ChannelStore` implementation failed to load, save, or delete a record.
    Store,
}

impl fmt::Display for EngineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EngineErrorKind::Protocol => "protocol",
            EngineErrorKind::Beacon => "beacon",
            EngineErrorKind::Store => "store",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineFailure {
    kind: EngineErrorKind,
    detail: String,
}

impl EngineFailure {
    pub fn store(detail: impl Into<String>) -> Self {
        EngineFailure { kind: EngineErrorKind::Store, detail: detail.into() }
    }
}

impl fmt::Display for EngineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "engine failure ({}): {}", self.kind, self.detail)
    }
}

impl std::error::Error for EngineFailure {}

impl From<ProtocolFailure> for EngineFailure {
    fn from(e: ProtocolFailure) -> Self {
        EngineFailure { kind: EngineErrorKind::Protocol, detail: e.to_string() }
    }
}

impl From<BeaconFailure> for EngineFailure {
    fn from(e: BeaconFailure) -> Self {
        EngineFailure { kind: EngineErrorKind::Beacon, detail: e.to_string() }
    }
}

impl From<CryptoFailure> for EngineFailure {
    fn from(e: CryptoFailure) -> Self {
        EngineFailure { kind: EngineErrorKind::Protocol, detail: e.to_string() }
    }
}
