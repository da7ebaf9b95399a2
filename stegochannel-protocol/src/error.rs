use std::fmt;

use stegochannel_crypto::CryptoFailure;
use stegochannel_fec::RsFailure;

#[derive(Debug, Clone, PartialEq, Eq)]
enum ProtocolErrorKind {
    /// Fewer bits are available than the frame needs; not user-visible.
    FrameIncomplete,
    /// HMAC mismatch, unrecognized version, or (if encrypted) AEAD failure.
    FrameAuthFail,
    /// The RS parity could not repair the frame bytes.
    RsUncorrectable,
    /// `seq` is at or below the channel's last-accepted sequence number.
    ReplayRejected,
    /// A channel export string failed to parse.
    InvalidChannelString,
    /// A channel's own fields (feature set, rate, threshold) are invalid.
    BadConfig,
    /// A crypto primitive failed underneath frame encode/decode.
    Crypto,
}

impl fmt::Display for ProtocolErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProtocolErrorKind::FrameIncomplete => "frame_incomplete",
            ProtocolErrorKind::FrameAuthFail => "frame_auth_fail",
            ProtocolErrorKind::RsUncorrectable => "rs_uncorrectable",
            ProtocolErrorKind::ReplayRejected => "replay_rejected",
            ProtocolErrorKind::InvalidChannelString => "invalid_channel_string",
            ProtocolErrorKind::BadConfig => "bad_config",
            ProtocolErrorKind::Crypto => "crypto",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolFailure {
    kind: ProtocolErrorKind,
    detail: String,
}

impl ProtocolFailure {
    fn new(kind: ProtocolErrorKind, detail: impl Into<String>) -> Self {
        ProtocolFailure { kind, detail: detail.into() }
    }

    pub fn frame_incomplete(detail: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::FrameIncomplete, detail)
    }

    pub fn frame_auth_fail(detail: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::FrameAuthFail, detail)
    }

    pub fn rs_uncorrectable(detail: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::RsUncorrectable, detail)
    }

    pub fn replay_rejected(detail: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::ReplayRejected, detail)
    }

    pub fn invalid_channel_string(detail: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::InvalidChannelString, detail)
    }

    pub fn bad_config(detail: impl Into<String>) -> Self {
        Self::new(ProtocolErrorKind::BadConfig, detail)
    }

    pub fn is_frame_incomplete(&self) -> bool {
        self.kind == ProtocolErrorKind::FrameIncomplete
    }

    /// `true` for the two kinds the reassembler recovers from identically:
    /// sliding the window by one signal post and retrying.
    pub fn is_recoverable_by_sliding(&self) -> bool {
        matches!(self.kind, ProtocolErrorKind::FrameAuthFail | ProtocolErrorKind::RsUncorrectable)
    }
}

impl fmt::Display for ProtocolFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "protocol failure ({}): {}", self.kind, self.detail)
    }
}

impl std::error::Error for ProtocolFailure {}

impl From<CryptoFailure> for ProtocolFailure {
    fn from(e: CryptoFailure) -> Self {
        ProtocolFailure::new(ProtocolErrorKind::Crypto, e.to_string())
    }
}

impl From<RsFailure> for ProtocolFailure {
    fn from(e: RsFailure) -> Self {
        ProtocolFailure::new(ProtocolErrorKind::RsUncorrectable, e.to_string())
    }
}
