//! StegoChannel: covert, bandwidth-efficient communication over a public
//! social feed, keyed by a shared secret and a public unpredictable beacon.
//!
//! This crate is the facade over six smaller crates (`stegochannel-crypto`,
//! `-fec`, `-beacon`, `-protocol`, `-engine`) wired together behind
//! [`ChannelHandle`]. An embedder implements [`PostSource`],
//! [`stegochannel_beacon::BeaconSource`], and optionally
//! [`stegochannel_engine::ChannelStore`]; everything else is provided.

mod channel;
mod error;
mod post_source;

pub use channel::{ChannelHandle, ReceivedFrame, SendDecision, SendSuggestion};
pub use error::Error;
pub use post_source::PostSource;

pub use stegochannel_beacon::{BeaconCache, BeaconFailure, BeaconKind, BeaconSource, BeaconValue, RawBeacon};
pub use stegochannel_crypto::{CryptoErrorKind, CryptoFailure, NONCE_LEN};
pub use stegochannel_engine::{
    CandidateDecision, CandidateEpoch, ChannelStore, Diagnostic, EngineFailure, MemoryChannelStore,
    PersistedChannel, Post, PostId, Progress, Reassembler, ScanOutcome, SequenceState, Transmitter,
    TransmissionStatus,
};
pub use stegochannel_fec::RsFailure;
pub use stegochannel_protocol::{
    new_channel_id, Channel, ChannelId, FeatureId, FeatureSet, ProtocolFailure, Suggestion,
    DEFAULT_LENGTH_THRESHOLD,
};
