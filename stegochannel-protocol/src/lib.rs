//! Wire-level protocol: key schedule, feature extraction, post selection,
//! frame codec, and the channel record those all operate over.

mod bits;
mod channel;
mod error;
mod features;
mod frame;
mod keys;
mod selector;

pub use bits::BitBuffer;
pub use channel::{new_channel_id, Channel, ChannelId, DEFAULT_LENGTH_THRESHOLD, EXPORT_PREFIX, EXPORT_VERSION};
pub use error::ProtocolFailure;
pub use features::{extract_bits, suggest_edits, FeatureId, FeatureSet, Suggestion};
pub use frame::{decode_frame, encode_frame, is_replay, DecodedMessage, FrameInput, MIN_FRAME_BITS};
pub use keys::{derive_epoch_keys, EpochKeys};
pub use selector::is_signal;
