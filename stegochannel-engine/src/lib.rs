//! Sender and receiver state machines that sit on top of the wire-level
//! protocol crate: the bit planner (what to do with one candidate outgoing
//! post) and the reassembler (what to do with a window of peer posts),
//! plus the channel-store seam they checkpoint against.

mod error;
mod post;
mod receiver;
mod sender;
mod sequence;
mod store;

pub use error::EngineFailure;
pub use post::{CandidateEpoch, Post, PostId};
pub use receiver::{Diagnostic, Reassembler, ReceivedMessage, ScanOutcome};
pub use sender::{CandidateDecision, Progress, Transmitter, TransmissionStatus};
pub use sequence::SequenceState;
pub use store::{ChannelStore, MemoryChannelStore, PersistedChannel};
