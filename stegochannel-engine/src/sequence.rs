/// Per-channel sequence counters, held apart from [`stegochannel_protocol::Channel`]
/// so the channel's immutable fields can be cloned freely without aliasing
/// the mutable send/recv cursors. Guarded by the per-channel lock described
/// in the concurrency model: sender and receiver must serialize access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceState {
    pub next_send_seq: u32,
    pub next_recv_seq: u32,
}

impl SequenceState {
    pub fn new() -> Self {
        SequenceState::default()
    }
}
