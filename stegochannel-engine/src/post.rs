use std::time::SystemTime;

/// Opaque identifier of a post on the counterparty's network, as committed
/// by the sender before publishing.
pub type PostId = String;

/// A post as consumed by the core, independent of which social network
/// supplied it. Posts are totally ordered by `(created_at, id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub author_id: String,
    pub text: String,
    pub has_media: bool,
    pub created_at: SystemTime,
}

/// A beacon epoch window the reassembler can group posts into, supplied by
/// the caller because only the embedder can look up a *historical* beacon
/// value by timestamp; [`stegochannel_beacon::BeaconSource`] only exposes the
/// currently valid one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateEpoch {
    pub epoch_id: String,
    pub valid_from: SystemTime,
    pub expires_at: SystemTime,
    pub grace_period_seconds: u64,
}

impl CandidateEpoch {
    /// `true` iff `created_at` falls within this epoch's validity window,
    /// extended through its grace period (the overlap where a post could
    /// plausibly belong to either this epoch or its successor).
    pub fn covers(&self, created_at: SystemTime) -> bool {
        let usable_until = self.expires_at + std::time::Duration::from_secs(self.grace_period_seconds);
        created_at >= self.valid_from && created_at <= usable_until
    }
}
