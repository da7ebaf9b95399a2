//! Reassembler: groups a window of peer posts by beacon epoch, extracts
//! signal bits, and attempts to decode frames out of the accumulated
//! stream, sliding past noise when a decode attempt fails.

use std::collections::{HashSet, VecDeque};

use tracing::{info, warn};

use stegochannel_beacon::BeaconKind;
use stegochannel_protocol::{
    decode_frame, derive_epoch_keys, extract_bits, is_replay, is_signal, BitBuffer, FeatureSet, MIN_FRAME_BITS,
};

use crate::error::EngineFailure;
use crate::post::{CandidateEpoch, Post, PostId};
use crate::sequence::SequenceState;

const MAX_WASTED_SLIDES: usize = 32;

struct PendingChunk {
    post_id: PostId,
    bits: Vec<bool>,
}

/// One decoded or rejected frame, with the posts that contributed its bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub seq: u32,
    pub payload: Vec<u8>,
    pub ec_corrections: usize,
    pub contributing_posts: Vec<PostId>,
    /// `false` when this frame's `seq` was at or below the channel's
    /// `next_recv_seq` — rejected as a replay, but still reported so the
    /// caller can log it.
    pub accepted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// 32 consecutive window slides found no decodable frame; the oldest
    /// bit was dropped to make forward progress.
    NoiseBurst { dropped_bits: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    pub messages: Vec<ReceivedMessage>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Holds the unconsumed bit tail across calls, so a frame straddling two
/// `scan()` invocations still completes. One `Reassembler` per channel.
#[derive(Default)]
pub struct Reassembler {
    pending: VecDeque<PendingChunk>,
    seen: HashSet<(String, PostId)>,
    wasted_slides: usize,
}

impl Reassembler {
    pub fn new() -> Self {
        Reassembler::default()
    }

    /// Scans `posts` against `candidate_epochs` (supplied in chronological
    /// order of `valid_from`; during a grace seam, include both the
    /// outgoing and incoming epoch so overlap posts are tried under each).
    #[allow(clippy::too_many_arguments)]
    pub fn scan(
        &mut self,
        posts: &[Post],
        candidate_epochs: &[CandidateEpoch],
        channel_key: &[u8; 32],
        beacon_kind: BeaconKind,
        selection_rate: f64,
        feature_set: &FeatureSet,
        length_threshold: u32,
        sequence: &mut SequenceState,
    ) -> Result<ScanOutcome, EngineFailure> {
        let mut sorted: Vec<&Post> = posts.iter().collect();
        sorted.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));

        let mut epoch_keys = Vec::with_capacity(candidate_epochs.len());
        for epoch in candidate_epochs {
            epoch_keys.push((epoch, derive_epoch_keys(channel_key, beacon_kind, &epoch.epoch_id)?));
        }

        for (epoch, keys) in &epoch_keys {
            for post in &sorted {
                if !epoch.covers(post.created_at) {
                    continue;
                }
                let seen_key = (epoch.epoch_id.clone(), post.id.clone());
                if self.seen.contains(&seen_key) {
                    continue;
                }
                self.seen.insert(seen_key);
                if !is_signal(&keys.selection_key, &post.id, selection_rate) {
                    continue;
                }
                let bits = extract_bits(&post.text, post.has_media, length_threshold, feature_set);
                self.pending.push_back(PendingChunk { post_id: post.id.clone(), bits });
            }
        }

        let mut outcome = ScanOutcome::default();

        loop {
            let total_bits: usize = self.pending.iter().map(|c| c.bits.len()).sum();
            if total_bits < MIN_FRAME_BITS {
                break;
            }

            let buffer = self.flatten();
            let mut decoded = None;
            for (_epoch, keys) in &epoch_keys {
                if let Ok(msg) = decode_frame(&buffer, &keys.frame_key, Some(&keys.payload_key)) {
                    decoded = Some(msg);
                    break;
                }
            }

            match decoded {
                Some(msg) => {
                    info!(seq = msg.seq, ec_corrections = msg.ec_corrections, "frame decoded");
                    self.wasted_slides = 0;
                    let contributing_posts = self.consume_bits(msg.contributing_bit_count);
                    let accepted = !is_replay(msg.seq, sequence.next_recv_seq);
                    if accepted {
                        sequence.next_recv_seq = msg.seq.wrapping_add(1);
                    } else {
                        warn!(seq = msg.seq, next_recv_seq = sequence.next_recv_seq, "rejecting replayed frame");
                    }
                    outcome.messages.push(ReceivedMessage {
                        seq: msg.seq,
                        payload: msg.payload,
                        ec_corrections: msg.ec_corrections,
                        contributing_posts,
                        accepted,
                    });
                }
                None => {
                    if self.pending.is_empty() {
                        break;
                    }
                    tracing::debug!(wasted_slides = self.wasted_slides, "decode attempt failed, sliding window");
                    self.pending.pop_front();
                    self.wasted_slides += 1;
                    if self.wasted_slides > MAX_WASTED_SLIDES {
                        self.drop_oldest_bit();
                        self.wasted_slides = 0;
                        warn!("giving up on this window after a noise burst, dropping oldest bit");
                        outcome.diagnostics.push(Diagnostic::NoiseBurst { dropped_bits: 1 });
                    }
                }
            }
        }

        Ok(outcome)
    }

    fn flatten(&self) -> BitBuffer {
        let mut buffer = BitBuffer::new();
        for chunk in &self.pending {
            for &bit in &chunk.bits {
                buffer.push_bit(bit);
            }
        }
        buffer
    }

    /// Removes the first `n_bits` from the pending queue, splitting the
    /// last chunk consumed if the boundary falls inside it, and returns
    /// the (deduplicated, order-preserving) list of posts that contributed.
    fn consume_bits(&mut self, n_bits: usize) -> Vec<PostId> {
        let mut remaining = n_bits;
        let mut contributors = Vec::new();
        while remaining > 0 {
            let front = self.pending.front_mut().expect("enough bits were available to decode");
            if front.bits.len() <= remaining {
                remaining -= front.bits.len();
                contributors.push(front.post_id.clone());
                self.pending.pop_front();
            } else {
                front.bits.drain(0..remaining);
                contributors.push(front.post_id.clone());
                remaining = 0;
            }
        }
        contributors
    }

    fn drop_oldest_bit(&mut self) {
        if let Some(front) = self.pending.front_mut() {
            if !front.bits.is_empty() {
                front.bits.remove(0);
            }
            if front.bits.is_empty() {
                self.pending.pop_front();
            }
        }
    }
}
