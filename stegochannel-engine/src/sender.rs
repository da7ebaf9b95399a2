//! Bit planner: the sender-side state machine that turns one outgoing
//! message into a sequence of "publish this post as-is" / "edit this post
//! like so" instructions, one candidate post at a time.

use std::time::SystemTime;

use tracing::{debug, info};

use stegochannel_beacon::BeaconValue;
use stegochannel_crypto::NONCE_LEN;
use stegochannel_protocol::{
    encode_frame, extract_bits, is_signal, suggest_edits, BitBuffer, FeatureSet, FrameInput, Suggestion,
};

use crate::error::EngineFailure;
use crate::sequence::SequenceState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmissionStatus {
    Queued,
    Transmitting,
    Complete,
    Cancelled,
}

/// What the caller should do with one candidate outgoing post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateDecision {
    /// Not a signal post under the current epoch; publish freely, nothing
    /// about the transmission state changes.
    Cover,
    /// The post's current features already match the next bits in the
    /// frame; publish it as-is and then call [`Transmitter::confirm_published`].
    PublishAsIs,
    /// The post's features don't match; apply these edits (in order), then
    /// re-evaluate the edited draft before publishing.
    Suggest(Vec<Suggestion>),
}

/// `{bits_sent, bits_total, signal_posts_used, epoch_id, epoch_expires_at,
/// grace_active}` as exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub bits_sent: usize,
    pub bits_total: usize,
    pub signal_posts_used: usize,
    pub epoch_id: String,
    pub epoch_expires_at: SystemTime,
    pub grace_active: bool,
}

/// Persisted per outgoing message: `(frame_bits, bit_cursor,
/// epoch_id_at_start, per-post checkpoints)`. Transitions
/// (`Queued -> Transmitting -> {Complete, Cancelled}`, plus the transient
/// `EpochGrace` overlay) are the only place `bit_cursor` and the channel's
/// `next_send_seq` mutate.
#[derive(Debug, Clone)]
pub struct Transmitter {
    frame_bits: BitBuffer,
    bit_cursor: usize,
    seq: u32,
    epoch_id_at_start: String,
    epoch_expires_at_start: SystemTime,
    grace_period_seconds_at_start: u64,
    status: TransmissionStatus,
    signal_posts_used: usize,
}

impl Transmitter {
    /// Builds the frame bits for one outgoing message and snapshots the
    /// epoch the sender is starting in. `seq` should be the channel's
    /// `next_send_seq` at enqueue time; the caller does not advance it
    /// until [`Transmitter::confirm_published`] reports completion.
    pub fn enqueue(
        payload: &[u8],
        encrypt: bool,
        seq: u32,
        frame_key: &[u8; 32],
        payload_key: Option<&[u8; 32]>,
        nonce: Option<[u8; NONCE_LEN]>,
        epoch: &BeaconValue,
    ) -> Result<Transmitter, EngineFailure> {
        let input = FrameInput { seq, payload, encrypt };
        let frame_bits = encode_frame(&input, frame_key, payload_key, nonce)?;
        Ok(Transmitter {
            frame_bits,
            bit_cursor: 0,
            seq,
            epoch_id_at_start: epoch.epoch_id.clone(),
            epoch_expires_at_start: epoch.expires_at,
            grace_period_seconds_at_start: epoch.grace_period_seconds,
            status: TransmissionStatus::Queued,
            signal_posts_used: 0,
        })
    }

    pub fn status(&self) -> TransmissionStatus {
        self.status
    }

    fn usable_until_start(&self) -> SystemTime {
        self.epoch_expires_at_start + std::time::Duration::from_secs(self.grace_period_seconds_at_start)
    }

    /// Evaluates one candidate outgoing post `(text, has_media)` under the
    /// caller-supplied current epoch and keys. `candidate_post_id` is the
    /// id the sender must commit to before publishing.
    #[allow(clippy::too_many_arguments)]
    pub fn consider_candidate(
        &mut self,
        current_epoch: &BeaconValue,
        selection_key: &[u8; 32],
        selection_rate: f64,
        feature_set: &FeatureSet,
        length_threshold: u32,
        candidate_post_id: &str,
        text: &str,
        has_media: bool,
        now: SystemTime,
    ) -> CandidateDecision {
        if self.status == TransmissionStatus::Queued {
            // Either the first candidate ever, or we just abandoned a
            // stale epoch below; either way this candidate's epoch is the
            // new starting point.
            self.epoch_id_at_start = current_epoch.epoch_id.clone();
            self.epoch_expires_at_start = current_epoch.expires_at;
            self.grace_period_seconds_at_start = current_epoch.grace_period_seconds;
            self.status = TransmissionStatus::Transmitting;
        } else if current_epoch.epoch_id != self.epoch_id_at_start && now > self.usable_until_start() {
            // The epoch we started this frame in has rolled past its grace
            // window; abandon the in-flight bits and restart under the
            // epoch the caller is observing now.
            info!(
                from_epoch = %self.epoch_id_at_start,
                to_epoch = %current_epoch.epoch_id,
                bits_sent = self.bit_cursor,
                "epoch rolled over past grace, abandoning in-flight frame"
            );
            self.bit_cursor = 0;
            self.signal_posts_used = 0;
            self.epoch_id_at_start = current_epoch.epoch_id.clone();
            self.epoch_expires_at_start = current_epoch.expires_at;
            self.grace_period_seconds_at_start = current_epoch.grace_period_seconds;
        }

        if !is_signal(selection_key, candidate_post_id, selection_rate) {
            return CandidateDecision::Cover;
        }
        debug!(post_id = candidate_post_id, bit_cursor = self.bit_cursor, "candidate accepted as a signal post");

        let current_bits = extract_bits(text, has_media, length_threshold, feature_set);
        let width = feature_set.len();
        let target_bits: Vec<bool> =
            (0..width).map(|i| self.frame_bits.get_bit(self.bit_cursor + i)).collect();

        if current_bits == target_bits {
            CandidateDecision::PublishAsIs
        } else {
            CandidateDecision::Suggest(suggest_edits(&current_bits, &target_bits, feature_set))
        }
    }

    /// Call once the caller has actually published a post whose features
    /// matched the bits returned by [`CandidateDecision::PublishAsIs`].
    /// Advances `bit_cursor`; on completion, bumps `sequence.next_send_seq`
    /// and transitions to `Complete`. Returns `true` iff the transmission
    /// is now complete.
    pub fn confirm_published(&mut self, feature_width: usize, sequence: &mut SequenceState) -> bool {
        self.bit_cursor += feature_width;
        self.signal_posts_used += 1;
        if self.bit_cursor >= self.frame_bits.bit_len() {
            self.status = TransmissionStatus::Complete;
            sequence.next_send_seq = self.seq.wrapping_add(1);
            true
        } else {
            false
        }
    }

    /// Discards partial progress; `next_send_seq` is not advanced.
    pub fn cancel(&mut self) {
        self.status = TransmissionStatus::Cancelled;
    }

    pub fn progress(&self, now: SystemTime) -> Progress {
        let grace_active = self.status == TransmissionStatus::Transmitting
            && now > self.epoch_expires_at_start
            && now <= self.usable_until_start();
        Progress {
            bits_sent: self.bit_cursor,
            bits_total: self.frame_bits.bit_len(),
            signal_posts_used: self.signal_posts_used,
            epoch_id: self.epoch_id_at_start.clone(),
            epoch_expires_at: self.epoch_expires_at_start,
            grace_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use stegochannel_protocol::FeatureId;

    fn epoch(id: &str, now: SystemTime) -> BeaconValue {
        BeaconValue {
            kind: stegochannel_beacon::BeaconKind::Date,
            epoch_id: id.to_string(),
            value_bytes: vec![0],
            valid_from: now,
            expires_at: now + Duration::from_secs(86_400),
            grace_period_seconds: 300,
            stale: false,
        }
    }

    fn feature_set() -> FeatureSet {
        FeatureSet::new(vec![FeatureId::Len, FeatureId::Qmark]).unwrap()
    }

    #[test]
    fn cover_post_leaves_progress_unchanged() {
        let now = SystemTime::now();
        let mut tx = Transmitter::enqueue(b"hi", false, 0, &[1u8; 32], None, None, &epoch("e1", now)).unwrap();
        let selection_key = [9u8; 32];
        // rate 0.0 never signals.
        let decision = tx.consider_candidate(
            &epoch("e1", now),
            &selection_key,
            0.0,
            &feature_set(),
            50,
            "post-1",
            "whatever",
            false,
            now,
        );
        assert_eq!(decision, CandidateDecision::Cover);
        assert_eq!(tx.progress(now).bits_sent, 0);
    }

    #[test]
    fn publish_as_is_when_features_already_match_then_confirm_advances_cursor() {
        let now = SystemTime::now();
        let mut tx = Transmitter::enqueue(b"", false, 3, &[1u8; 32], None, None, &epoch("e1", now)).unwrap();
        let fs = feature_set();
        let selection_key = [9u8; 32];

        // Find a post id that signals at rate 1.0 trivially (always true).
        let bit0 = tx.frame_bits.get_bit(0);
        let bit1 = tx.frame_bits.get_bit(1);
        let text = match (bit0, bit1) {
            (false, false) => "short",
            (false, true) => "short?",
            (true, false) => &"a".repeat(60),
            (true, true) => &format!("{}?", "a".repeat(60)),
        }
        .to_string();

        let decision =
            tx.consider_candidate(&epoch("e1", now), &selection_key, 1.0, &fs, 50, "post-1", &text, false, now);
        assert_eq!(decision, CandidateDecision::PublishAsIs);

        let mut sequence = SequenceState::new();
        let done = tx.confirm_published(fs.len(), &mut sequence);
        assert_eq!(tx.progress(now).bits_sent, 2);
        assert!(!done, "a 176-bit frame can't complete after a single 2-bit post");
        assert_eq!(sequence.next_send_seq, 0);
    }

    #[test]
    fn stale_epoch_past_grace_abandons_and_restarts() {
        let start = SystemTime::now();
        let e1 = epoch("e1", start);
        let mut tx = Transmitter::enqueue(b"payload", false, 0, &[1u8; 32], None, None, &e1).unwrap();
        let mut sequence = SequenceState::new();
        tx.consider_candidate(&e1, &[0u8; 32], 1.0, &feature_set(), 50, "p1", "x", false, start);
        tx.confirm_published(feature_set().len(), &mut sequence);
        assert_eq!(tx.progress(start).bits_sent, 2);

        let far_future = e1.expires_at + Duration::from_secs(e1.grace_period_seconds + 10);
        let e2 = epoch("e2", far_future);
        tx.consider_candidate(&e2, &[0u8; 32], 0.0, &feature_set(), 50, "p2", "cover", false, far_future);
        let progress = tx.progress(far_future);
        assert_eq!(progress.bits_sent, 0);
        assert_eq!(progress.epoch_id, "e2");
    }

    #[test]
    fn cancel_does_not_advance_next_send_seq() {
        let now = SystemTime::now();
        let mut tx = Transmitter::enqueue(b"x", false, 5, &[1u8; 32], None, None, &epoch("e1", now)).unwrap();
        tx.cancel();
        assert_eq!(tx.status(), TransmissionStatus::Cancelled);
    }
}
