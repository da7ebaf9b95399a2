//! Public channel API: one [`ChannelHandle`] per channel, guarding the
//! mutable `SequenceState` and in-flight transmission checkpoint behind a
//! single `parking_lot::Mutex` so `cancel_transmission` and friends are
//! all-or-nothing critical sections.

use std::time::SystemTime;

use parking_lot::Mutex;
use stegochannel_beacon::BeaconValue;
use stegochannel_crypto::NONCE_LEN;
use stegochannel_engine::{
    CandidateDecision, CandidateEpoch, ChannelStore, Post, Progress, Reassembler, ReceivedMessage,
    ScanOutcome, SequenceState, Transmitter, TransmissionStatus,
};
use stegochannel_protocol::{derive_epoch_keys, new_channel_id, Channel, ChannelId, FeatureSet, Suggestion};

use crate::error::Error;

struct Inner {
    channel: Channel,
    sequence: SequenceState,
    transmitter: Option<Transmitter>,
    reassembler: Reassembler,
}

/// One channel, with its immutable agreement fields, mutable sequence
/// counters, and whatever transmission/reassembly is in flight, all behind
/// one lock.
pub struct ChannelHandle {
    id: ChannelId,
    inner: Mutex<Inner>,
}

impl ChannelHandle {
    /// Creates a brand-new channel with a freshly generated id.
    pub fn create(
        channel_key: [u8; 32],
        beacon_kind: stegochannel_beacon::BeaconKind,
        selection_rate: f64,
        feature_set: FeatureSet,
        length_threshold: u32,
        peer_source: String,
    ) -> Result<ChannelHandle, Error> {
        let channel = Channel::new(channel_key, beacon_kind, selection_rate, feature_set, length_threshold, peer_source)?;
        let id = new_channel_id()?;
        Ok(ChannelHandle::from_parts(id, channel, SequenceState::new()))
    }

    /// Imports a channel from the export string a peer shared out of band.
    pub fn import(export_string: &str, peer_source: String) -> Result<ChannelHandle, Error> {
        let channel = Channel::from_export_string(export_string, peer_source)?;
        let id = new_channel_id()?;
        Ok(ChannelHandle::from_parts(id, channel, SequenceState::new()))
    }

    /// Rehydrates a channel previously checkpointed to a [`ChannelStore`].
    pub async fn load<S: ChannelStore>(store: &S, id: ChannelId) -> Result<Option<ChannelHandle>, Error> {
        let Some(record) = store.load(id).await? else {
            return Ok(None);
        };
        let sequence = record.sequence;
        let channel = record.to_channel()?;
        Ok(Some(ChannelHandle::from_parts(id, channel, sequence)))
    }

    fn from_parts(id: ChannelId, channel: Channel, sequence: SequenceState) -> ChannelHandle {
        ChannelHandle {
            id,
            inner: Mutex::new(Inner { channel, sequence, transmitter: None, reassembler: Reassembler::new() }),
        }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn export_string(&self) -> String {
        self.inner.lock().channel.to_export_string()
    }

    /// Checkpoints the channel's immutable fields and current sequence
    /// counters to `store`. Does not persist in-flight transmission state;
    /// a cancelled or abandoned transmission simply restarts on next
    /// `begin_send`.
    pub async fn persist<S: ChannelStore>(&self, store: &S) -> Result<(), Error> {
        let record = {
            let guard = self.inner.lock();
            stegochannel_engine::PersistedChannel::from_channel(&guard.channel, guard.sequence)
        };
        store.save(self.id, record).await?;
        Ok(())
    }

    pub async fn delete<S: ChannelStore>(&self, store: &S) -> Result<(), Error> {
        store.delete(self.id).await?;
        Ok(())
    }

    pub fn beacon_kind(&self) -> stegochannel_beacon::BeaconKind {
        self.inner.lock().channel.beacon_kind
    }

    pub fn selection_rate(&self) -> f64 {
        self.inner.lock().channel.selection_rate
    }

    pub fn feature_set(&self) -> FeatureSet {
        self.inner.lock().channel.feature_set.clone()
    }

    /// Starts a new outgoing transmission. Fails if one is already
    /// `Queued`/`Transmitting`; call [`ChannelHandle::cancel_transmission`]
    /// first if the previous message should be abandoned.
    pub fn begin_send(&self, payload: &[u8], encrypt: bool, epoch: &BeaconValue, nonce: Option<[u8; NONCE_LEN]>) -> Result<(), Error> {
        let mut guard = self.inner.lock();
        if let Some(existing) = &guard.transmitter {
            if matches!(existing.status(), TransmissionStatus::Queued | TransmissionStatus::Transmitting) {
                return Err(Error::TransmissionInProgress);
            }
        }
        let keys = derive_epoch_keys(guard.channel.channel_key(), guard.channel.beacon_kind, &epoch.epoch_id)?;
        let seq = guard.sequence.next_send_seq;
        let transmitter = Transmitter::enqueue(payload, encrypt, seq, &keys.frame_key, Some(&keys.payload_key), nonce, epoch)?;
        guard.transmitter = Some(transmitter);
        Ok(())
    }

    /// Evaluates one candidate outgoing post against the in-flight
    /// transmission. Returns [`Error::NoActiveTransmission`] if
    /// [`ChannelHandle::begin_send`] hasn't been called (or the previous
    /// message already completed/was cancelled).
    ///
    /// `current_epoch` is whatever the embedder's beacon source currently
    /// reports as valid; during a grace seam that can roll over to the next
    /// epoch before this transmission's own keys do. Selection keys are
    /// derived from the epoch the transmission actually started in — not
    /// blindly from `current_epoch` — unless that epoch has rolled fully
    /// past its grace window, in which case `Transmitter` itself abandons
    /// and restarts under `current_epoch` (see [`stegochannel_engine::Transmitter::consider_candidate`]).
    #[allow(clippy::too_many_arguments)]
    pub fn consider_candidate(
        &self,
        current_epoch: &BeaconValue,
        candidate_post_id: &str,
        text: &str,
        has_media: bool,
        now: SystemTime,
    ) -> Result<CandidateDecision, Error> {
        let mut guard = self.inner.lock();
        let length_threshold = guard.channel.length_threshold;
        let feature_set = guard.channel.feature_set.clone();
        let channel_key = *guard.channel.channel_key();
        let beacon_kind = guard.channel.beacon_kind;
        let selection_rate = guard.channel.selection_rate;
        let transmitter = guard.transmitter.as_mut().ok_or(Error::NoActiveTransmission)?;

        let effective_epoch_id = match transmitter.status() {
            TransmissionStatus::Queued => current_epoch.epoch_id.clone(),
            _ => {
                let progress = transmitter.progress(now);
                let past_grace = now > progress.epoch_expires_at && !progress.grace_active;
                if progress.epoch_id != current_epoch.epoch_id && past_grace {
                    current_epoch.epoch_id.clone()
                } else {
                    progress.epoch_id
                }
            }
        };
        let keys = derive_epoch_keys(&channel_key, beacon_kind, &effective_epoch_id)?;
        Ok(transmitter.consider_candidate(
            current_epoch,
            &keys.selection_key,
            selection_rate,
            &feature_set,
            length_threshold,
            candidate_post_id,
            text,
            has_media,
            now,
        ))
    }

    /// Call once the caller has actually published a post whose features
    /// matched the [`CandidateDecision::PublishAsIs`] bits. Returns `true`
    /// once the message is fully sent.
    pub fn confirm_published(&self) -> Result<bool, Error> {
        let mut guard = self.inner.lock();
        let width = guard.channel.feature_set.len();
        let Inner { sequence, transmitter, .. } = &mut *guard;
        let transmitter = transmitter.as_mut().ok_or(Error::NoActiveTransmission)?;
        Ok(transmitter.confirm_published(width, sequence))
    }

    /// All-or-nothing: clears the in-flight transmission without advancing
    /// `next_send_seq`.
    pub fn cancel_transmission(&self) -> Result<(), Error> {
        let mut guard = self.inner.lock();
        match guard.transmitter.as_mut() {
            Some(transmitter) => {
                transmitter.cancel();
                Ok(())
            }
            None => Err(Error::NoActiveTransmission),
        }
    }

    pub fn send_progress(&self, now: SystemTime) -> Result<Progress, Error> {
        let guard = self.inner.lock();
        let transmitter = guard.transmitter.as_ref().ok_or(Error::NoActiveTransmission)?;
        Ok(transmitter.progress(now))
    }

    /// Scans `posts` for signal bits and attempts to decode frames out of
    /// them, advancing `next_recv_seq` for every accepted message.
    pub fn receive(&self, posts: &[Post], candidate_epochs: &[CandidateEpoch]) -> Result<ScanOutcome, Error> {
        let mut guard = self.inner.lock();
        let channel_key = *guard.channel.channel_key();
        let beacon_kind = guard.channel.beacon_kind;
        let selection_rate = guard.channel.selection_rate;
        let feature_set = guard.channel.feature_set.clone();
        let length_threshold = guard.channel.length_threshold;
        let Inner { sequence, reassembler, .. } = &mut *guard;
        Ok(reassembler.scan(
            posts,
            candidate_epochs,
            &channel_key,
            beacon_kind,
            selection_rate,
            &feature_set,
            length_threshold,
            sequence,
        )?)
    }
}

/// Convenience re-export so callers building a UI don't need to depend on
/// `stegochannel-engine` directly for the decision/message types.
pub type SendDecision = CandidateDecision;
pub type SendSuggestion = Suggestion;
pub type ReceivedFrame = ReceivedMessage;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use stegochannel_protocol::FeatureId;

    fn feature_set() -> FeatureSet {
        FeatureSet::new(vec![FeatureId::Len, FeatureId::Qmark]).unwrap()
    }

    fn epoch(id: &str, now: SystemTime) -> BeaconValue {
        BeaconValue {
            kind: stegochannel_beacon::BeaconKind::Date,
            epoch_id: id.to_string(),
            value_bytes: vec![0],
            valid_from: now - Duration::from_secs(3600),
            expires_at: now + Duration::from_secs(3600),
            grace_period_seconds: 300,
            stale: false,
        }
    }

    #[test]
    fn begin_send_then_cancel_releases_the_slot_for_a_new_message() {
        let handle =
            ChannelHandle::create([7u8; 32], stegochannel_beacon::BeaconKind::Date, 1.0, feature_set(), 50, "peer".into())
                .unwrap();
        let now = SystemTime::now();
        handle.begin_send(b"hi", false, &epoch("e1", now), None).unwrap();
        assert!(matches!(handle.begin_send(b"again", false, &epoch("e1", now), None), Err(Error::TransmissionInProgress)));

        handle.cancel_transmission().unwrap();
        handle.begin_send(b"again", false, &epoch("e1", now), None).unwrap();
    }

    #[test]
    fn confirm_published_without_an_active_transmission_errors() {
        let handle =
            ChannelHandle::create([7u8; 32], stegochannel_beacon::BeaconKind::Date, 1.0, feature_set(), 50, "peer".into())
                .unwrap();
        assert!(matches!(handle.confirm_published(), Err(Error::NoActiveTransmission)));
    }

    #[test]
    fn export_then_import_preserves_beacon_kind_and_rate() {
        let handle =
            ChannelHandle::create([9u8; 32], stegochannel_beacon::BeaconKind::Btc, 0.5, feature_set(), 50, "peer".into())
                .unwrap();
        let exported = handle.export_string();
        let imported = ChannelHandle::import(&exported, "peer".into()).unwrap();
        assert_eq!(imported.beacon_kind(), handle.beacon_kind());
        assert_eq!(imported.selection_rate(), handle.selection_rate());
    }
}
