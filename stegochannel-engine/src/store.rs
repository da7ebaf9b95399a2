use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use stegochannel_beacon::BeaconKind;
use stegochannel_protocol::{Channel, ChannelId, FeatureSet};

use crate::error::EngineFailure;
use crate::sequence::SequenceState;

/// What gets persisted for one channel: the immutable fields a [`Channel`]
/// holds plus the mutable sequence counters, since `Channel` itself never
/// carries them (see [`crate::SequenceState`]). Local at-rest storage of
/// this record is an external concern; the channel key must never reach
/// shared storage unencrypted.
#[derive(Debug, Clone)]
pub struct PersistedChannel {
    pub channel_key: [u8; 32],
    pub beacon_kind: BeaconKind,
    pub selection_rate: f64,
    pub feature_set: FeatureSet,
    pub length_threshold: u32,
    pub peer_source: String,
    pub sequence: SequenceState,
}

impl PersistedChannel {
    pub fn from_channel(channel: &Channel, sequence: SequenceState) -> Self {
        PersistedChannel {
            channel_key: *channel.channel_key(),
            beacon_kind: channel.beacon_kind,
            selection_rate: channel.selection_rate,
            feature_set: channel.feature_set.clone(),
            length_threshold: channel.length_threshold,
            peer_source: channel.peer_source.clone(),
            sequence,
        }
    }

    pub fn to_channel(&self) -> Result<Channel, EngineFailure> {
        Channel::new(
            self.channel_key,
            self.beacon_kind,
            self.selection_rate,
            self.feature_set.clone(),
            self.length_threshold,
            self.peer_source.clone(),
        )
        .map_err(EngineFailure::from)
    }
}

/// Storage seam for [`PersistedChannel`] records, keyed by channel id. Not
/// specified beyond its field set; a real embedding backs this with
/// encrypted SQLite, a keychain, or similar. `stegochannel-engine` only
/// needs somewhere to checkpoint sender/receiver state between calls.
pub trait ChannelStore: Send + Sync {
    fn load(
        &self,
        id: ChannelId,
    ) -> impl std::future::Future<Output = Result<Option<PersistedChannel>, EngineFailure>> + Send;

    fn save(
        &self,
        id: ChannelId,
        record: PersistedChannel,
    ) -> impl std::future::Future<Output = Result<(), EngineFailure>> + Send;

    fn delete(&self, id: ChannelId) -> impl std::future::Future<Output = Result<(), EngineFailure>> + Send;
}

/// Reference `ChannelStore`, backed by a process-local map. Used in tests
/// and as the trait's worked example: one `Arc<Inner>` handle, cheaply
/// cloned.
#[derive(Clone, Default)]
pub struct MemoryChannelStore {
    inner: Arc<Mutex<HashMap<ChannelId, PersistedChannel>>>,
}

impl MemoryChannelStore {
    pub fn new() -> Self {
        MemoryChannelStore::default()
    }
}

impl ChannelStore for MemoryChannelStore {
    async fn load(&self, id: ChannelId) -> Result<Option<PersistedChannel>, EngineFailure> {
        Ok(self.inner.lock().get(&id).cloned())
    }

    async fn save(&self, id: ChannelId, record: PersistedChannel) -> Result<(), EngineFailure> {
        self.inner.lock().insert(id, record);
        Ok(())
    }

    async fn delete(&self, id: ChannelId) -> Result<(), EngineFailure> {
        self.inner.lock().remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stegochannel_protocol::{new_channel_id, FeatureId};

    fn sample_record() -> PersistedChannel {
        PersistedChannel {
            channel_key: [1u8; 32],
            beacon_kind: BeaconKind::Date,
            selection_rate: 0.25,
            feature_set: FeatureSet::new(vec![FeatureId::Len]).unwrap(),
            length_threshold: 50,
            peer_source: "peer".into(),
            sequence: SequenceState::new(),
        }
    }

    #[tokio::test]
    async fn save_then_load_roundtrips() {
        let store = MemoryChannelStore::new();
        let id = new_channel_id().unwrap();
        store.save(id, sample_record()).await.unwrap();
        let loaded = store.load(id).await.unwrap().unwrap();
        assert_eq!(loaded.channel_key, [1u8; 32]);
        assert_eq!(loaded.peer_source, "peer");
    }

    #[tokio::test]
    async fn load_of_unknown_id_is_none() {
        let store = MemoryChannelStore::new();
        let id = new_channel_id().unwrap();
        assert!(store.load(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let store = MemoryChannelStore::new();
        let id = new_channel_id().unwrap();
        store.save(id, sample_record()).await.unwrap();
        store.delete(id).await.unwrap();
        assert!(store.load(id).await.unwrap().is_none());
    }
}
