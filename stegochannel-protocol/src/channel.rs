//! The channel record: the immutable fields two parties agree on out of
//! band, plus the portable export string that is the sole interchange
//! format for them.

use stegochannel_beacon::BeaconKind;
use stegochannel_crypto::{base64url_decode, base64url_encode, rand_bytes, Secret};

use crate::error::ProtocolFailure;
use crate::features::FeatureSet;

pub const EXPORT_PREFIX: &str = "stegochannel";
pub const EXPORT_VERSION: &str = "v0";

/// Canonical default length threshold (UTF-8 code points) for the `len`
/// feature, used when a caller doesn't have a reason to pick another.
pub const DEFAULT_LENGTH_THRESHOLD: u32 = 50;

/// A channel's identity, derived once at creation and stable for its
/// lifetime. Not part of the export string; it's local bookkeeping for a
/// [`stegochannel_engine`]-style channel store, generated independently by
/// each party importing the same export string.
pub type ChannelId = [u8; 16];

pub fn new_channel_id() -> Result<ChannelId, ProtocolFailure> {
    let bytes = rand_bytes(16)?;
    let mut id = [0u8; 16];
    id.copy_from_slice(&bytes);
    Ok(id)
}

/// Immutable after creation. Sequence counters live separately (see
/// `stegochannel-engine`'s `SequenceState`) so a `Channel` can be freely
/// cloned for read-only inspection without aliasing mutable state.
#[derive(Clone)]
pub struct Channel {
    channel_key: Secret<32>,
    pub beacon_kind: BeaconKind,
    pub selection_rate: f64,
    pub feature_set: FeatureSet,
    pub length_threshold: u32,
    pub peer_source: String,
}

impl Channel {
    pub fn new(
        channel_key: [u8; 32],
        beacon_kind: BeaconKind,
        selection_rate: f64,
        feature_set: FeatureSet,
        length_threshold: u32,
        peer_source: String,
    ) -> Result<Channel, ProtocolFailure> {
        if !(selection_rate > 0.0 && selection_rate <= 1.0) {
            return Err(ProtocolFailure::bad_config("selection_rate must be in (0, 1]"));
        }
        if length_threshold == 0 {
            return Err(ProtocolFailure::bad_config("length_threshold must be positive"));
        }
        Ok(Channel {
            channel_key: Secret::new(channel_key),
            beacon_kind,
            selection_rate,
            feature_set,
            length_threshold,
            peer_source,
        })
    }

    pub fn channel_key(&self) -> &[u8; 32] {
        self.channel_key.as_bytes()
    }

    /// Formats the rate with at most 4 fractional digits, trimming
    /// trailing zeros (and a bare trailing `.` if the result is an
    /// integer) so `1.0` round-trips as `1`, not `1.0000`.
    fn format_rate(rate: f64) -> String {
        let s = format!("{rate:.4}");
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        trimmed.to_string()
    }

    pub fn to_export_string(&self) -> String {
        format!(
            "{EXPORT_PREFIX}:{EXPORT_VERSION}:{}:{}:{}:{}",
            base64url_encode(self.channel_key.as_bytes()),
            self.beacon_kind,
            Self::format_rate(self.selection_rate),
            self.feature_set.to_csv(),
        )
    }

    pub fn from_export_string(s: &str, peer_source: String) -> Result<Channel, ProtocolFailure> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 6 {
            return Err(ProtocolFailure::invalid_channel_string(
                "expected 6 colon-separated fields",
            ));
        }
        let [prefix, version, key_b64, beacon_kind_str, rate_str, feature_csv] = match parts.as_slice() {
            [a, b, c, d, e, f] => [*a, *b, *c, *d, *e, *f],
            _ => unreachable!("length checked above"),
        };
        if prefix != EXPORT_PREFIX {
            return Err(ProtocolFailure::invalid_channel_string(format!(
                "unknown prefix '{prefix}'"
            )));
        }
        if version != EXPORT_VERSION {
            return Err(ProtocolFailure::invalid_channel_string(format!(
                "unsupported version '{version}'"
            )));
        }
        let key_bytes = base64url_decode(key_b64)
            .map_err(|_| ProtocolFailure::invalid_channel_string("channel key is not valid base64url"))?;
        if key_bytes.len() != 32 {
            return Err(ProtocolFailure::invalid_channel_string("channel key must be 32 bytes"));
        }
        let mut channel_key = [0u8; 32];
        channel_key.copy_from_slice(&key_bytes);

        let beacon_kind = BeaconKind::parse(beacon_kind_str)
            .ok_or_else(|| ProtocolFailure::invalid_channel_string(format!("unknown beacon kind '{beacon_kind_str}'")))?;

        let selection_rate: f64 = rate_str
            .parse()
            .map_err(|_| ProtocolFailure::invalid_channel_string(format!("invalid selection rate '{rate_str}'")))?;

        let feature_set = FeatureSet::parse_csv(feature_csv)
            .map_err(|e| ProtocolFailure::invalid_channel_string(e.to_string()))?;

        Channel::new(
            channel_key,
            beacon_kind,
            selection_rate,
            feature_set,
            DEFAULT_LENGTH_THRESHOLD,
            peer_source,
        )
    }
}
