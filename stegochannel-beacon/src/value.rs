use std::time::SystemTime;

use crate::error::BeaconFailure;
use crate::kind::BeaconKind;

/// What a [`crate::BeaconSource`] hands back before grace-period bookkeeping
/// is applied.
#[derive(Debug, Clone)]
pub struct RawBeacon {
    pub epoch_id: String,
    pub value_bytes: Vec<u8>,
    pub valid_from: SystemTime,
    pub expires_at: SystemTime,
}

impl RawBeacon {
    pub(crate) fn validate(&self) -> Result<(), BeaconFailure> {
        if self.epoch_id.is_empty() {
            return Err(BeaconFailure::bad_source("empty epoch_id"));
        }
        if self.expires_at <= self.valid_from {
            return Err(BeaconFailure::bad_source("expires_at not after valid_from"));
        }
        Ok(())
    }
}

/// A beacon value ready for the key schedule, with its cache provenance.
///
/// Two values with the same `epoch_id` must carry identical `value_bytes`;
/// callers that persist beacon values across restarts should treat a
/// mismatch as data corruption, not as a new epoch.
#[derive(Debug, Clone)]
pub struct BeaconValue {
    pub kind: BeaconKind,
    pub epoch_id: String,
    pub value_bytes: Vec<u8>,
    pub valid_from: SystemTime,
    pub expires_at: SystemTime,
    pub grace_period_seconds: u64,
    /// `true` when this value was served from cache after a fresh-fetch
    /// failure, rather than from the most recent successful fetch.
    pub stale: bool,
}

impl BeaconValue {
    pub(crate) fn fresh(kind: BeaconKind, raw: RawBeacon) -> BeaconValue {
        BeaconValue {
            kind,
            epoch_id: raw.epoch_id,
            value_bytes: raw.value_bytes,
            valid_from: raw.valid_from,
            expires_at: raw.expires_at,
            grace_period_seconds: kind.default_grace_period_seconds(),
            stale: false,
        }
    }

    pub(crate) fn marked_stale(&self) -> BeaconValue {
        let mut v = self.clone();
        v.stale = true;
        v
    }

    pub(crate) fn usable_until(&self) -> SystemTime {
        self.expires_at + std::time::Duration::from_secs(self.grace_period_seconds)
    }
}
