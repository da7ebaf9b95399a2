use std::collections::HashMap;
use std::time::SystemTime;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::BeaconFailure;
use crate::kind::BeaconKind;
use crate::source::BeaconSource;
use crate::value::BeaconValue;

/// Caches the most recently fetched value per [`BeaconKind`], serving a
/// stale-but-not-yet-grace-expired value when a fresh fetch fails.
///
/// Concurrent callers for the same kind coalesce onto one upstream fetch:
/// each kind has its own `tokio::sync::Mutex`, so a caller that arrives
/// while a fetch for that kind is already in flight simply waits for it
/// and then re-checks the (now freshly populated) cache before trying
/// another fetch of its own.
pub struct BeaconCache<S: BeaconSource> {
    source: S,
    state: Mutex<HashMap<BeaconKind, BeaconValue>>,
    fetch_locks: [tokio::sync::Mutex<()>; 3],
}

impl<S: BeaconSource> BeaconCache<S> {
    pub fn new(source: S) -> Self {
        BeaconCache {
            source,
            state: Mutex::new(HashMap::new()),
            fetch_locks: [
                tokio::sync::Mutex::new(()),
                tokio::sync::Mutex::new(()),
                tokio::sync::Mutex::new(()),
            ],
        }
    }

    /// Returns the currently valid value for `kind`, fetching or falling
    /// back to a stale cache entry as needed.
    pub async fn get(&self, kind: BeaconKind) -> Result<BeaconValue, BeaconFailure> {
        let _guard = self.fetch_locks[kind.index()].lock().await;
        let now = SystemTime::now();

        if let Some(cached) = self.cached_if_fresh(kind, now) {
            return Ok(cached);
        }

        match self.source.fetch(kind).await {
            Ok(raw) => {
                raw.validate()?;
                let value = BeaconValue::fresh(kind, raw);
                self.state.lock().insert(kind, value.clone());
                debug!(kind = %kind, epoch_id = %value.epoch_id, "beacon fetch succeeded");
                Ok(value)
            }
            Err(fetch_err) => self.fallback_to_stale(kind, now, fetch_err),
        }
    }

    fn cached_if_fresh(&self, kind: BeaconKind, now: SystemTime) -> Option<BeaconValue> {
        let state = self.state.lock();
        let cached = state.get(&kind)?;
        if now < cached.expires_at && !cached.stale {
            Some(cached.clone())
        } else {
            None
        }
    }

    fn fallback_to_stale(
        &self,
        kind: BeaconKind,
        now: SystemTime,
        fetch_err: BeaconFailure,
    ) -> Result<BeaconValue, BeaconFailure> {
        let state = self.state.lock();
        match state.get(&kind) {
            Some(cached) if now <= cached.usable_until() => {
                let stale = cached.marked_stale();
                warn!(kind = %kind, epoch_id = %stale.epoch_id, %fetch_err, "serving stale beacon value within grace");
                Ok(stale)
            }
            _ => Err(BeaconFailure::unavailable(format!(
                "fresh fetch failed and no cache within grace: {fetch_err}"
            ))),
        }
    }
}
