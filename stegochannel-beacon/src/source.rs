use crate::error::BeaconFailure;
use crate::kind::BeaconKind;
use crate::value::RawBeacon;

/// External collaborator seam: an embedder supplies the actual network or
/// clock lookups this trait abstracts over (a Bitcoin block explorer, the
/// NIST beacon HTTPS endpoint, the system clock for `date`).
///
/// Implementations should not cache — caching and stale-fallback are
/// [`crate::BeaconCache`]'s job, applied uniformly across kinds.
pub trait BeaconSource: Send + Sync {
    fn fetch(&self, kind: BeaconKind) -> impl std::future::Future<Output = Result<RawBeacon, BeaconFailure>> + Send;
}
