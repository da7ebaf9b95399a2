//! Beacon provider: turns a public, unpredictable, time-indexed value
//! (a Bitcoin block hash, a NIST beacon pulse, the UTC date) into the
//! epoch anchor the key schedule rotates on.
//!
//! Caching and stale-fallback live here so every beacon kind gets the same
//! behavior under upstream outages; per-kind fetch logic is the
//! [`BeaconSource`] implementor's job.

mod cache;
mod error;
mod kind;
mod source;
mod value;

pub use cache::BeaconCache;
pub use error::BeaconFailure;
pub use kind::BeaconKind;
pub use source::BeaconSource;
pub use value::{BeaconValue, RawBeacon};
