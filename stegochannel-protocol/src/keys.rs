//! Derives the per-epoch subkey chain from a channel's long-term key and
//! the current beacon value.
//!
//! Each `info` string is bijective in its inputs (fixed prefix, then
//! beacon kind, then epoch id, each unambiguously delimited by `|`), so
//! two parties holding the same `channel_key` and observing the same
//! beacon value always derive identical subkeys.

use stegochannel_beacon::BeaconKind;
use stegochannel_crypto::{hkdf_sha256_32, CryptoFailure};

pub struct EpochKeys {
    pub epoch_key: [u8; 32],
    pub selection_key: [u8; 32],
    pub frame_key: [u8; 32],
    pub payload_key: [u8; 32],
}

pub fn derive_epoch_keys(
    channel_key: &[u8; 32],
    beacon_kind: BeaconKind,
    epoch_id: &str,
) -> Result<EpochKeys, CryptoFailure> {
    let info = format!("stegochannel-v0|{beacon_kind}|{epoch_id}");
    let epoch_key = hkdf_sha256_32(channel_key, b"", info.as_bytes())?;
    let selection_key = hkdf_sha256_32(&epoch_key, b"", b"select")?;
    let frame_key = hkdf_sha256_32(&epoch_key, b"", b"frame")?;
    let payload_key = hkdf_sha256_32(&epoch_key, b"", b"payload")?;
    Ok(EpochKeys { epoch_key, selection_key, frame_key, payload_key })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_yield_identical_subkeys() {
        let key = [7u8; 32];
        let a = derive_epoch_keys(&key, BeaconKind::Btc, "800000").unwrap();
        let b = derive_epoch_keys(&key, BeaconKind::Btc, "800000").unwrap();
        assert_eq!(a.epoch_key, b.epoch_key);
        assert_eq!(a.selection_key, b.selection_key);
        assert_eq!(a.frame_key, b.frame_key);
        assert_eq!(a.payload_key, b.payload_key);
    }

    #[test]
    fn different_beacon_kind_changes_epoch_key() {
        let key = [7u8; 32];
        let a = derive_epoch_keys(&key, BeaconKind::Btc, "800000").unwrap();
        let b = derive_epoch_keys(&key, BeaconKind::Nist, "800000").unwrap();
        assert_ne!(a.epoch_key, b.epoch_key);
    }

    #[test]
    fn subkeys_are_mutually_distinct() {
        let key = [7u8; 32];
        let k = derive_epoch_keys(&key, BeaconKind::Date, "2026-07-26").unwrap();
        assert_ne!(k.selection_key, k.frame_key);
        assert_ne!(k.frame_key, k.payload_key);
        assert_ne!(k.selection_key, k.payload_key);
    }
}
