//! Scenario A — selection, from the end-to-end scenario table: a fixed
//! channel key, date beacon, and rate produce a deterministic subset of
//! `post-0001..post-0100` whose size falls in `[16, 34]`.
//!
//! The exact subset is keyed-HMAC output and not something to hand-compute
//! into a literal golden list; determinism and the stated size bound are
//! asserted directly instead, with property 1 (`property_selector.rs`)
//! covering the rate claim at larger scale.

use stegochannel_beacon::BeaconKind;
use stegochannel_protocol::{derive_epoch_keys, is_signal};

#[test]
fn selected_subset_size_is_within_the_scenarios_stated_bound_and_is_stable() {
    let channel_key = [0u8; 32];
    let keys = derive_epoch_keys(&channel_key, BeaconKind::Date, "2026-02-07").unwrap();

    let ids: Vec<String> = (1..=100).map(|n| format!("post-{n:04}")).collect();
    let subset: Vec<&String> =
        ids.iter().filter(|id| is_signal(&keys.selection_key, id, 0.25)).collect();

    assert!(
        (16..=34).contains(&subset.len()),
        "selected {} of 100 posts, expected between 16 and 34",
        subset.len()
    );

    let rerun: Vec<&String> =
        ids.iter().filter(|id| is_signal(&keys.selection_key, id, 0.25)).collect();
    assert_eq!(subset, rerun, "selection must be deterministic across runs");
}
