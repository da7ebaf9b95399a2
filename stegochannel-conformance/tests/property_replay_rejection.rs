//! Property 6: a second copy of an already-accepted frame is rejected.

use std::time::{Duration, SystemTime};

use stegochannel_beacon::BeaconKind;
use stegochannel_conformance::post_with_bits;
use stegochannel_engine::{CandidateEpoch, Reassembler, SequenceState};
use stegochannel_protocol::{derive_epoch_keys, encode_frame, FeatureId, FeatureSet, FrameInput};

#[test]
fn replaying_an_accepted_frame_is_rejected_without_advancing_sequence() {
    let now = SystemTime::now();
    let channel_key = [0x55u8; 32];
    let feature_set = FeatureSet::new(vec![FeatureId::Len, FeatureId::Qmark]).unwrap();
    let epoch = CandidateEpoch {
        epoch_id: "2026-02-07".into(),
        valid_from: now - Duration::from_secs(3600),
        expires_at: now + Duration::from_secs(3600),
        grace_period_seconds: 300,
    };
    let keys = derive_epoch_keys(&channel_key, BeaconKind::Date, &epoch.epoch_id).unwrap();
    let input = FrameInput { seq: 0, payload: b"first", encrypt: false };
    let bits = encode_frame(&input, &keys.frame_key, None, None).unwrap();

    let width = feature_set.len();
    let mut posts = Vec::new();
    let mut i = 0;
    let mut idx = 0;
    while i < bits.bit_len() {
        let chunk: Vec<bool> = (0..width).map(|o| bits.get_bit(i + o)).collect();
        posts.push(post_with_bits(
            &format!("post-{idx:04}"),
            &chunk,
            &feature_set,
            50,
            now + Duration::from_secs(idx as u64),
        ));
        i += width;
        idx += 1;
    }

    let mut reassembler = Reassembler::new();
    let mut sequence = SequenceState::new();
    let first = reassembler
        .scan(&posts, &[epoch.clone()], &channel_key, BeaconKind::Date, 1.0, &feature_set, 50, &mut sequence)
        .unwrap();
    assert_eq!(first.messages.len(), 1);
    assert!(first.messages[0].accepted);
    assert_eq!(sequence.next_recv_seq, 1);

    // Re-present the exact same bit-identical frame under a disjoint set of
    // post ids, as an attacker replaying captured posts would.
    let mut replay_posts = Vec::new();
    let mut i = 0;
    let mut idx = 1000;
    while i < bits.bit_len() {
        let chunk: Vec<bool> = (0..width).map(|o| bits.get_bit(i + o)).collect();
        replay_posts.push(post_with_bits(
            &format!("post-{idx:04}"),
            &chunk,
            &feature_set,
            50,
            now + Duration::from_secs(idx as u64),
        ));
        i += width;
        idx += 1;
    }
    let second = reassembler
        .scan(&replay_posts, &[epoch], &channel_key, BeaconKind::Date, 1.0, &feature_set, 50, &mut sequence)
        .unwrap();
    assert_eq!(second.messages.len(), 1);
    assert!(!second.messages[0].accepted);
    assert_eq!(sequence.next_recv_seq, 1, "a replay must not advance next_recv_seq");
}
