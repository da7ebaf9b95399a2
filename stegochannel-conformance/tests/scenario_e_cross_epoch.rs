//! Scenario E — cross-epoch: a grace seam lets an in-flight transmission
//! finish under its starting epoch even after the beacon has rolled over;
//! once the seam is fully past, the sender abandons and restarts under the
//! new epoch instead.

use std::time::{Duration, SystemTime};

use stegochannel::{BeaconKind, BeaconValue, ChannelHandle};
use stegochannel_protocol::{FeatureId, FeatureSet};

fn epoch(id: &str, valid_from: SystemTime, expires_at: SystemTime, grace_period_seconds: u64) -> BeaconValue {
    BeaconValue { kind: BeaconKind::Date, epoch_id: id.to_string(), value_bytes: vec![0], valid_from, expires_at, grace_period_seconds, stale: false }
}

fn feature_set() -> FeatureSet {
    FeatureSet::new(vec![FeatureId::Len, FeatureId::Qmark]).unwrap()
}

#[test]
fn grace_seam_lets_the_in_flight_frame_finish_under_its_starting_epoch() {
    let midnight = SystemTime::now();
    let e1 = epoch("2026-02-07", midnight - Duration::from_secs(86_400), midnight, 300);

    let handle = ChannelHandle::create([1u8; 32], BeaconKind::Date, 1.0, feature_set(), 50, "peer".into()).unwrap();
    handle.begin_send(b"cross-epoch", false, &e1, None).unwrap();

    // Half the bits land before midnight.
    handle.consider_candidate(&e1, "p1", "a".repeat(60).as_str(), false, midnight - Duration::from_secs(60)).unwrap();
    handle.confirm_published().unwrap();
    let mid_progress = handle.send_progress(midnight - Duration::from_secs(60)).unwrap();
    assert!(mid_progress.bits_sent > 0);
    assert_eq!(mid_progress.epoch_id, "2026-02-07");

    // The beacon has rolled over to 02-08, but we're still inside the
    // 300-second grace window, so the transmission keeps using 02-07's keys.
    let just_after_midnight = midnight + Duration::from_secs(30);
    let e2_live = epoch("2026-02-08", midnight, midnight + Duration::from_secs(86_400), 300);
    let decision =
        handle.consider_candidate(&e2_live, "p2", "a".repeat(60).as_str(), false, just_after_midnight).unwrap();
    assert_ne!(decision, stegochannel::CandidateDecision::Cover);
    let progress = handle.send_progress(just_after_midnight).unwrap();
    assert_eq!(progress.epoch_id, "2026-02-07", "grace should keep the transmission on its starting epoch");
    assert!(progress.grace_active);
}

#[test]
fn once_grace_fully_elapses_the_sender_abandons_and_restarts_under_the_new_epoch() {
    let midnight = SystemTime::now();
    let e1 = epoch("2026-02-07", midnight - Duration::from_secs(86_400), midnight, 300);

    let handle = ChannelHandle::create([2u8; 32], BeaconKind::Date, 1.0, feature_set(), 50, "peer".into()).unwrap();
    handle.begin_send(b"cross-epoch", false, &e1, None).unwrap();
    handle.consider_candidate(&e1, "p1", "a".repeat(60).as_str(), false, midnight - Duration::from_secs(60)).unwrap();
    handle.confirm_published().unwrap();

    // 10 minutes after midnight: past the 300-second grace window.
    let far_past_seam = midnight + Duration::from_secs(600);
    let e2 = epoch("2026-02-08", midnight, midnight + Duration::from_secs(86_400), 300);
    handle.consider_candidate(&e2, "p2", "cover", false, far_past_seam).unwrap();

    let progress = handle.send_progress(far_past_seam).unwrap();
    assert_eq!(progress.epoch_id, "2026-02-08");
    assert_eq!(progress.bits_sent, 0, "abandoning restarts the frame from scratch under the new epoch");
}
