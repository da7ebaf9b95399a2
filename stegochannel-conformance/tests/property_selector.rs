//! Property 1: selector determinism and rate.

use stegochannel_protocol::is_signal;

#[test]
fn identical_inputs_always_agree() {
    let key = [0x42u8; 32];
    for id in ["post-0001", "post-9999", "a-very-long-post-identifier-indeed"] {
        assert_eq!(is_signal(&key, id, 0.37), is_signal(&key, id, 0.37));
    }
}

#[test]
fn rate_is_within_3_sigma_over_10000_ids() {
    let key = [0x07u8; 32];
    let rate = 0.25;
    let n = 10_000;
    let signals = (0..n).filter(|i| is_signal(&key, &format!("post-{i:04}"), rate)).count();

    let expected = rate * n as f64;
    let variance = n as f64 * rate * (1.0 - rate);
    let three_sigma = 3.0 * variance.sqrt();

    let observed = signals as f64;
    assert!(
        (observed - expected).abs() <= three_sigma,
        "observed {observed} signals, expected {expected} +/- {three_sigma}"
    );
}
