//! Deterministic, keyed Bernoulli test deciding whether a post carries
//! signal: every holder of `selection_key` computes the same answer for a
//! given `post_id`, and nobody else can predict it.

const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

pub fn is_signal(selection_key: &[u8; 32], post_id: &str, selection_rate: f64) -> bool {
    if selection_rate >= 1.0 {
        return true;
    }
    let mut msg = Vec::with_capacity(32 + post_id.len());
    msg.extend_from_slice(selection_key);
    msg.extend_from_slice(post_id.as_bytes());
    let digest = stegochannel_crypto::sha256(&msg);
    let leading = u64::from_be_bytes(digest[..8].try_into().expect("8 bytes"));
    (leading as f64) / TWO_POW_64 < selection_rate
}
