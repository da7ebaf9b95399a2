//! Self-delimited message frame: header, payload, optional encryption
//! nonce, Reed-Solomon parity, truncated HMAC tag. Fields are packed
//! MSB-first; see [`crate::bits::BitBuffer`].
//!
//! The header (which names the payload's length) and the payload are two
//! independently RS-protected blocks, each with its own parity. This
//! isn't just belt-and-suspenders: the payload block's length and the
//! presence of a nonce both depend on the header's `payload_len`/`flags`
//! fields, so those fields must come out of a block that's already been
//! error-corrected on its own, never straight off the possibly-corrupted
//! wire bits — otherwise a flipped bit in the header silently mis-sizes
//! the payload slice before RS ever gets a chance to run on it.

use stegochannel_crypto::{
    hmac_sha256_trunc64, hmac_sha256_trunc64_verify, xchacha20poly1305_open,
    xchacha20poly1305_seal, NONCE_LEN,
};
use stegochannel_fec::{self, EC_BYTES};

use crate::bits::BitBuffer;
use crate::error::ProtocolFailure;

const CURRENT_VERSION: u64 = 0;
const FLAG_ENCRYPTED: u8 = 0b0001;
const HEADER_BITS: usize = 4 + 4 + 32 + 8;
const HEADER_PARITY_BITS: usize = EC_BYTES * 8;
const HEADER_BLOCK_BITS: usize = HEADER_BITS + HEADER_PARITY_BITS;
const HMAC_BITS: usize = 8 * 8;
const MAX_PAYLOAD_LEN: usize = 236;

/// What the caller wants sent in one frame.
pub struct FrameInput<'a> {
    pub seq: u32,
    pub payload: &'a [u8],
    pub encrypt: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMessage {
    pub seq: u32,
    pub payload: Vec<u8>,
    pub ec_corrections: usize,
    pub contributing_bit_count: usize,
}

/// Builds the bit sequence for one frame.
///
/// `nonce` is required (and used) iff `input.encrypt` is set; the caller
/// supplies it (typically from [`stegochannel_crypto::rand_bytes`]) so
/// this function stays free of direct RNG access.
pub fn encode_frame(
    input: &FrameInput,
    frame_key: &[u8; 32],
    payload_key: Option<&[u8; 32]>,
    nonce: Option<[u8; NONCE_LEN]>,
) -> Result<BitBuffer, ProtocolFailure> {
    if input.encrypt && (payload_key.is_none() || nonce.is_none()) {
        return Err(ProtocolFailure::bad_config(
            "encrypt requested without a payload_key/nonce",
        ));
    }

    let mut header_bits = BitBuffer::new();
    header_bits.push_bits_msb(CURRENT_VERSION, 4);
    let flags = if input.encrypt { FLAG_ENCRYPTED } else { 0 };
    header_bits.push_bits_msb(flags as u64, 4);
    header_bits.push_bits_msb(input.seq as u64, 32);

    // AAD is version+flags+seq only: payload_len isn't known until the
    // ciphertext (which determines it) has been produced.
    let aad = header_bits.read_bits_as_bytes(0, HEADER_BITS - 8);
    let payload_bytes: Vec<u8>;
    if input.encrypt {
        let sealed = xchacha20poly1305_seal(
            payload_key.expect("checked above"),
            nonce.as_ref().expect("checked above"),
            &aad,
            input.payload,
        )?;
        payload_bytes = sealed;
    } else {
        payload_bytes = input.payload.to_vec();
    }

    if payload_bytes.len() > MAX_PAYLOAD_LEN {
        return Err(ProtocolFailure::bad_config(format!(
            "payload of {} bytes exceeds the {MAX_PAYLOAD_LEN}-byte frame limit",
            payload_bytes.len()
        )));
    }
    header_bits.push_bits_msb(payload_bytes.len() as u64, 8);

    // Header block: the 6 header bytes get their own parity so
    // `payload_len`/`flags` can be trusted before the payload block's
    // size (which depends on them) is ever sliced off the wire.
    let header_bytes = header_bits.read_bits_as_bytes(0, header_bits.bit_len());
    let header_codeword = stegochannel_fec::encode(&header_bytes, EC_BYTES)?;
    let mut bits = BitBuffer::new();
    bits.push_bytes(&header_codeword);

    let mut payload_block = payload_bytes.clone();
    if let Some(n) = nonce {
        payload_block.extend_from_slice(&n);
    }
    if !payload_block.is_empty() {
        let payload_codeword = stegochannel_fec::encode(&payload_block, EC_BYTES)?;
        bits.push_bytes(&payload_codeword);
    }

    let signed_bytes = bits.read_bits_as_bytes(0, bits.bit_len());
    let tag = hmac_sha256_trunc64(frame_key, &signed_bytes)?;
    bits.push_bytes(&tag);

    Ok(bits)
}

/// Attempts to decode a frame starting at bit 0 of `bits`.
///
/// Returns [`ProtocolFailure::frame_incomplete`] if fewer bits are
/// available than the frame declares it needs — the caller should keep
/// accumulating and retry, not treat this as a parse failure.
pub fn decode_frame(
    bits: &BitBuffer,
    frame_key: &[u8; 32],
    payload_key: Option<&[u8; 32]>,
) -> Result<DecodedMessage, ProtocolFailure> {
    if bits.bit_len() < HEADER_BLOCK_BITS {
        return Err(ProtocolFailure::frame_incomplete("fewer than 112 header block bits available"));
    }

    // Correct the header block before trusting anything in it: `flags`
    // and `payload_len` decide the payload block's own size below, so
    // they must come off corrected bytes, never the raw wire bits.
    let mut header_codeword = bits.read_bits_as_bytes(0, HEADER_BLOCK_BITS);
    let header_corrections = stegochannel_fec::correct(&mut header_codeword, EC_BYTES)
        .map_err(|_| ProtocolFailure::rs_uncorrectable("header parity could not repair the frame"))?;

    let mut header_fields = BitBuffer::new();
    header_fields.push_bytes(&header_codeword[..HEADER_BITS / 8]);
    let version = header_fields.read_bits_msb(0, 4);
    let flags = header_fields.read_bits_msb(4, 4) as u8;
    if version != CURRENT_VERSION || flags & !FLAG_ENCRYPTED != 0 {
        return Err(ProtocolFailure::frame_auth_fail("unrecognized version or reserved flag bits"));
    }
    let encrypted = flags & FLAG_ENCRYPTED != 0;
    let seq = header_fields.read_bits_msb(8, 32) as u32;
    let payload_len = header_fields.read_bits_msb(40, 8) as usize;
    if payload_len > MAX_PAYLOAD_LEN {
        return Err(ProtocolFailure::frame_auth_fail("payload_len exceeds frame limit"));
    }

    let nonce_len = if encrypted { NONCE_LEN } else { 0 };
    let payload_block_data_len = payload_len + nonce_len;
    let payload_block_bits =
        if payload_block_data_len == 0 { 0 } else { (payload_block_data_len + EC_BYTES) * 8 };

    let total_bits = HEADER_BLOCK_BITS + payload_block_bits + HMAC_BITS;
    if bits.bit_len() < total_bits {
        return Err(ProtocolFailure::frame_incomplete(format!(
            "need {total_bits} bits, have {}",
            bits.bit_len()
        )));
    }

    let mut payload_codeword = bits.read_bits_as_bytes(HEADER_BLOCK_BITS, payload_block_bits);
    let payload_corrections = if payload_block_bits == 0 {
        0
    } else {
        stegochannel_fec::correct(&mut payload_codeword, EC_BYTES)
            .map_err(|_| ProtocolFailure::rs_uncorrectable("payload parity could not repair the frame"))?
    };

    let tag_bytes = bits.read_bits_as_bytes(HEADER_BLOCK_BITS + payload_block_bits, HMAC_BITS);
    let mut tag = [0u8; 8];
    tag.copy_from_slice(&tag_bytes);

    let mut signed_bytes = header_codeword.clone();
    signed_bytes.extend_from_slice(&payload_codeword);
    if hmac_sha256_trunc64_verify(frame_key, &signed_bytes, &tag).is_err() {
        return Err(ProtocolFailure::frame_auth_fail("hmac mismatch"));
    }

    let payload_wire = &payload_codeword[..payload_len];

    let payload = if encrypted {
        let nonce_bytes = &payload_codeword[payload_len..payload_len + NONCE_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(nonce_bytes);
        // AAD is version+flags+seq only (the 5 bytes known before the
        // ciphertext's own length is decided), matching `encode_frame`.
        let aad = &header_codeword[..(HEADER_BITS - 8) / 8];
        xchacha20poly1305_open(
            payload_key.ok_or_else(|| ProtocolFailure::bad_config("no payload_key for encrypted frame"))?,
            &nonce,
            aad,
            payload_wire,
        )
        .map_err(|_| ProtocolFailure::frame_auth_fail("payload decryption failed"))?
    } else {
        payload_wire.to_vec()
    };

    Ok(DecodedMessage {
        seq,
        payload,
        ec_corrections: header_corrections + payload_corrections,
        contributing_bit_count: total_bits,
    })
}

/// The minimum bit count any valid frame can have (empty payload, no
/// encryption): just the header block plus the HMAC tag, since an empty
/// payload carries no payload block at all.
pub const MIN_FRAME_BITS: usize = HEADER_BLOCK_BITS + HMAC_BITS;

/// `true` iff `seq` is at or below the channel's last-accepted sequence
/// number, i.e. this frame is a replay. `next_recv_seq == 0` means nothing
/// has been accepted yet, so nothing can be a replay.
pub fn is_replay(seq: u32, next_recv_seq: u32) -> bool {
    next_recv_seq != 0 && seq < next_recv_seq
}
