use crate::codec::BLOCK_BITS;

const LENGTH_FIELD_BITS: usize = 64;

/// Standard SHA-256 padding over a raw bit sequence: a single `1` bit, the
/// minimum zero fill to 448 (mod 512), then the original bit length as a
/// big-endian 64-bit integer. Must be applied exactly once per message;
/// pre-padded word input bypasses this module entirely.
pub fn pad(bits: &[bool]) -> Vec<bool> {
    let bit_len = bits.len();
    let mut padded = Vec::with_capacity(padded_bit_len(bit_len));
    padded.extend_from_slice(bits);
    padded.push(true);
    while padded.len() % BLOCK_BITS != BLOCK_BITS - LENGTH_FIELD_BITS {
        padded.push(false);
    }
    for idx in (0..LENGTH_FIELD_BITS).rev() {
        padded.push((bit_len as u64 >> idx) & 1 == 1);
    }
    padded
}

/// Total bit length after padding a `bit_len`-bit message.
pub fn padded_bit_len(bit_len: usize) -> usize {
    // sentinel + length field, rounded up to a whole block
    let unaligned = bit_len + 1 + LENGTH_FIELD_BITS;
    (unaligned + BLOCK_BITS - 1) / BLOCK_BITS * BLOCK_BITS
}
