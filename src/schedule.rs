use crate::codec::BLOCK_WORDS;

pub const NUM_SCHEDULE_WORD: usize = 64;

// reference: https://github.com/iden3/circomlib/blob/v0.2.4/circuits/sha256/sigma.circom
pub(crate) fn sigma_s0(x: u32) -> u32 {
    x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

pub(crate) fn sigma_s1(x: u32) -> u32 {
    x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

/// Expands a 16-word block into the 64 schedule words feeding the compression
/// rounds. Words 0..16 are the block verbatim; the rest follow
/// `W[t] = sigma1(W[t-2]) + W[t-7] + sigma0(W[t-15]) + W[t-16]` (mod 2^32).
pub fn expand(block: &[u32; BLOCK_WORDS]) -> [u32; NUM_SCHEDULE_WORD] {
    let mut w = [0u32; NUM_SCHEDULE_WORD];
    w[..BLOCK_WORDS].copy_from_slice(block);
    for idx in BLOCK_WORDS..NUM_SCHEDULE_WORD {
        w[idx] = sigma_s1(w[idx - 2])
            .wrapping_add(w[idx - 7])
            .wrapping_add(sigma_s0(w[idx - 15]))
            .wrapping_add(w[idx - 16]);
    }
    w
}
