use std::convert::TryInto;

use crate::codec::BLOCK_WORDS;
use crate::error::{Error, Result};
use crate::schedule;

pub const NUM_ROUND: usize = 64;
pub const NUM_STATE_WORD: usize = 8;

pub const ROUND_CONSTANTS: [u32; NUM_ROUND] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

pub const INIT_STATE: [u32; NUM_STATE_WORD] = [
    0x6a09_e667,
    0xbb67_ae85,
    0x3c6e_f372,
    0xa54f_f53a,
    0x510e_527f,
    0x9b05_688c,
    0x1f83_d9ab,
    0x5be0_cd19,
];

pub(crate) fn sigma_l0(x: u32) -> u32 {
    x.rotate_right(2) ^ x.rotate_right(13) ^ x.rotate_right(22)
}

pub(crate) fn sigma_l1(x: u32) -> u32 {
    x.rotate_right(6) ^ x.rotate_right(11) ^ x.rotate_right(25)
}

// reference: https://github.com/iden3/circomlib/blob/v0.2.4/circuits/sha256/ch.circom
pub(crate) fn ch(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (!x & z)
}

// reference: https://github.com/iden3/circomlib/blob/v0.2.4/circuits/sha256/maj.circom
pub(crate) fn maj(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (x & z) ^ (y & z)
}

/// One 512-bit block folded into the running state. Both backends implement
/// the identical transform contract and must agree on every input.
pub trait CompressionBackend {
    fn compress_block(
        &self,
        state: [u32; NUM_STATE_WORD],
        block: &[u32; BLOCK_WORDS],
    ) -> [u32; NUM_STATE_WORD];
}

/// Fast path: native u32 arithmetic with wraparound.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl CompressionBackend for NativeBackend {
    fn compress_block(
        &self,
        state: [u32; NUM_STATE_WORD],
        block: &[u32; BLOCK_WORDS],
    ) -> [u32; NUM_STATE_WORD] {
        let w = schedule::expand(block);
        let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = state;
        for idx in 0..NUM_ROUND {
            let t1 = h
                .wrapping_add(sigma_l1(e))
                .wrapping_add(ch(e, f, g))
                .wrapping_add(ROUND_CONSTANTS[idx])
                .wrapping_add(w[idx]);
            let t2 = sigma_l0(a).wrapping_add(maj(a, b, c));
            h = g;
            g = f;
            f = e;
            e = d.wrapping_add(t1);
            d = c;
            c = b;
            b = a;
            a = t1.wrapping_add(t2);
        }
        // block-chaining feed-forward
        let new_state = [a, b, c, d, e, f, g, h];
        let mut next_state = [0u32; NUM_STATE_WORD];
        for (idx, (new, pre)) in new_state.iter().zip(state.iter()).enumerate() {
            next_state[idx] = new.wrapping_add(*pre);
        }
        next_state
    }
}

/// Folds one block into the state, rejecting anything that is not exactly 16
/// words. The only failure path of the compression stage.
pub fn compress(state: [u32; NUM_STATE_WORD], block: &[u32]) -> Result<[u32; NUM_STATE_WORD]> {
    let block: &[u32; BLOCK_WORDS] = block
        .try_into()
        .map_err(|_| Error::MalformedBlock(block.len()))?;
    Ok(NativeBackend.compress_block(state, block))
}

/// Explicit fold over the ordered block sequence, threading state from
/// INIT_STATE. Blocks of one message are strictly sequential; independent
/// messages need no coordination.
pub(crate) fn fold_blocks<B: CompressionBackend>(
    backend: &B,
    blocks: &[[u32; BLOCK_WORDS]],
) -> [u32; NUM_STATE_WORD] {
    blocks
        .iter()
        .fold(INIT_STATE, |state, block| backend.compress_block(state, block))
}
