//! Bit-level rendition of every SHA-256 primitive. Words are little-endian
//! 32-bit boolean vectors; rotations and shifts are index maps over the
//! decomposition, additions go through an explicit ripple-carry adder. This
//! is the backend the constraint checker trusts: it shares no code with the
//! native u32 path.

use crate::codec::BLOCK_WORDS;
use crate::compression::{CompressionBackend, NUM_ROUND, NUM_STATE_WORD, ROUND_CONSTANTS};
use crate::schedule::NUM_SCHEDULE_WORD;

pub(crate) type Bits32 = [bool; 32];

pub(crate) fn u32_to_bits_le(x: u32) -> Bits32 {
    let mut bits = [false; 32];
    for (idx, bit) in bits.iter_mut().enumerate() {
        *bit = (x >> idx) & 1 == 1;
    }
    bits
}

pub(crate) fn bits_le_to_u32(bits: &Bits32) -> u32 {
    bits.iter()
        .enumerate()
        .fold(0u32, |acc, (idx, &bit)| acc | (bit as u32) << idx)
}

// reference: https://github.com/iden3/circomlib/blob/v0.2.4/circuits/sha256/rotate.circom
pub(crate) fn rotr(x: &Bits32, n: usize) -> Bits32 {
    let mut out = [false; 32];
    for (idx, bit) in out.iter_mut().enumerate() {
        *bit = x[(idx + n) % 32];
    }
    out
}

// reference: https://github.com/iden3/circomlib/blob/v0.2.4/circuits/sha256/shift.circom
pub(crate) fn shr(x: &Bits32, n: usize) -> Bits32 {
    let mut out = [false; 32];
    for (idx, bit) in out.iter_mut().enumerate() {
        *bit = if idx + n >= 32 { false } else { x[idx + n] };
    }
    out
}

pub(crate) fn xor3(a: &Bits32, b: &Bits32, c: &Bits32) -> Bits32 {
    let mut out = [false; 32];
    for (idx, bit) in out.iter_mut().enumerate() {
        *bit = a[idx] ^ b[idx] ^ c[idx];
    }
    out
}

pub(crate) fn ch_bits(x: &Bits32, y: &Bits32, z: &Bits32) -> Bits32 {
    let mut out = [false; 32];
    for (idx, bit) in out.iter_mut().enumerate() {
        *bit = (x[idx] & y[idx]) ^ (!x[idx] & z[idx]);
    }
    out
}

pub(crate) fn maj_bits(x: &Bits32, y: &Bits32, z: &Bits32) -> Bits32 {
    let mut out = [false; 32];
    for (idx, bit) in out.iter_mut().enumerate() {
        *bit = (x[idx] & y[idx]) ^ (x[idx] & z[idx]) ^ (y[idx] & z[idx]);
    }
    out
}

pub(crate) fn sigma_l_generic(x: &Bits32, n1: usize, n2: usize, n3: usize) -> Bits32 {
    xor3(&rotr(x, n1), &rotr(x, n2), &rotr(x, n3))
}

pub(crate) fn sigma_s_generic(x: &Bits32, n1: usize, n2: usize, n3: usize) -> Bits32 {
    xor3(&rotr(x, n1), &rotr(x, n2), &shr(x, n3))
}

/// Ripple-carry addition mod 2^32; the final carry out is discarded.
pub(crate) fn add2(x: &Bits32, y: &Bits32) -> Bits32 {
    let mut out = [false; 32];
    let mut carry = false;
    for idx in 0..32 {
        out[idx] = x[idx] ^ y[idx] ^ carry;
        carry = (x[idx] & y[idx]) | (carry & (x[idx] ^ y[idx]));
    }
    out
}

pub(crate) fn add_mod(terms: &[Bits32]) -> Bits32 {
    terms
        .iter()
        .skip(1)
        .fold(terms[0], |acc, term| add2(&acc, term))
}

/// The same transform contract as [`NativeBackend`], evaluated entirely over
/// bit decompositions.
///
/// [`NativeBackend`]: crate::compression::NativeBackend
#[derive(Debug, Clone, Copy, Default)]
pub struct BitwiseBackend;

impl CompressionBackend for BitwiseBackend {
    fn compress_block(
        &self,
        state: [u32; NUM_STATE_WORD],
        block: &[u32; BLOCK_WORDS],
    ) -> [u32; NUM_STATE_WORD] {
        // message schedule
        let mut w = Vec::with_capacity(NUM_SCHEDULE_WORD);
        for word in block.iter() {
            w.push(u32_to_bits_le(*word));
        }
        for idx in BLOCK_WORDS..NUM_SCHEDULE_WORD {
            let term1 = sigma_s_generic(&w[idx - 2], 17, 19, 10);
            let term3 = sigma_s_generic(&w[idx - 15], 7, 18, 3);
            w.push(add_mod(&[term1, w[idx - 7], term3, w[idx - 16]]));
        }

        let mut regs = [[false; 32]; NUM_STATE_WORD];
        for (reg, word) in regs.iter_mut().zip(state.iter()) {
            *reg = u32_to_bits_le(*word);
        }
        for idx in 0..NUM_ROUND {
            let [a, b, c, d, e, f, g, h] = regs;
            let k = u32_to_bits_le(ROUND_CONSTANTS[idx]);
            let t1 = add_mod(&[
                h,
                sigma_l_generic(&e, 6, 11, 25),
                ch_bits(&e, &f, &g),
                k,
                w[idx],
            ]);
            let t2 = add2(&sigma_l_generic(&a, 2, 13, 22), &maj_bits(&a, &b, &c));
            regs = [add2(&t1, &t2), a, b, c, add2(&d, &t1), e, f, g];
        }

        let mut next_state = [0u32; NUM_STATE_WORD];
        for (idx, (reg, pre)) in regs.iter().zip(state.iter()).enumerate() {
            next_state[idx] = bits_le_to_u32(&add2(reg, &u32_to_bits_le(*pre)));
        }
        next_state
    }
}
