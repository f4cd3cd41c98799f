use itertools::Itertools;
use log::debug;

use crate::bits::{
    add_mod, bits_le_to_u32, ch_bits, maj_bits, sigma_l_generic, sigma_s_generic, u32_to_bits_le,
    Bits32,
};
use crate::codec::BLOCK_WORDS;
use crate::compression::{
    ch, maj, sigma_l0, sigma_l1, INIT_STATE, NUM_ROUND, NUM_STATE_WORD, ROUND_CONSTANTS,
};
use crate::error::{Error, Result};
use crate::schedule::{self, NUM_SCHEDULE_WORD};
use crate::Digest;

/// One compression round: the schedule word consumed, both temporaries, and
/// the full register file after the shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRow {
    pub w: u32,
    pub t1: u32,
    pub t2: u32,
    pub state: [u32; NUM_STATE_WORD],
}

/// Every intermediate value of one block's compression. Schedule words are
/// owned here and nowhere else; there is no cross-block lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockWitness {
    pub words: [u32; BLOCK_WORDS],
    pub schedule: [u32; NUM_SCHEDULE_WORD],
    pub rounds: Vec<RoundRow>,
    pub state_in: [u32; NUM_STATE_WORD],
    pub state_out: [u32; NUM_STATE_WORD],
}

/// Complete witness for one message: per-block traces plus the final digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness {
    pub blocks: Vec<BlockWitness>,
    pub digest: Digest,
}

/// Records the full trace of the transform over the given blocks. This is the
/// prover fast path; [`check_constraints`] never reuses it.
pub(crate) fn generate(blocks: &[[u32; BLOCK_WORDS]]) -> Witness {
    let mut state = INIT_STATE;
    let mut block_witnesses = Vec::with_capacity(blocks.len());
    for block in blocks.iter() {
        let w = schedule::expand(block);
        let state_in = state;
        let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = state_in;
        let mut rounds = Vec::with_capacity(NUM_ROUND);
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
            rounds.push(RoundRow {
                w: w[idx],
                t1,
                t2,
                state: [a, b, c, d, e, f, g, h],
            });
        }
        let mut state_out = [0u32; NUM_STATE_WORD];
        for (idx, (new, pre)) in [a, b, c, d, e, f, g, h].iter().zip(state_in.iter()).enumerate() {
            state_out[idx] = new.wrapping_add(*pre);
        }
        state = state_out;
        block_witnesses.push(BlockWitness {
            words: *block,
            schedule: w,
            rounds,
            state_in,
            state_out,
        });
    }
    debug!("witness recorded over {} block(s)", blocks.len());
    Witness {
        blocks: block_witnesses,
        digest: Digest(state),
    }
}

/// Verifies every defining equation of the witness, independently of how it
/// was derived: schedule copy and extension, per-round temporaries and
/// register shifts, modular-addition carries, state chaining, feed-forward,
/// and the final digest. All bitwise primitives are re-derived from the
/// operands' bit decompositions; the first failing equation is surfaced.
pub fn check_constraints(witness: &Witness) -> Result<()> {
    if witness.blocks.is_empty() {
        return Err(Error::ConstraintViolation {
            block: 0,
            constraint: "witness contains no blocks".to_string(),
        });
    }

    let mut chained = INIT_STATE;
    for (block_idx, block) in witness.blocks.iter().enumerate() {
        if block.state_in != chained {
            return Err(Error::ConstraintViolation {
                block: block_idx,
                constraint: "state_in does not chain from the previous block".to_string(),
            });
        }
        check_block(block_idx, block)?;
        chained = block.state_out;
    }

    if witness.digest.0 != chained {
        return Err(Error::ConstraintViolation {
            block: witness.blocks.len() - 1,
            constraint: "digest does not equal the final state".to_string(),
        });
    }
    Ok(())
}

fn check_block(block_idx: usize, block: &BlockWitness) -> Result<()> {
    if block.rounds.len() != NUM_ROUND {
        return Err(Error::ConstraintViolation {
            block: block_idx,
            constraint: format!("expected {} rounds, got {}", NUM_ROUND, block.rounds.len()),
        });
    }

    // schedule: copy then extension
    for idx in 0..BLOCK_WORDS {
        check_word(block_idx, "w", idx, block.schedule[idx], block.words[idx])?;
    }
    for idx in BLOCK_WORDS..NUM_SCHEDULE_WORD {
        let term1 = sigma_word(block.schedule[idx - 2], SigmaKind::Small1);
        let term3 = sigma_word(block.schedule[idx - 15], SigmaKind::Small0);
        let expected = add_words(&[
            term1,
            block.schedule[idx - 7],
            term3,
            block.schedule[idx - 16],
        ]);
        check_word(block_idx, "w", idx, block.schedule[idx], expected)?;
    }

    // rounds
    let mut regs = block.state_in;
    for (idx, row) in block.rounds.iter().enumerate() {
        let [a, b, c, d, e, f, g, h] = regs;
        check_word(block_idx, "round w", idx, row.w, block.schedule[idx])?;

        let t1 = add_words(&[
            h,
            sigma_word(e, SigmaKind::Large1),
            ch_word(e, f, g),
            ROUND_CONSTANTS[idx],
            row.w,
        ]);
        check_word(block_idx, "t1", idx, row.t1, t1)?;
        let t2 = add_words(&[sigma_word(a, SigmaKind::Large0), maj_word(a, b, c)]);
        check_word(block_idx, "t2", idx, row.t2, t2)?;

        let expected = [
            add_words(&[row.t1, row.t2]),
            a,
            b,
            c,
            add_words(&[d, row.t1]),
            e,
            f,
            g,
        ];
        for (reg_idx, (&got, &want)) in row.state.iter().zip(expected.iter()).enumerate() {
            if got != want {
                return Err(Error::ConstraintViolation {
                    block: block_idx,
                    constraint: format!(
                        "round {} register {}: got {:#010x}, expected {:#010x}",
                        idx, REGISTER_NAMES[reg_idx], got, want
                    ),
                });
            }
        }
        regs = row.state;
    }

    // feed-forward
    for idx in 0..NUM_STATE_WORD {
        let expected = add_words(&[regs[idx], block.state_in[idx]]);
        check_word(block_idx, "state_out", idx, block.state_out[idx], expected)?;
    }
    Ok(())
}

const REGISTER_NAMES: [&str; NUM_STATE_WORD] = ["a", "b", "c", "d", "e", "f", "g", "h"];

enum SigmaKind {
    Small0,
    Small1,
    Large0,
    Large1,
}

fn sigma_word(x: u32, kind: SigmaKind) -> u32 {
    let bits = u32_to_bits_le(x);
    let out = match kind {
        SigmaKind::Small0 => sigma_s_generic(&bits, 7, 18, 3),
        SigmaKind::Small1 => sigma_s_generic(&bits, 17, 19, 10),
        SigmaKind::Large0 => sigma_l_generic(&bits, 2, 13, 22),
        SigmaKind::Large1 => sigma_l_generic(&bits, 6, 11, 25),
    };
    bits_le_to_u32(&out)
}

fn ch_word(x: u32, y: u32, z: u32) -> u32 {
    bits_le_to_u32(&ch_bits(
        &u32_to_bits_le(x),
        &u32_to_bits_le(y),
        &u32_to_bits_le(z),
    ))
}

fn maj_word(x: u32, y: u32, z: u32) -> u32 {
    bits_le_to_u32(&maj_bits(
        &u32_to_bits_le(x),
        &u32_to_bits_le(y),
        &u32_to_bits_le(z),
    ))
}

fn add_words(terms: &[u32]) -> u32 {
    let bits: Vec<Bits32> = terms.iter().map(|&term| u32_to_bits_le(term)).collect_vec();
    bits_le_to_u32(&add_mod(&bits))
}

fn check_word(block: usize, name: &str, idx: usize, got: u32, expected: u32) -> Result<()> {
    if got != expected {
        return Err(Error::ConstraintViolation {
            block,
            constraint: format!(
                "{}[{}]: got {:#010x}, expected {:#010x}",
                name, idx, got, expected
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Sha256;
    use rand::{thread_rng, Rng};

    fn two_block_witness() -> Witness {
        // 72 bytes pad out to two blocks.
        let input = b"abc".repeat(24);
        Sha256::new().witness(&input).unwrap()
    }

    #[test]
    fn test_valid_witness_passes() {
        let witness = two_block_witness();
        assert_eq!(witness.blocks.len(), 2);
        check_constraints(&witness).unwrap();
    }

    #[test]
    fn test_schedule_flip_detected() {
        let mut witness = two_block_witness();
        witness.blocks[1].schedule[20] ^= 1 << 7;
        assert!(matches!(
            check_constraints(&witness),
            Err(Error::ConstraintViolation { block: 1, .. })
        ));
    }

    #[test]
    fn test_temporary_flip_detected() {
        let mut witness = two_block_witness();
        witness.blocks[0].rounds[3].t1 ^= 1;
        assert!(check_constraints(&witness).is_err());

        let mut witness = two_block_witness();
        witness.blocks[0].rounds[63].t2 ^= 1 << 31;
        assert!(check_constraints(&witness).is_err());
    }

    #[test]
    fn test_register_flip_detected() {
        let mut witness = two_block_witness();
        witness.blocks[0].rounds[10].state[4] ^= 1 << 12;
        assert!(check_constraints(&witness).is_err());
    }

    #[test]
    fn test_chaining_flip_detected() {
        let mut witness = two_block_witness();
        witness.blocks[1].state_in[0] ^= 1;
        assert!(check_constraints(&witness).is_err());

        let mut witness = two_block_witness();
        witness.blocks[0].state_out[7] ^= 1;
        assert!(check_constraints(&witness).is_err());
    }

    #[test]
    fn test_digest_flip_detected() {
        let mut witness = two_block_witness();
        witness.digest.0[2] ^= 1 << 16;
        assert!(matches!(
            check_constraints(&witness),
            Err(Error::ConstraintViolation { block: 1, .. })
        ));
    }

    #[test]
    fn test_any_single_bit_flip_detected() {
        let mut rng = thread_rng();
        for _ in 0..200 {
            let mut witness = two_block_witness();
            let block_idx = rng.gen_range(0..witness.blocks.len());
            let bit = 1u32 << rng.gen_range(0..32);
            let block = &mut witness.blocks[block_idx];
            match rng.gen_range(0..7) {
                0 => block.words[rng.gen_range(0..BLOCK_WORDS)] ^= bit,
                1 => block.schedule[rng.gen_range(0..NUM_SCHEDULE_WORD)] ^= bit,
                2 => block.rounds[rng.gen_range(0..NUM_ROUND)].w ^= bit,
                3 => block.rounds[rng.gen_range(0..NUM_ROUND)].t1 ^= bit,
                4 => block.rounds[rng.gen_range(0..NUM_ROUND)].t2 ^= bit,
                5 => {
                    block.rounds[rng.gen_range(0..NUM_ROUND)].state
                        [rng.gen_range(0..NUM_STATE_WORD)] ^= bit
                }
                _ => block.state_out[rng.gen_range(0..NUM_STATE_WORD)] ^= bit,
            }
            assert!(check_constraints(&witness).is_err());
        }
    }

    #[test]
    fn test_empty_witness_rejected() {
        let witness = Witness {
            blocks: vec![],
            digest: Digest(INIT_STATE),
        };
        assert!(check_constraints(&witness).is_err());
    }
}
