use itertools::Itertools;

use crate::error::{Error, Result};

pub const WORD_BITS: usize = 32;
pub const BLOCK_WORDS: usize = 16;
pub const BLOCK_BITS: usize = WORD_BITS * BLOCK_WORDS;

/// Packs a flat bit sequence into 32-bit words, most-significant bit first.
/// The sequence must cover exactly `block_count` 512-bit blocks.
pub fn bits_to_words(bits: &[bool], block_count: usize) -> Result<Vec<u32>> {
    let expected = block_count * BLOCK_BITS;
    if bits.len() != expected {
        return Err(Error::LengthMismatch {
            got: bits.len(),
            expected,
        });
    }
    Ok(bits
        .chunks(WORD_BITS)
        .map(|chunk| chunk.iter().fold(0u32, |word, &bit| (word << 1) | bit as u32))
        .collect_vec())
}

pub fn words_to_bits(words: &[u32]) -> Vec<bool> {
    words
        .iter()
        .flat_map(|word| (0..WORD_BITS).rev().map(move |idx| (word >> idx) & 1 == 1))
        .collect_vec()
}

pub fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|byte| (0..8).rev().map(move |idx| (byte >> idx) & 1 == 1))
        .collect_vec()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_word_packing_is_big_endian() {
        // "abc" + sentinel in the first word, per the recorded one-block fixture.
        let mut bits = bytes_to_bits(&[0x61, 0x62, 0x63, 0x80]);
        bits.resize(BLOCK_BITS, false);
        let words = bits_to_words(&bits, 1).unwrap();
        assert_eq!(words.len(), BLOCK_WORDS);
        assert_eq!(words[0], 0x61626380);
        assert_eq!(&words[1..], &[0u32; 15][..]);
    }

    #[test]
    fn test_roundtrip() {
        let words = (0..32u32).map(|idx| idx.wrapping_mul(0x9e3779b9)).collect_vec();
        let bits = words_to_bits(&words);
        assert_eq!(bits.len(), 2 * BLOCK_BITS);
        assert_eq!(bits_to_words(&bits, 2).unwrap(), words);
    }

    #[test]
    fn test_length_mismatch() {
        let bits = vec![false; BLOCK_BITS - 1];
        assert_eq!(
            bits_to_words(&bits, 1),
            Err(Error::LengthMismatch {
                got: BLOCK_BITS - 1,
                expected: BLOCK_BITS,
            })
        );
        let bits = vec![false; BLOCK_BITS];
        assert!(bits_to_words(&bits, 2).is_err());
    }

    #[test]
    fn test_bytes_to_bits_msb_first() {
        let bits = bytes_to_bits(&[0b0110_0001]);
        assert_eq!(
            bits,
            [false, true, true, false, false, false, false, true]
        );
    }
}
