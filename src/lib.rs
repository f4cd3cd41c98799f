mod bits;
mod codec;
mod compression;
mod error;
mod padding;
mod schedule;
mod witness;

use std::convert::TryInto;

use log::debug;

pub use bits::BitwiseBackend;
pub use codec::{bits_to_words, bytes_to_bits, words_to_bits, BLOCK_BITS, BLOCK_WORDS, WORD_BITS};
pub use compression::{
    compress, CompressionBackend, NativeBackend, INIT_STATE, NUM_ROUND, NUM_STATE_WORD,
    ROUND_CONSTANTS,
};
pub use error::{Error, Result};
pub use padding::{pad, padded_bit_len};
pub use schedule::{expand, NUM_SCHEDULE_WORD};
pub use witness::{check_constraints, BlockWitness, RoundRow, Witness};

/// Eight-word SHA-256 digest. Immutable once produced; word 0 holds the
/// most significant 32 bits of the 256-bit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digest(pub [u32; NUM_STATE_WORD]);

impl Digest {
    pub fn words(&self) -> [u32; NUM_STATE_WORD] {
        self.0
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        for (chunk, word) in bytes.chunks_mut(4).zip(self.0.iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

/// SHA-256 evaluator over a pluggable compression backend. Pure and
/// deterministic: no shared mutable state, so independent messages can be
/// hashed in parallel with no coordination.
#[derive(Debug, Clone, Default)]
pub struct Sha256<B: CompressionBackend = NativeBackend> {
    backend: B,
}

impl Sha256<NativeBackend> {
    pub fn new() -> Self {
        Self {
            backend: NativeBackend,
        }
    }
}

impl<B: CompressionBackend> Sha256<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Digest of a raw byte message.
    pub fn digest(&self, input: &[u8]) -> Result<Digest> {
        self.digest_bits(&bytes_to_bits(input))
    }

    /// Digest of an unpadded bit-granular message: padding, then word
    /// packing, then chained compression.
    pub fn digest_bits(&self, bits: &[bool]) -> Result<Digest> {
        let padded = padding::pad(bits);
        let words = codec::bits_to_words(&padded, padded.len() / BLOCK_BITS)?;
        self.digest_blocks(&words)
    }

    /// Digest of pre-padded word-granular input; the caller guarantees the
    /// padding and the padding stage is bypassed entirely. The word count
    /// must be a non-zero multiple of 16.
    pub fn digest_blocks(&self, words: &[u32]) -> Result<Digest> {
        let blocks = to_blocks(words)?;
        let state = compression::fold_blocks(&self.backend, &blocks);
        let digest = Digest(state);
        debug!("digest over {} block(s): {}", blocks.len(), digest.to_hex());
        Ok(digest)
    }

    /// Full witness of a raw byte message. The trace is recorded on the
    /// native path; [`check_constraints`] re-derives it over bits.
    pub fn witness(&self, input: &[u8]) -> Result<Witness> {
        self.witness_bits(&bytes_to_bits(input))
    }

    pub fn witness_bits(&self, bits: &[bool]) -> Result<Witness> {
        let padded = padding::pad(bits);
        let words = codec::bits_to_words(&padded, padded.len() / BLOCK_BITS)?;
        self.witness_blocks(&words)
    }

    pub fn witness_blocks(&self, words: &[u32]) -> Result<Witness> {
        let blocks = to_blocks(words)?;
        Ok(witness::generate(&blocks))
    }
}

fn to_blocks(words: &[u32]) -> Result<Vec<[u32; BLOCK_WORDS]>> {
    if words.is_empty() || words.len() % BLOCK_WORDS != 0 {
        return Err(Error::LengthMismatch {
            got: words.len(),
            expected: (words.len() / BLOCK_WORDS + 1) * BLOCK_WORDS,
        });
    }
    Ok(words
        .chunks_exact(BLOCK_WORDS)
        .map(|chunk| chunk.try_into().unwrap())
        .collect())
}
