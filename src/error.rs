#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("bit sequence length {got} does not match expected length {expected}")]
    LengthMismatch { got: usize, expected: usize },
    #[error("malformed block: expected 16 words, got {0}")]
    MalformedBlock(usize),
    #[error("constraint violation in block {block}: {constraint}")]
    ConstraintViolation { block: usize, constraint: String },
}

pub type Result<T> = core::result::Result<T, Error>;
