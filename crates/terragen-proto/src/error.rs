//! Wire-format errors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtoError {
    #[error("buffer too short: need {needed} bytes, have {have}")]
    BufferTooShort { needed: usize, have: usize },

    #[error("unexpected bits-per-block: expected {expected}, got {got}")]
    UnexpectedBitsPerBlock { expected: u8, got: u8 },

    #[error("unexpected palette marker: {0}")]
    UnexpectedPalette(u8),

    #[error("unexpected data-array length marker: 0x{0:04X}")]
    UnexpectedArrayLength(u16),
}
