//! World-level errors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("unknown chunk handle: {handle}")]
    UnknownChunk { handle: u64 },
}
