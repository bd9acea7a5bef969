//! Error types for the wire decoder.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input elements must fit in a byte. Anything above 255 is a usage
    /// error on the caller's side, not a MIDI-protocol error, and aborts
    /// the whole decode call.
    #[error("byte value {value} at index {index} is out of range (greater than 255)")]
    ByteOutOfRange { index: usize, value: u16 },
}

pub type Result<T> = std::result::Result<T, Error>;
