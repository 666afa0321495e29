//! Byte buffers for the Smile codec.
//!
//! [`Writer`] appends to a growable buffer and hands the bytes back on
//! [`Writer::flush`]. [`Reader`] walks a borrowed slice and never reads past
//! its end: every read returns a [`BufferError`] instead of panicking.

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

use thiserror::Error;

/// Errors raised by [`Reader`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("unexpected end of buffer at byte {position} ({needed} more byte(s) needed)")]
    EndOfBuffer { position: usize, needed: usize },
    #[error("invalid UTF-8 sequence at byte {0}")]
    InvalidUtf8(usize),
    #[error("terminator 0x{terminator:02x} not found after byte {position}")]
    MissingTerminator { terminator: u8, position: usize },
}
