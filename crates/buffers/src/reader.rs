//! Binary buffer reader with cursor tracking.

use std::str;

use crate::BufferError;

/// A bounds-checked reader over a byte slice.
///
/// The reader keeps a cursor and every read advances it. Reads past the end
/// of the slice return [`BufferError::EndOfBuffer`] and leave the cursor
/// where it was.
///
/// # Example
///
/// ```
/// use smile_buffers::Reader;
///
/// let data = [0x01, 0x02, 0x03];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.u8(), Ok(0x01));
/// assert_eq!(reader.buf(2), Ok(&[0x02, 0x03][..]));
/// assert!(reader.u8().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    uint8: &'a [u8],
    /// Current cursor position.
    x: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader for the given byte slice.
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.x
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.uint8.len() - self.x
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Whether the unread part of the buffer starts with `prefix`.
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.uint8[self.x..].starts_with(prefix)
    }

    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        if n > self.size() {
            Err(BufferError::EndOfBuffer {
                position: self.x,
                needed: n - self.size(),
            })
        } else {
            Ok(())
        }
    }

    /// Peeks at the current byte without advancing.
    #[inline]
    pub fn peek(&self) -> Result<u8, BufferError> {
        self.check(1)?;
        Ok(self.uint8[self.x])
    }

    /// Advances the cursor by `length` bytes.
    pub fn skip(&mut self, length: usize) -> Result<(), BufferError> {
        self.check(length)?;
        self.x += length;
        Ok(())
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        self.check(1)?;
        let val = self.uint8[self.x];
        self.x += 1;
        Ok(val)
    }

    /// Returns a subslice of the given size and advances the cursor.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let start = self.x;
        self.x += size;
        Ok(&self.uint8[start..self.x])
    }

    /// Reads a UTF-8 string of `size` bytes.
    pub fn utf8(&mut self, size: usize) -> Result<&'a str, BufferError> {
        self.check(size)?;
        let start = self.x;
        let s = str::from_utf8(&self.uint8[start..start + size])
            .map_err(|e| BufferError::InvalidUtf8(start + e.valid_up_to()))?;
        self.x += size;
        Ok(s)
    }

    /// Reads bytes up to `terminator`, consuming the terminator but not
    /// returning it.
    pub fn until(&mut self, terminator: u8) -> Result<&'a [u8], BufferError> {
        let start = self.x;
        let rest = &self.uint8[start..];
        let len = rest
            .iter()
            .position(|&b| b == terminator)
            .ok_or(BufferError::MissingTerminator {
                terminator,
                position: start,
            })?;
        self.x += len + 1;
        Ok(&rest[..len])
    }
}
