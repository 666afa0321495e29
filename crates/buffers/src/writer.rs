//! Binary buffer writer with auto-growing capacity.

/// A binary buffer writer that grows automatically as needed.
///
/// # Example
///
/// ```
/// use smile_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(0x3a);
/// writer.u8u8(0x29, 0x0a);
/// let data = writer.flush();
/// assert_eq!(data, [0x3a, 0x29, 0x0a]);
/// ```
#[derive(Debug, Default)]
pub struct Writer {
    uint8: Vec<u8>,
}

impl Writer {
    /// Creates a new writer with the default initial capacity (1KB).
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Creates a new writer that can hold `capacity` bytes before growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            uint8: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written since the last flush.
    pub fn len(&self) -> usize {
        self.uint8.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uint8.is_empty()
    }

    /// View of the bytes written since the last flush.
    pub fn as_slice(&self) -> &[u8] {
        &self.uint8
    }

    /// Returns the written data and leaves the writer empty.
    pub fn flush(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.uint8)
    }

    /// Drops everything written since the last flush.
    pub fn reset(&mut self) {
        self.uint8.clear();
    }

    /// Writes an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.uint8.push(val);
    }

    /// Writes two bytes.
    #[inline]
    pub fn u8u8(&mut self, a: u8, b: u8) {
        self.uint8.extend_from_slice(&[a, b]);
    }

    /// Writes a byte slice.
    pub fn buf(&mut self, buf: &[u8]) {
        self.uint8.extend_from_slice(buf);
    }

    /// Writes a UTF-8 string. Returns the number of bytes written.
    pub fn utf8(&mut self, s: &str) -> usize {
        self.uint8.extend_from_slice(s.as_bytes());
        s.len()
    }
}
