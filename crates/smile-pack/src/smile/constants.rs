//! Smile wire constants.

/// First two header bytes, `:)`.
pub const HEADER_MAGIC: [u8; 2] = [0x3a, 0x29];
/// Full signature: `:)` followed by a line feed.
pub const HEADER_SIGNATURE: [u8; 3] = [0x3a, 0x29, 0x0a];
/// Signature plus the version/feature byte.
pub const HEADER_LENGTH: usize = 4;

pub const HEADER_VERSION_0: u8 = 0x00;
pub const HEADER_VERSION_MASK: u8 = 0xf0;
pub const HEADER_BIT_HAS_SHARED_NAMES: u8 = 0x01;
pub const HEADER_BIT_HAS_SHARED_STRING_VALUES: u8 = 0x02;
pub const HEADER_BIT_HAS_RAW_BINARY: u8 = 0x04;

// ---- value mode ----

pub const TOKEN_EMPTY_STRING: u8 = 0x20;
pub const TOKEN_NULL: u8 = 0x21;
pub const TOKEN_FALSE: u8 = 0x22;
pub const TOKEN_TRUE: u8 = 0x23;
pub const TOKEN_INT32: u8 = 0x24;
pub const TOKEN_INT64: u8 = 0x25;
pub const TOKEN_BIG_INTEGER: u8 = 0x26;
pub const TOKEN_FLOAT32: u8 = 0x28;
pub const TOKEN_FLOAT64: u8 = 0x29;
pub const TOKEN_BIG_DECIMAL: u8 = 0x2a;

pub const TOKEN_PREFIX_TINY_ASCII: u8 = 0x40;
pub const TOKEN_PREFIX_SHORT_ASCII: u8 = 0x60;
pub const TOKEN_PREFIX_TINY_UNICODE: u8 = 0x80;
pub const TOKEN_PREFIX_SHORT_UNICODE: u8 = 0xa0;
pub const TOKEN_PREFIX_SMALL_INT: u8 = 0xc0;

pub const TOKEN_LONG_ASCII: u8 = 0xe0;
pub const TOKEN_LONG_UNICODE: u8 = 0xe4;
pub const TOKEN_BINARY_7BIT: u8 = 0xe8;
pub const TOKEN_PREFIX_SHARED_STRING_LONG: u8 = 0xec;

pub const TOKEN_START_ARRAY: u8 = 0xf8;
pub const TOKEN_END_ARRAY: u8 = 0xf9;
pub const TOKEN_START_OBJECT: u8 = 0xfa;
pub const TOKEN_END_OBJECT: u8 = 0xfb;
pub const TOKEN_END_OF_STRING: u8 = 0xfc;
pub const TOKEN_BINARY_RAW: u8 = 0xfd;
pub const TOKEN_END_OF_CONTENT: u8 = 0xff;

// ---- key mode ----

pub const TOKEN_KEY_EMPTY_STRING: u8 = 0x20;
pub const TOKEN_PREFIX_KEY_SHARED_LONG: u8 = 0x30;
pub const TOKEN_KEY_LONG_STRING: u8 = 0x34;
pub const TOKEN_PREFIX_KEY_SHARED_SHORT: u8 = 0x40;
pub const TOKEN_PREFIX_KEY_ASCII: u8 = 0x80;
pub const TOKEN_PREFIX_KEY_UNICODE: u8 = 0xc0;

// ---- length classes ----

pub const MAX_TINY_ASCII_BYTES: usize = 32;
pub const MAX_SHORT_ASCII_BYTES: usize = 64;
pub const MAX_TINY_UNICODE_BYTES: usize = 33;
pub const MAX_SHORT_UNICODE_BYTES: usize = 65;
pub const MAX_SHORT_NAME_ASCII_BYTES: usize = 64;
pub const MAX_SHORT_NAME_UNICODE_BYTES: usize = 56;

// ---- back-references ----

/// Both shared tables reset once they hold this many entries.
pub const MAX_SHARED_REFERENCES: usize = 1024;
pub const MAX_SHORT_SHARED_NAME_INDEX: usize = 63;
pub const MAX_SHORT_SHARED_VALUE_INDEX: usize = 30;
/// Long back-references never use a low byte of 0xFE or 0xFF; those slots
/// are counted but left unreferenced.
pub const MIN_RESERVED_REFERENCE_LOW_BYTE: usize = 0xfe;
/// Longest string value (in UTF-8 bytes) that takes part in value sharing.
pub const MAX_SHARED_STRING_LENGTH_BYTES: usize = 65;

/// Smallest and largest values that fit the 5-bit small-int token.
pub const SMALL_INT_MIN: i32 = -16;
pub const SMALL_INT_MAX: i32 = 15;

/// Deepest array/object nesting the decoder accepts.
pub const MAX_NESTING_DEPTH: usize = 1000;
