//! `SmileEncoder` writes a [`SmileValue`] tree as one Smile document.
//!
//! Token layout used by the writer:
//! - `0x20` empty string, `0x21` null, `0x22`/`0x23` false/true
//! - `0xC0..=0xDF` small int (zigzag, -16..=15)
//! - `0x24` / `0x25` int32 / int64 (zigzag VInt)
//! - `0x26` big integer, `0x2A` big decimal (7-bit packed two's complement)
//! - `0x28` / `0x29` float32 / float64 (7-bit split of the IEEE bits)
//! - `0x40..=0xBF` tiny/short ASCII and Unicode strings, length in the token
//! - `0xE0` / `0xE4` long ASCII / Unicode strings, terminated by `0xFC`
//! - `0x01..=0x1F`, `0xEC..=0xEF` shared string value back-references
//! - `0xF8`/`0xF9` array, `0xFA`/`0xFB` object
//!
//! Property names use the key-mode tokens: `0x40..=0x7F` and `0x30..=0x33`
//! for back-references, `0x80..=0xBF` short ASCII, `0xC0..=0xF6` short
//! Unicode, `0x34` long names.

use std::collections::HashMap;

use num_bigint::BigInt;
use smile_buffers::Writer;

use super::constants::*;
use super::features::{GeneratorFeature, GeneratorFeatures};
use super::util::{
    big_integer_to_bytes, write_7bit, write_float32, write_float64, write_vint, zigzag_encode_32,
    zigzag_encode_64,
};
use crate::SmileValue;

/// Back-reference table of strings already written.
///
/// `count` tracks the decoder's table size, which also includes the slots
/// this side refuses to reference.
#[derive(Debug, Default)]
struct SeenStrings {
    index: HashMap<String, usize>,
    count: usize,
}

impl SeenStrings {
    fn find(&self, s: &str) -> Option<usize> {
        self.index.get(s).copied()
    }

    fn add(&mut self, s: &str) {
        if self.count == MAX_SHARED_REFERENCES {
            self.index.clear();
            self.count = 0;
        }
        if is_valid_backref(self.count) {
            self.index.insert(s.to_owned(), self.count);
        }
        self.count += 1;
    }
}

/// A long reference to `ix` would put 0xFE/0xFF on the wire.
fn is_valid_backref(ix: usize) -> bool {
    (ix & 0xff) < MIN_RESERVED_REFERENCE_LOW_BYTE
}

pub struct SmileEncoder {
    pub writer: Writer,
    features: GeneratorFeatures,
    seen_names: Option<SeenStrings>,
    seen_values: Option<SeenStrings>,
}

impl Default for SmileEncoder {
    fn default() -> Self {
        Self::new(GeneratorFeatures::default())
    }
}

impl SmileEncoder {
    pub fn new(features: GeneratorFeatures) -> Self {
        Self {
            writer: Writer::new(),
            features,
            seen_names: None,
            seen_values: None,
        }
    }

    pub fn features(&self) -> &GeneratorFeatures {
        &self.features
    }

    /// Encodes a complete document: header, root value and end marker as
    /// the features ask.
    pub fn encode(&mut self, value: &SmileValue) -> Vec<u8> {
        self.writer.reset();
        self.seen_names = self
            .features
            .is_enabled(GeneratorFeature::CheckSharedNames)
            .then(SeenStrings::default);
        self.seen_values = self
            .features
            .is_enabled(GeneratorFeature::CheckSharedStringValues)
            .then(SeenStrings::default);
        if self.features.is_enabled(GeneratorFeature::WriteHeader) {
            self.write_header();
        }
        self.write_any(value);
        if self.features.is_enabled(GeneratorFeature::WriteEndMarker) {
            self.writer.u8(TOKEN_END_OF_CONTENT);
        }
        self.writer.flush()
    }

    pub fn write_header(&mut self) {
        self.writer.buf(&HEADER_SIGNATURE);
        self.writer.u8(self.features.header_byte());
    }

    pub fn write_any(&mut self, value: &SmileValue) {
        match value {
            SmileValue::Null => self.write_null(),
            SmileValue::Bool(b) => self.write_boolean(*b),
            SmileValue::Int(i) => self.write_int(*i),
            SmileValue::Long(l) => self.write_long(*l),
            SmileValue::BigInteger(i) => self.write_big_integer(i),
            SmileValue::Float(f) => self.write_float(*f),
            SmileValue::Double(d) => self.write_double(*d),
            SmileValue::BigDecimal { unscaled, scale } => {
                self.write_big_decimal(unscaled, *scale)
            }
            SmileValue::Str(s) => self.write_str(s),
            SmileValue::Array(arr) => self.write_arr(arr),
            SmileValue::Object(obj) => self.write_obj(obj),
        }
    }

    pub fn write_null(&mut self) {
        self.writer.u8(TOKEN_NULL);
    }

    pub fn write_boolean(&mut self, b: bool) {
        self.writer.u8(if b { TOKEN_TRUE } else { TOKEN_FALSE });
    }

    pub fn write_int(&mut self, int: i32) {
        let zz = zigzag_encode_32(int);
        if (SMALL_INT_MIN..=SMALL_INT_MAX).contains(&int) {
            self.writer.u8(TOKEN_PREFIX_SMALL_INT + zz as u8);
        } else {
            self.writer.u8(TOKEN_INT32);
            write_vint(&mut self.writer, zz as u64);
        }
    }

    /// Always uses the 64-bit token so the width class survives decoding.
    pub fn write_long(&mut self, long: i64) {
        self.writer.u8(TOKEN_INT64);
        write_vint(&mut self.writer, zigzag_encode_64(long));
    }

    pub fn write_big_integer(&mut self, int: &BigInt) {
        self.writer.u8(TOKEN_BIG_INTEGER);
        self.write_7bit_with_length(&big_integer_to_bytes(int));
    }

    pub fn write_float(&mut self, float: f32) {
        self.writer.u8(TOKEN_FLOAT32);
        write_float32(&mut self.writer, float);
    }

    pub fn write_double(&mut self, double: f64) {
        self.writer.u8(TOKEN_FLOAT64);
        write_float64(&mut self.writer, double);
    }

    pub fn write_big_decimal(&mut self, unscaled: &BigInt, scale: i32) {
        self.writer.u8(TOKEN_BIG_DECIMAL);
        write_vint(&mut self.writer, zigzag_encode_32(scale) as u64);
        self.write_7bit_with_length(&big_integer_to_bytes(unscaled));
    }

    fn write_7bit_with_length(&mut self, bytes: &[u8]) {
        write_vint(&mut self.writer, bytes.len() as u64);
        write_7bit(&mut self.writer, bytes);
    }

    pub fn write_str(&mut self, s: &str) {
        if s.is_empty() {
            self.writer.u8(TOKEN_EMPTY_STRING);
            return;
        }
        if let Some(ix) = self.seen_values.as_ref().and_then(|seen| seen.find(s)) {
            self.write_shared_value_ref(ix);
            return;
        }
        let len = s.len();
        let token = if s.is_ascii() {
            if len <= MAX_TINY_ASCII_BYTES {
                Some(TOKEN_PREFIX_TINY_ASCII + (len - 1) as u8)
            } else if len <= MAX_SHORT_ASCII_BYTES {
                Some(TOKEN_PREFIX_SHORT_ASCII + (len - MAX_TINY_ASCII_BYTES - 1) as u8)
            } else {
                None
            }
        } else if len <= MAX_TINY_UNICODE_BYTES {
            Some(TOKEN_PREFIX_TINY_UNICODE + (len - 2) as u8)
        } else if len <= MAX_SHORT_UNICODE_BYTES {
            Some(TOKEN_PREFIX_SHORT_UNICODE + (len - MAX_TINY_UNICODE_BYTES - 1) as u8)
        } else {
            None
        };
        match token {
            Some(token) => {
                self.writer.u8(token);
                self.writer.utf8(s);
                if let Some(seen) = self.seen_values.as_mut() {
                    seen.add(s);
                }
            }
            None => {
                self.writer.u8(if s.is_ascii() {
                    TOKEN_LONG_ASCII
                } else {
                    TOKEN_LONG_UNICODE
                });
                self.writer.utf8(s);
                self.writer.u8(TOKEN_END_OF_STRING);
            }
        }
    }

    fn write_shared_value_ref(&mut self, ix: usize) {
        if ix <= MAX_SHORT_SHARED_VALUE_INDEX {
            self.writer.u8((ix + 1) as u8);
        } else {
            self.writer.u8u8(
                TOKEN_PREFIX_SHARED_STRING_LONG | (ix >> 8) as u8,
                (ix & 0xff) as u8,
            );
        }
    }

    pub fn write_key(&mut self, name: &str) {
        if name.is_empty() {
            self.writer.u8(TOKEN_KEY_EMPTY_STRING);
            return;
        }
        if let Some(ix) = self.seen_names.as_ref().and_then(|seen| seen.find(name)) {
            if ix <= MAX_SHORT_SHARED_NAME_INDEX {
                self.writer.u8(TOKEN_PREFIX_KEY_SHARED_SHORT + ix as u8);
            } else {
                self.writer.u8u8(
                    TOKEN_PREFIX_KEY_SHARED_LONG | (ix >> 8) as u8,
                    (ix & 0xff) as u8,
                );
            }
            return;
        }
        let len = name.len();
        if name.is_ascii() && len <= MAX_SHORT_NAME_ASCII_BYTES {
            self.writer.u8(TOKEN_PREFIX_KEY_ASCII + (len - 1) as u8);
            self.writer.utf8(name);
        } else if !name.is_ascii() && len <= MAX_SHORT_NAME_UNICODE_BYTES {
            self.writer.u8(TOKEN_PREFIX_KEY_UNICODE + (len - 2) as u8);
            self.writer.utf8(name);
        } else {
            self.writer.u8(TOKEN_KEY_LONG_STRING);
            self.writer.utf8(name);
            self.writer.u8(TOKEN_END_OF_STRING);
        }
        if let Some(seen) = self.seen_names.as_mut() {
            seen.add(name);
        }
    }

    pub fn write_arr(&mut self, arr: &[SmileValue]) {
        self.writer.u8(TOKEN_START_ARRAY);
        for item in arr {
            self.write_any(item);
        }
        self.writer.u8(TOKEN_END_ARRAY);
    }

    pub fn write_obj(&mut self, obj: &[(String, SmileValue)]) {
        self.writer.u8(TOKEN_START_OBJECT);
        for (key, val) in obj {
            self.write_key(key);
            self.write_any(val);
        }
        self.writer.u8(TOKEN_END_OBJECT);
    }
}
