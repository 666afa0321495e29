//! `SmileDecoder` reads one Smile document into a [`SmileValue`] tree.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use num_bigint::BigInt;
use smile_buffers::Reader;

use super::constants::*;
use super::error::{SharedKind, SmileError};
use super::features::{ParserFeature, ParserFeatures};
use super::util::{
    big_integer_from_bytes, read_7bit, read_float32, read_float64, read_length, read_vint,
    zigzag_decode_32, zigzag_decode_64, MAX_VINT32_BYTES, MAX_VINT64_BYTES,
};
use crate::SmileValue;

/// Decoder for Smile documents.
///
/// Holds the back-reference tables of the document being decoded; they are
/// rebuilt from the header on every [`decode`](Self::decode) call.
#[derive(Debug, Default)]
pub struct SmileDecoder {
    features: ParserFeatures,
    seen_names: Option<Vec<String>>,
    seen_values: Option<Vec<String>>,
}

fn remember(table: &mut Option<Vec<String>>, s: &str) {
    if let Some(seen) = table {
        if seen.len() == MAX_SHARED_REFERENCES {
            seen.clear();
        }
        seen.push(s.to_owned());
    }
}

fn lookup(
    table: &Option<Vec<String>>,
    kind: SharedKind,
    index: usize,
    position: usize,
) -> Result<String, SmileError> {
    let seen = table
        .as_ref()
        .ok_or(SmileError::SharedReferencesDisabled { kind, position })?;
    seen.get(index)
        .cloned()
        .ok_or(SmileError::InvalidSharedReference {
            kind,
            index,
            position,
        })
}

fn utf8(bytes: &[u8], start: usize) -> Result<&str, SmileError> {
    std::str::from_utf8(bytes).map_err(|e| SmileError::InvalidUtf8(start + e.valid_up_to()))
}

/// Length-prefixed 7-bit two's complement payload of a big number token.
fn read_big_integer(reader: &mut Reader<'_>, position: usize) -> Result<BigInt, SmileError> {
    let len = read_length(reader)?;
    let bytes = read_7bit(reader, len)?;
    big_integer_from_bytes(&bytes).ok_or(SmileError::InvalidNumber(position))
}

/// An array or object whose closing token has not been read yet.
enum Container {
    Array(Vec<SmileValue>),
    /// `key` holds a name whose value is still pending.
    Object {
        members: Vec<(String, SmileValue)>,
        key: Option<String>,
    },
}

enum Token {
    Value(SmileValue),
    StartArray,
    StartObject,
}

impl SmileDecoder {
    pub fn new(features: ParserFeatures) -> Self {
        Self {
            features,
            seen_names: None,
            seen_values: None,
        }
    }

    pub fn features(&self) -> &ParserFeatures {
        &self.features
    }

    /// Decodes exactly one document: optional header, root value, optional
    /// 0xFF end marker. Anything after that is rejected.
    pub fn decode(&mut self, input: &[u8]) -> Result<SmileValue, SmileError> {
        let mut reader = Reader::new(input);
        self.read_header(&mut reader)?;
        let value = self.read_any(&mut reader)?;
        if !reader.is_empty() && reader.peek()? == TOKEN_END_OF_CONTENT {
            reader.skip(1)?;
        }
        if !reader.is_empty() {
            return Err(SmileError::TrailingData(reader.position()));
        }
        Ok(value)
    }

    fn read_header(&mut self, reader: &mut Reader<'_>) -> Result<(), SmileError> {
        if reader.starts_with(&HEADER_SIGNATURE) {
            reader.skip(HEADER_SIGNATURE.len())?;
            let byte = reader.u8()?;
            if byte & HEADER_VERSION_MASK != HEADER_VERSION_0 {
                return Err(SmileError::UnsupportedVersion(byte >> 4));
            }
            self.seen_names = (byte & HEADER_BIT_HAS_SHARED_NAMES != 0).then(Vec::new);
            self.seen_values = (byte & HEADER_BIT_HAS_SHARED_STRING_VALUES != 0).then(Vec::new);
            return Ok(());
        }
        if self.features.is_enabled(ParserFeature::RequireHeader) {
            return Err(SmileError::MissingHeader);
        }
        // Without a header nothing says which tables are in use; both
        // reference kinds have tokens of their own, so accept either.
        self.seen_names = Some(Vec::new());
        self.seen_values = Some(Vec::new());
        Ok(())
    }

    /// Reads one complete value, containers included.
    ///
    /// Open containers live on an explicit stack, so hostile nesting costs
    /// heap rather than call depth.
    pub fn read_any(&mut self, reader: &mut Reader<'_>) -> Result<SmileValue, SmileError> {
        let mut open: Vec<Container> = Vec::new();
        loop {
            let at_array_end = matches!(open.last(), Some(Container::Array(_)))
                && reader.peek()? == TOKEN_END_ARRAY;
            let value = match open.last_mut() {
                Some(Container::Object { members, key }) if key.is_none() => {
                    match self.read_key(reader)? {
                        Some(name) => {
                            *key = Some(name);
                            continue;
                        }
                        None => {
                            let members = std::mem::take(members);
                            open.pop();
                            SmileValue::Object(members)
                        }
                    }
                }
                Some(Container::Array(items)) if at_array_end => {
                    reader.skip(1)?;
                    let items = std::mem::take(items);
                    open.pop();
                    SmileValue::Array(items)
                }
                _ => match self.read_token(reader)? {
                    Token::Value(value) => value,
                    Token::StartArray | Token::StartObject if open.len() == MAX_NESTING_DEPTH => {
                        return Err(SmileError::DepthLimitExceeded(MAX_NESTING_DEPTH));
                    }
                    Token::StartArray => {
                        open.push(Container::Array(Vec::new()));
                        continue;
                    }
                    Token::StartObject => {
                        open.push(Container::Object {
                            members: Vec::new(),
                            key: None,
                        });
                        continue;
                    }
                },
            };
            match open.last_mut() {
                None => return Ok(value),
                Some(Container::Array(items)) => items.push(value),
                Some(Container::Object { members, key }) => {
                    if let Some(name) = key.take() {
                        members.push((name, value));
                    }
                }
            }
        }
    }

    /// Reads one value-mode token. Container starts are returned as markers.
    fn read_token(&mut self, reader: &mut Reader<'_>) -> Result<Token, SmileError> {
        let position = reader.position();
        let token = reader.u8()?;
        let value = match token {
            0x01..=0x1f => {
                let index = (token - 1) as usize;
                SmileValue::Str(lookup(&self.seen_values, SharedKind::Value, index, position)?)
            }
            TOKEN_EMPTY_STRING => SmileValue::Str(String::new()),
            TOKEN_NULL => SmileValue::Null,
            TOKEN_FALSE => SmileValue::Bool(false),
            TOKEN_TRUE => SmileValue::Bool(true),
            TOKEN_INT32 => {
                let zz = read_vint(reader, MAX_VINT32_BYTES)?;
                let zz = u32::try_from(zz).map_err(|_| SmileError::InvalidVint(position + 1))?;
                SmileValue::Int(zigzag_decode_32(zz))
            }
            TOKEN_INT64 => {
                let zz = read_vint(reader, MAX_VINT64_BYTES)?;
                SmileValue::Long(zigzag_decode_64(zz))
            }
            TOKEN_BIG_INTEGER => SmileValue::BigInteger(read_big_integer(reader, position)?),
            TOKEN_FLOAT32 => SmileValue::Float(read_float32(reader)?),
            TOKEN_FLOAT64 => SmileValue::Double(read_float64(reader)?),
            TOKEN_BIG_DECIMAL => {
                let zz = read_vint(reader, MAX_VINT32_BYTES)?;
                let zz = u32::try_from(zz).map_err(|_| SmileError::InvalidVint(position + 1))?;
                SmileValue::BigDecimal {
                    unscaled: read_big_integer(reader, position)?,
                    scale: zigzag_decode_32(zz),
                }
            }
            0x40..=0x5f => self.read_short_str(reader, (token & 0x1f) as usize + 1)?,
            0x60..=0x7f => {
                self.read_short_str(reader, (token & 0x1f) as usize + MAX_TINY_ASCII_BYTES + 1)?
            }
            0x80..=0x9f => self.read_short_str(reader, (token & 0x1f) as usize + 2)?,
            0xa0..=0xbf => {
                self.read_short_str(reader, (token & 0x1f) as usize + MAX_TINY_UNICODE_BYTES + 1)?
            }
            0xc0..=0xdf => SmileValue::Int(zigzag_decode_32((token & 0x1f) as u32)),
            TOKEN_LONG_ASCII | TOKEN_LONG_UNICODE => {
                let bytes = reader.until(TOKEN_END_OF_STRING)?;
                SmileValue::Str(utf8(bytes, position + 1)?.to_owned())
            }
            TOKEN_BINARY_7BIT => {
                let len = read_length(reader)?;
                SmileValue::Str(BASE64.encode(read_7bit(reader, len)?))
            }
            0xec..=0xef => {
                let index = ((token & 0x03) as usize) << 8 | reader.u8()? as usize;
                SmileValue::Str(lookup(&self.seen_values, SharedKind::Value, index, position)?)
            }
            TOKEN_START_ARRAY => return Ok(Token::StartArray),
            TOKEN_START_OBJECT => return Ok(Token::StartObject),
            TOKEN_BINARY_RAW => {
                let len = read_length(reader)?;
                SmileValue::Str(BASE64.encode(reader.buf(len)?))
            }
            byte => return Err(SmileError::InvalidToken { byte, position }),
        };
        Ok(Token::Value(value))
    }

    fn read_short_str(
        &mut self,
        reader: &mut Reader<'_>,
        len: usize,
    ) -> Result<SmileValue, SmileError> {
        let s = reader.utf8(len)?;
        remember(&mut self.seen_values, s);
        Ok(SmileValue::Str(s.to_owned()))
    }

    /// Reads one key-mode token; `None` at the end of the object.
    fn read_key(&mut self, reader: &mut Reader<'_>) -> Result<Option<String>, SmileError> {
        let position = reader.position();
        let token = reader.u8()?;
        let key = match token {
            TOKEN_END_OBJECT => return Ok(None),
            TOKEN_KEY_EMPTY_STRING => String::new(),
            0x30..=0x33 => {
                let index = ((token & 0x03) as usize) << 8 | reader.u8()? as usize;
                lookup(&self.seen_names, SharedKind::Name, index, position)?
            }
            TOKEN_KEY_LONG_STRING => {
                let bytes = reader.until(TOKEN_END_OF_STRING)?;
                let name = utf8(bytes, position + 1)?;
                remember(&mut self.seen_names, name);
                name.to_owned()
            }
            0x40..=0x7f => {
                let index = (token & 0x3f) as usize;
                lookup(&self.seen_names, SharedKind::Name, index, position)?
            }
            0x80..=0xbf => self.read_short_name(reader, (token & 0x3f) as usize + 1)?,
            0xc0..=0xf7 => self.read_short_name(reader, (token - 0xc0) as usize + 2)?,
            byte => return Err(SmileError::InvalidKeyToken { byte, position }),
        };
        Ok(Some(key))
    }

    fn read_short_name(
        &mut self,
        reader: &mut Reader<'_>,
        len: usize,
    ) -> Result<String, SmileError> {
        let name = reader.utf8(len)?;
        remember(&mut self.seen_names, name);
        Ok(name.to_owned())
    }
}
