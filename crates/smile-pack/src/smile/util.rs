//! Low-level Smile number encodings: zigzag, VInts, 7-bit packing.
//!
//! A Smile VInt is big-endian: every byte but the last carries 7 bits with
//! the high bit clear, and the last byte carries 6 bits with 0x80 set.
//! 7-bit packing turns each run of 7 raw bytes into 8 bytes whose high bit
//! is always clear, so the payload can never look like a 0xF8..0xFF marker.

use num_bigint::BigInt;
use smile_buffers::{Reader, Writer};

use super::error::SmileError;

/// VInt bytes needed for any `u32`.
pub const MAX_VINT32_BYTES: usize = 5;
/// VInt bytes needed for any `u64`.
pub const MAX_VINT64_BYTES: usize = 10;

#[inline]
pub fn zigzag_encode_32(i: i32) -> u32 {
    ((i << 1) ^ (i >> 31)) as u32
}

#[inline]
pub fn zigzag_decode_32(u: u32) -> i32 {
    ((u >> 1) as i32) ^ -((u & 1) as i32)
}

#[inline]
pub fn zigzag_encode_64(l: i64) -> u64 {
    ((l << 1) ^ (l >> 63)) as u64
}

#[inline]
pub fn zigzag_decode_64(u: u64) -> i64 {
    ((u >> 1) as i64) ^ -((u & 1) as i64)
}

pub fn write_vint(writer: &mut Writer, value: u64) {
    let mut out = [0u8; MAX_VINT64_BYTES];
    let mut i = out.len() - 1;
    out[i] = 0x80 | (value & 0x3f) as u8;
    let mut rest = value >> 6;
    while rest != 0 {
        i -= 1;
        out[i] = (rest & 0x7f) as u8;
        rest >>= 7;
    }
    writer.buf(&out[i..]);
}

/// Reads a VInt of at most `max_bytes` bytes.
pub fn read_vint(reader: &mut Reader<'_>, max_bytes: usize) -> Result<u64, SmileError> {
    let start = reader.position();
    let mut value: u64 = 0;
    for _ in 0..max_bytes {
        let b = reader.u8()?;
        if b & 0x80 != 0 {
            if value > u64::MAX >> 6 {
                return Err(SmileError::InvalidVint(start));
            }
            return Ok((value << 6) | (b & 0x3f) as u64);
        }
        if value > u64::MAX >> 7 {
            return Err(SmileError::InvalidVint(start));
        }
        value = (value << 7) | b as u64;
    }
    Err(SmileError::InvalidVint(start))
}

/// Reads an unsigned VInt used as a byte length.
pub fn read_length(reader: &mut Reader<'_>) -> Result<usize, SmileError> {
    let start = reader.position();
    let len = read_vint(reader, MAX_VINT32_BYTES)?;
    u32::try_from(len)
        .map(|l| l as usize)
        .map_err(|_| SmileError::InvalidVint(start))
}

/// Size of the 7-bit packed form of `raw` bytes.
pub fn encoded_7bit_len(raw: usize) -> usize {
    let rem = raw % 7;
    raw / 7 * 8 + if rem == 0 { 0 } else { rem + 1 }
}

pub fn write_7bit(writer: &mut Writer, data: &[u8]) {
    let mut chunks = data.chunks_exact(7);
    for chunk in &mut chunks {
        let v = chunk.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64);
        for shift in (0..8).rev() {
            writer.u8(((v >> (shift * 7)) & 0x7f) as u8);
        }
    }
    let rem = chunks.remainder();
    if !rem.is_empty() {
        // r bytes hold 8r bits: r full 7-bit groups, then r bits right-aligned
        let r = rem.len();
        let v = rem.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64);
        for i in 0..r {
            writer.u8(((v >> (8 * r - 7 * (i + 1))) & 0x7f) as u8);
        }
        writer.u8((v & ((1u64 << r) - 1)) as u8);
    }
}

/// Reads `raw_len` bytes from their 7-bit packed form.
pub fn read_7bit(reader: &mut Reader<'_>, raw_len: usize) -> Result<Vec<u8>, SmileError> {
    let start = reader.position();
    let encoded = reader.buf(encoded_7bit_len(raw_len))?;
    check_7bit(encoded, start)?;
    let mut out = Vec::with_capacity(raw_len);
    let mut groups = encoded.chunks_exact(8);
    for group in &mut groups {
        let v = group.iter().fold(0u64, |acc, &b| (acc << 7) | b as u64);
        out.extend_from_slice(&v.to_be_bytes()[1..]);
    }
    if let Some((&last, head)) = groups.remainder().split_last() {
        let r = head.len();
        let v = head.iter().fold(0u64, |acc, &b| (acc << 7) | b as u64);
        let v = (v << r) | (last as u64 & ((1u64 << r) - 1));
        out.extend_from_slice(&v.to_be_bytes()[8 - r..]);
    }
    Ok(out)
}

fn check_7bit(bytes: &[u8], start: usize) -> Result<(), SmileError> {
    match bytes.iter().position(|&b| b & 0x80 != 0) {
        Some(i) => Err(SmileError::InvalidSevenBit(start + i)),
        None => Ok(()),
    }
}

pub fn write_float32(writer: &mut Writer, f: f32) {
    let bits = f.to_bits();
    for shift in [28, 21, 14, 7, 0] {
        writer.u8(((bits >> shift) & 0x7f) as u8);
    }
}

pub fn read_float32(reader: &mut Reader<'_>) -> Result<f32, SmileError> {
    let start = reader.position();
    let bytes = reader.buf(5)?;
    check_7bit(bytes, start)?;
    let bits = bytes.iter().fold(0u64, |acc, &b| (acc << 7) | b as u64);
    Ok(f32::from_bits(bits as u32))
}

pub fn write_float64(writer: &mut Writer, d: f64) {
    let bits = d.to_bits();
    for shift in [63, 56, 49, 42, 35, 28, 21, 14, 7, 0] {
        writer.u8(((bits >> shift) & 0x7f) as u8);
    }
}

pub fn read_float64(reader: &mut Reader<'_>) -> Result<f64, SmileError> {
    let start = reader.position();
    let bytes = reader.buf(10)?;
    check_7bit(bytes, start)?;
    // the first byte carries a single bit; the rest shift off the top
    let bits = bytes.iter().fold(0u64, |acc, &b| (acc << 7) | b as u64);
    Ok(f64::from_bits(bits))
}

/// Minimal big-endian two's complement bytes of `int`.
pub fn big_integer_to_bytes(int: &BigInt) -> Vec<u8> {
    int.to_signed_bytes_be()
}

/// Inverse of [`big_integer_to_bytes`]; `None` for an empty payload.
pub fn big_integer_from_bytes(bytes: &[u8]) -> Option<BigInt> {
    (!bytes.is_empty()).then(|| BigInt::from_signed_bytes_be(bytes))
}
