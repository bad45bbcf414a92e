//! Low-level bit window utilities for byte slices.
//!
//! A window is addressed from the *last* byte of the slice: bit 0 is the LSB of
//! the last byte, bit 7 its MSB, bit 8 the LSB of the byte before it, and so on.
//! `BitRange { begin: 7, end: 6 }` therefore selects the two high bits of a
//! single-byte field. Internally positions are converted to MSB-first order
//! (bit 0 = high bit of the first byte) for the actual reads and writes.

use crate::errors::BitError;

/// Inclusive bit window, `begin >= end`, counted from the LSB of the last byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitRange {
    pub begin: usize,
    pub end: usize,
}

impl BitRange {
    pub const fn new(begin: usize, end: usize) -> Self {
        BitRange { begin, end }
    }

    /// Number of bits covered by the window.
    pub const fn len(&self) -> usize {
        self.begin - self.end + 1
    }

    fn check(&self, data: &[u8]) -> Result<(), BitError> {
        if self.begin < self.end {
            return Err(BitError::Reversed {
                begin: self.begin,
                end: self.end,
            });
        }
        if self.begin >= data.len() * 8 {
            return Err(BitError::OutOfBounds {
                begin: self.begin,
                end: self.end,
                len: data.len(),
            });
        }
        if self.len() > 64 {
            return Err(BitError::TooManyBits { bits: self.len() });
        }

        Ok(())
    }

    /// MSB-first position of the window's first bit.
    fn msb_start(&self, data: &[u8]) -> usize {
        data.len() * 8 - 1 - self.begin
    }
}

/// Reads a single bit at `bit_pos` (0 = MSB of first byte). Returns 0 or 1.
fn read_bit_at(data: &[u8], bit_pos: usize) -> u8 {
    (data[bit_pos / 8] >> (7 - bit_pos % 8)) & 1
}

/// Sets or clears the bit at `bit_pos` (0 = MSB of first byte).
fn write_bit_at(data: &mut [u8], bit_pos: usize, bit: u8) {
    let mask = 1u8 << (7 - bit_pos % 8);
    if bit == 0 {
        data[bit_pos / 8] &= !mask;
    } else {
        data[bit_pos / 8] |= mask;
    }
}

/// Reads `n` bits starting at MSB-first position `bit_pos` as an unsigned value.
fn read_bits_at(data: &[u8], bit_pos: usize, n: usize) -> u64 {
    let mut value = 0u64;

    for pos in bit_pos..bit_pos + n {
        value = (value << 1) | read_bit_at(data, pos) as u64;
    }

    value
}

/// Interprets the whole slice as an unsigned big-endian integer.
///
/// Slices longer than 8 bytes keep only their low 64 bits.
pub fn to_uint(data: &[u8]) -> u64 {
    data.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64)
}

/// Encodes `value` as an unsigned big-endian integer of exactly `width` bytes.
///
/// High-order bits that do not fit are dropped.
pub fn from_uint(value: u64, width: usize) -> Vec<u8> {
    (0..width)
        .rev()
        .map(|i| if i >= 8 { 0 } else { (value >> (i * 8)) as u8 })
        .collect()
}

/// Extracts `range` from `data` as a zero-extended unsigned integer.
///
/// Passing `None` reads the whole slice, see [to_uint].
pub fn extract(data: &[u8], range: Option<BitRange>) -> Result<u64, BitError> {
    let Some(range) = range else {
        return Ok(to_uint(data));
    };

    range.check(data)?;
    Ok(read_bits_at(data, range.msb_start(data), range.len()))
}

/// Returns a copy of `old` with the window `range` overwritten by the low-order
/// bits of `new` (read as a big-endian integer). Bits outside the window are
/// preserved.
pub fn inject(old: &[u8], new: &[u8], range: BitRange) -> Result<Vec<u8>, BitError> {
    range.check(old)?;

    let mut out = old.to_vec();
    let start = range.msb_start(old);
    let n = range.len();

    for k in 0..n {
        // k-th bit of `new` counted from its LSB
        let bit = match new.len().checked_sub(1 + k / 8) {
            Some(index) => (new[index] >> (k % 8)) & 1,
            None => 0,
        };
        write_bit_at(&mut out, start + n - 1 - k, bit);
    }

    Ok(out)
}
