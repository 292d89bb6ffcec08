//! Arbitrary-length bit array with bit-granular slicing and boolean algebra.
//!
//! Bit `i` of a [`BitArray`] is binary digit `2^i` of its magnitude. Storage is
//! a block of 64-bit limbs in least-significant-bit-first order, so the byte
//! form is the plain little-endian layout: byte 0 holds bits 0..8, and bit 0 of
//! each byte is its lowest-indexed bit.
//!
//! Bits at positions `>= len()` never contribute to a value. Every operation
//! that reads raw limbs goes through [`BitArray::words`], which masks the top
//! limb to the exact length.

use std::{
    fmt,
    fs::File,
    io::{Read, Write},
    ops::{Add, AddAssign, BitAnd, BitOr, BitXor, Bound, Index, Not, RangeBounds},
    path::Path,
    str::FromStr,
};

use bitvec::prelude::*;
use rand::RngCore;

use crate::error::{Error, Result};

type Bits = BitVec<u64, Lsb0>;

const WORD_BITS: usize = u64::BITS as usize;

/// An owned, growable sequence of bits with value semantics.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BitArray {
    bits: Bits,
}

impl BitArray {
    /// Create an empty bit array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an integer magnitude.
    ///
    /// The length defaults to the minimal bit width of `value` (0 for 0). A
    /// shorter explicit length drops the high bits.
    pub fn from_int(value: i128, length: Option<usize>) -> Result<Self> {
        if value < 0 {
            return Err(Error::NegativeMagnitude(value));
        }
        Ok(Self::from_u128(value as u128, length))
    }

    /// Build from an unsigned magnitude. See [`BitArray::from_int`].
    pub fn from_u128(value: u128, length: Option<usize>) -> Self {
        let width = (u128::BITS - value.leading_zeros()) as usize;
        Self::from_words(
            vec![value as u64, (value >> WORD_BITS) as u64],
            length.unwrap_or(width),
        )
    }

    /// Build from a binary string where character `k` becomes bit `k`.
    pub fn from_bin_str(s: &str, length: Option<usize>) -> Result<Self> {
        let mut bits = Bits::with_capacity(s.len());
        for (position, ch) in s.chars().enumerate() {
            match ch {
                '0' => bits.push(false),
                '1' => bits.push(true),
                _ => return Err(Error::InvalidBinaryChar { ch, position }),
            }
        }
        if let Some(length) = length {
            bits.resize(length, false);
        }
        Ok(Self { bits })
    }

    /// Build from bytes in little-endian bit/byte order.
    ///
    /// The length defaults to `8 * bytes.len()`.
    pub fn from_bytes(bytes: &[u8], length: Option<usize>) -> Self {
        let mut bits = Bits::with_capacity(bytes.len() * 8);
        bits.extend_from_bitslice(bytes.view_bits::<Lsb0>());
        if let Some(length) = length {
            bits.resize(length, false);
        }
        Self { bits }
    }

    /// Build from a sequence of booleans where element `k` becomes bit `k`.
    pub fn from_bools<I>(iter: I, length: Option<usize>) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let mut bits: Bits = iter.into_iter().collect();
        if let Some(length) = length {
            bits.resize(length, false);
        }
        Self { bits }
    }

    /// A bit array of `length` bits drawn from the thread-local CSPRNG.
    pub fn random(length: usize) -> Self {
        let mut bytes = vec![0u8; length.div_ceil(8)];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::from_bytes(&bytes, Some(length))
    }

    /// Encrypt `message` with a one-time pad.
    ///
    /// Returns `(secret, key)`; `secret.decrypt(&key)` recovers the message.
    pub fn encrypt(message: &str) -> (Self, Self) {
        let plain = Self::from_bytes(message.as_bytes(), None);
        let key = Self::random(plain.len());
        (&plain ^ &key, key)
    }

    /// Reverse [`BitArray::encrypt`].
    pub fn decrypt(&self, key: &BitArray) -> Result<String> {
        Ok(String::from_utf8((self ^ key).to_bytes())?)
    }

    fn from_words(words: Vec<u64>, length: usize) -> Self {
        let mut bits = Bits::from_vec(words);
        bits.resize(length, false);
        Self { bits }
    }

    /// Raw limbs with everything at or above `len()` cleared.
    fn words(&self) -> Vec<u64> {
        let mut words = self.bits.as_raw_slice().to_vec();
        words.truncate(self.len().div_ceil(WORD_BITS));
        let tail = self.len() % WORD_BITS;
        if tail != 0 {
            if let Some(last) = words.last_mut() {
                *last &= (1u64 << tail) - 1;
            }
        }
        words
    }

    fn zip_words(&self, other: &BitArray, length: usize, op: impl Fn(u64, u64) -> u64) -> Self {
        let (lhs, rhs) = (self.words(), other.words());
        let words = (0..lhs.len().max(rhs.len()))
            .map(|i| {
                op(
                    lhs.get(i).copied().unwrap_or(0),
                    rhs.get(i).copied().unwrap_or(0),
                )
            })
            .collect();
        Self::from_words(words, length)
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// True if at least one bit is set, regardless of length.
    pub fn any(&self) -> bool {
        self.bits.any()
    }

    fn resolve(&self, index: isize) -> Option<usize> {
        let len = self.len() as isize;
        let index = if index < 0 { index + len } else { index };
        (0..len).contains(&index).then_some(index as usize)
    }

    fn resolve_range<R: RangeBounds<isize>>(&self, range: &R) -> (usize, usize) {
        let len = self.len() as isize;
        let adjust = |i: isize| if i < 0 { i + len } else { i };
        let start = match range.start_bound() {
            Bound::Included(&s) => adjust(s),
            Bound::Excluded(&s) => adjust(s).saturating_add(1),
            Bound::Unbounded => 0,
        };
        let stop = match range.end_bound() {
            Bound::Included(&e) => adjust(e).saturating_add(1),
            Bound::Excluded(&e) => adjust(e),
            Bound::Unbounded => len,
        };
        let start = start.clamp(0, len);
        (start as usize, stop.clamp(start, len) as usize)
    }

    /// Bit at `index`; negative indices count from the end.
    pub fn get(&self, index: isize) -> Result<bool> {
        self.resolve(index)
            .map(|i| self.bits[i])
            .ok_or(Error::IndexOutOfBounds {
                index,
                len: self.len(),
            })
    }

    /// Set or clear the bit at `index` without changing the length.
    pub fn set(&mut self, index: isize, value: bool) -> Result<()> {
        let i = self.resolve(index).ok_or(Error::IndexOutOfBounds {
            index,
            len: self.len(),
        })?;
        self.bits.set(i, value);
        Ok(())
    }

    /// Contiguous window re-indexed from 0.
    ///
    /// Negative bounds count from the end, out-of-range bounds are clamped and
    /// an inverted range yields an empty array.
    pub fn slice<R: RangeBounds<isize>>(&self, range: R) -> BitArray {
        let (start, stop) = self.resolve_range(&range);
        let mut bits = Bits::with_capacity(stop - start);
        bits.extend_from_bitslice(&self.bits[start..stop]);
        Self { bits }
    }

    /// Every `step`-th bit of `range`, packed from bit 0.
    ///
    /// A negative step visits the same positions as `-step` in reverse order.
    pub fn slice_step<R: RangeBounds<isize>>(&self, range: R, step: isize) -> Result<BitArray> {
        let (start, stop) = self.resolve_range(&range);
        let positions = (start..stop).step_by(step.unsigned_abs().max(1));
        let bits: Bits = match step {
            0 => return Err(Error::ZeroStep),
            1 => return Ok(self.slice(range)),
            s if s > 0 => positions.map(|i| self.bits[i]).collect(),
            _ => positions.rev().map(|i| self.bits[i]).collect(),
        };
        Ok(Self { bits })
    }

    /// Replace the bits of `range` with `value`. The length changes by
    /// `value.len()` minus the width of the range.
    pub fn splice<R: RangeBounds<isize>>(&mut self, range: R, value: &BitArray) {
        let (start, stop) = self.resolve_range(&range);
        let mut bits = Bits::with_capacity(self.len() - (stop - start) + value.len());
        bits.extend_from_bitslice(&self.bits[..start]);
        bits.extend_from_bitslice(value.bits.as_bitslice());
        bits.extend_from_bitslice(&self.bits[stop..]);
        self.bits = bits;
    }

    /// Slice assignment. Only a step of 1 is supported.
    pub fn assign_slice<R: RangeBounds<isize>>(
        &mut self,
        range: R,
        step: isize,
        value: &BitArray,
    ) -> Result<()> {
        match step {
            0 => Err(Error::ZeroStep),
            1 => {
                self.splice(range, value);
                Ok(())
            }
            _ => Err(Error::UnsupportedStep(step)),
        }
    }

    /// Append one bit at position `len()`.
    pub fn push(&mut self, value: bool) {
        self.bits.push(value);
    }

    /// Set every bit to one, or every bit to zero.
    pub fn set_all(&mut self, value: bool) {
        self.bits.fill(value);
    }

    /// Number of positions in `[0, len)` equal to `value`.
    pub fn count(&self, value: bool) -> usize {
        if value {
            self.bits.count_ones()
        } else {
            self.bits.count_zeros()
        }
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter { bits: &self.bits }
    }

    /// Bits as `0`/`1` values, bit 0 first.
    pub fn to_list(&self) -> Vec<u8> {
        self.iter().map(u8::from).collect()
    }

    /// Bits as a `'0'`/`'1'` string, bit 0 first.
    pub fn to_bin_string(&self) -> String {
        self.iter().map(|b| if b { '1' } else { '0' }).collect()
    }

    /// The magnitude, if it fits in 128 bits.
    pub fn to_u128(&self) -> Option<u128> {
        let words = self.words();
        if words.iter().skip(2).any(|&w| w != 0) {
            return None;
        }
        let lo = words.first().copied().unwrap_or(0) as u128;
        let hi = words.get(1).copied().unwrap_or(0) as u128;
        Some(lo | hi << WORD_BITS)
    }

    /// `ceil(len / 8)` bytes; unused high bits of the last byte are zero.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = self
            .words()
            .into_iter()
            .flat_map(u64::to_le_bytes)
            .collect();
        bytes.truncate(self.len().div_ceil(8));
        bytes
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Read everything from `reader`. Without `length`, the result is a whole
    /// number of bytes long.
    pub fn read_from<R: Read>(mut reader: R, length: Option<usize>) -> Result<Self> {
        let mut bytes = vec![];
        reader.read_to_end(&mut bytes)?;
        Ok(Self::from_bytes(&bytes, length))
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_to(File::create(path)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P, length: Option<usize>) -> Result<Self> {
        Self::read_from(File::open(path)?, length)
    }
}

impl FromStr for BitArray {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_bin_str(s, None)
    }
}

impl FromIterator<bool> for BitArray {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self::from_bools(iter, None)
    }
}

impl Index<usize> for BitArray {
    type Output = bool;

    fn index(&self, index: usize) -> &bool {
        &self.bits[index]
    }
}

macro_rules! bitwise_op {
    ($trait:ident, $method:ident, $op:tt, $len:expr) => {
        impl $trait<&BitArray> for &BitArray {
            type Output = BitArray;

            fn $method(self, rhs: &BitArray) -> BitArray {
                self.zip_words(rhs, $len(self.len(), rhs.len()), |a, b| a $op b)
            }
        }

        impl $trait for BitArray {
            type Output = BitArray;

            fn $method(self, rhs: BitArray) -> BitArray {
                (&self).$method(&rhs)
            }
        }

        /// Applies to the magnitude and keeps the left operand's length.
        impl $trait<u128> for &BitArray {
            type Output = BitArray;

            fn $method(self, rhs: u128) -> BitArray {
                let rhs = BitArray::from_u128(rhs, Some(self.len()));
                self.zip_words(&rhs, self.len(), |a, b| a $op b)
            }
        }

        impl $trait<u128> for BitArray {
            type Output = BitArray;

            fn $method(self, rhs: u128) -> BitArray {
                (&self).$method(rhs)
            }
        }
    };
}

bitwise_op!(BitAnd, bitand, &, usize::min);
bitwise_op!(BitOr, bitor, |, usize::max);
bitwise_op!(BitXor, bitxor, ^, usize::max);

impl Not for &BitArray {
    type Output = BitArray;

    fn not(self) -> BitArray {
        BitArray::from_words(self.words().into_iter().map(|w| !w).collect(), self.len())
    }
}

impl Not for BitArray {
    type Output = BitArray;

    fn not(self) -> BitArray {
        !&self
    }
}

/// Concatenation: `rhs` occupies the positions right after `self`.
impl Add<&BitArray> for &BitArray {
    type Output = BitArray;

    fn add(self, rhs: &BitArray) -> BitArray {
        let mut out = self.clone();
        out += rhs;
        out
    }
}

impl Add for BitArray {
    type Output = BitArray;

    fn add(mut self, rhs: BitArray) -> BitArray {
        self += &rhs;
        self
    }
}

impl AddAssign<&BitArray> for BitArray {
    fn add_assign(&mut self, rhs: &BitArray) {
        self.bits.extend_from_bitslice(rhs.bits.as_bitslice());
    }
}

/// Iterator over the bits of a [`BitArray`], bit 0 first.
pub struct Iter<'a> {
    bits: &'a BitSlice<u64, Lsb0>,
}

impl Iterator for Iter<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        let (first, rest) = self.bits.split_first()?;
        self.bits = rest;
        Some(*first)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.bits.len(), Some(self.bits.len()))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a BitArray {
    type Item = bool;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl fmt::Display for BitArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.len();
        match len {
            0 => write!(f, "BitArray()"),
            1..=70 => write!(f, "BitArray('{}')", self.to_bin_string()),
            71..=224 => {
                write!(f, "BitArray(0x")?;
                for nibble in self.bits.chunks(4) {
                    write!(f, "{:x}", nibble.load_le::<u8>())?;
                }
                write!(f, ", length={len})")
            }
            _ => write!(
                f,
                "BitArray('{} <...> {}', length={len})",
                self.slice(..16).to_bin_string(),
                self.slice(-16..).to_bin_string(),
            ),
        }
    }
}

impl fmt::Debug for BitArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
