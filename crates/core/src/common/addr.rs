//! Memory address type and field decoding.
//!
//! An address seen by the cache is split into three fields, from least to most
//! significant:
//! 1. **Block offset:** the low `b` bits, selecting a byte within a block (not modelled).
//! 2. **Set index:** the next `s` bits, selecting one of `2^s` sets.
//! 3. **Tag:** every remaining high bit, identifying the block held by a line.
//!
//! Decoding never fails. Bit widths are validated once when the cache geometry
//! is built, so `s + b <= 64` always holds here.

use std::fmt;

/// A raw 64-bit memory address taken from a trace record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(pub u64);

/// The fields of an address relevant to cache lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedAddr {
    /// Address bits above the set-index and block-offset fields.
    pub tag: u64,
    /// Index of the set the address maps to.
    pub set_index: usize,
    /// Byte offset within the block. Carried for diagnostics only.
    pub block_offset: u64,
}

/// Returns a mask with the low `bits` bits set. `bits >= 64` yields all ones.
#[inline(always)]
const fn low_mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

impl Address {
    /// Creates a new address from a raw 64-bit value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(self) -> u64 {
        self.0
    }

    /// Splits the address into tag, set index, and block offset.
    ///
    /// # Arguments
    ///
    /// * `set_bits` - Width of the set-index field (`s`).
    /// * `block_bits` - Width of the block-offset field (`b`).
    ///
    /// # Returns
    ///
    /// The decoded fields. A shift by the full register width produces zero
    /// rather than overflowing, so `s + b == 64` decodes to tag 0.
    #[inline]
    pub fn decode(self, set_bits: u32, block_bits: u32) -> DecodedAddr {
        let shifted = self.0.checked_shr(block_bits).unwrap_or(0);
        DecodedAddr {
            tag: self.0.checked_shr(set_bits.saturating_add(block_bits)).unwrap_or(0),
            set_index: (shifted & low_mask(set_bits)) as usize,
            block_offset: self.0 & low_mask(block_bits),
        }
    }
}

impl From<u64> for Address {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// Decodes `address` into `(tag, set_index)` for a cache with `2^s` sets and
/// `2^b`-byte blocks.
pub fn decode(address: u64, s: u32, b: u32) -> (u64, usize) {
    let fields = Address::new(address).decode(s, b);
    (fields.tag, fields.set_index)
}
