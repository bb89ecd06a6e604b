//! Compact difficulty targets

use std::cmp::Ordering;

/// A 256-bit proof-of-work target, stored big-endian.
///
/// Derived ordering is numeric because the bytes are big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Target([u8; 32]);

impl Target {
    /// Decode compact `bits` (8-bit exponent, 23-bit mantissa, sign bit).
    ///
    /// Returns `None` for negative targets and for targets that do not fit in
    /// 256 bits.
    pub fn from_compact(bits: u32) -> Option<Self> {
        let size = (bits >> 24) as usize;
        let mut word = bits & 0x007f_ffff;
        if word != 0 && bits & 0x0080_0000 != 0 {
            return None;
        }

        let mut out = [0u8; 32];
        if size <= 3 {
            word >>= 8 * (3 - size);
            out[28..32].copy_from_slice(&word.to_be_bytes());
            return Some(Self(out));
        }

        for i in 0..3 {
            let byte = ((word >> (8 * i)) & 0xff) as u8;
            let position = size - 3 + i;
            if position >= 32 {
                if byte != 0 {
                    return None;
                }
                continue;
            }
            out[31 - position] = byte;
        }
        Some(Self(out))
    }

    /// Big-endian bytes
    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// True for the zero target (unattainable proof of work)
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Compare two compact values numerically
    pub fn cmp_compact(a: u32, b: u32) -> Option<Ordering> {
        Some(Self::from_compact(a)?.cmp(&Self::from_compact(b)?))
    }
}
