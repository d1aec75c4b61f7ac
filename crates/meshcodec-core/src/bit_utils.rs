//! Zigzag mappings between signed deltas and unsigned symbols.
//!
//! Small magnitudes of either sign map to small unsigned values:
//! `0, -1, 1, -2, 2, ...` becomes `0, 1, 2, 3, 4, ...`.

/// Maps a wrapping 8-bit delta to its zigzag symbol.
#[inline]
pub fn zigzag8(v: u8) -> u8 {
    (v << 1) ^ (((v as i8) >> 7) as u8)
}

/// Inverse of [`zigzag8`].
#[inline]
pub fn unzigzag8(v: u8) -> u8 {
    (v >> 1) ^ (v & 1).wrapping_neg()
}

/// Maps a wrapping 32-bit delta to its zigzag symbol.
#[inline]
pub fn zigzag32(v: u32) -> u32 {
    (v << 1) ^ (((v as i32) >> 31) as u32)
}

/// Inverse of [`zigzag32`].
#[inline]
pub fn unzigzag32(v: u32) -> u32 {
    (v >> 1) ^ (v & 1).wrapping_neg()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zigzag8() {
        assert_eq!(zigzag8(0), 0);
        assert_eq!(zigzag8(0xff), 1); // -1
        assert_eq!(zigzag8(1), 2);
        assert_eq!(zigzag8(0xfe), 3); // -2
        assert_eq!(zigzag8(0x7f), 0xfe);
        assert_eq!(zigzag8(0x80), 0xff); // -128
        for v in 0..=255u8 {
            assert_eq!(unzigzag8(zigzag8(v)), v);
        }
    }

    #[test]
    fn test_zigzag32() {
        assert_eq!(zigzag32(0), 0);
        assert_eq!(zigzag32(u32::MAX), 1);
        assert_eq!(zigzag32(1), 2);
        assert_eq!(zigzag32(0x8000_0000), u32::MAX);
        assert_eq!(unzigzag32(3), (-2i32) as u32);
        assert_eq!(unzigzag32(12), 6);
    }
}
