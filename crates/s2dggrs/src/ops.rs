//! Bit operations shared by the Hilbert curve and the identifier algebra.

/// Convert a binary index to its Binary Reflected Gray Code (BRGC) form.
pub const fn graycode(x: u32) -> u32 {
    x ^ (x >> 1)
}

/// Bitmask with the `bits` least-significant bits of a `u64` set. Saturates at
/// 64 instead of overflowing the shift.
#[inline]
pub const fn bitmask64(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Isolate the lowest set bit of `word` (`0` when `word` is zero).
#[inline]
pub const fn lowest_set_bit(word: u64) -> u64 {
    word & word.wrapping_neg()
}
