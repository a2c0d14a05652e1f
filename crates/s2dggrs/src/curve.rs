//! Two-dimensional Hilbert curve over 64-bit indices.
//!
//! Positions inside a cube face are linearised with a Hilbert curve so that
//! consecutive indices are always edge-adjacent. The state machine processes
//! coordinate bits from the most significant end, so the first `k` digits of
//! an order-`n` index are exactly the order-`k` index of the same point
//! truncated to `k` bits per axis. The identifier algebra relies on that
//! prefix property to read a cell's position at any level.

use crate::ops;

/// Highest supported order: 30 digits of 2 bits fill 60 bits of index.
pub const MAX_ORDER: u32 = 30;

/// Rotate the 2-bit label used by the Hilbert state machine.
#[inline]
fn rot2(label: u32) -> u32 {
    match label & 3 {
        0 => 0,
        1 => 2,
        2 => 1,
        _ => 3,
    }
}

/// Gray code limited to the low two bits.
#[inline]
fn gray2(word: u32) -> u32 {
    ops::graycode(word) & 3
}

/// Hilbert index of `(x, y)` on a `2^order` square grid.
///
/// Coordinates must be below `2^order`; `order` must not exceed
/// [`MAX_ORDER`].
pub fn hilbert_index(order: u32, x: u32, y: u32) -> u64 {
    debug_assert!(order <= MAX_ORDER, "order {order} exceeds {MAX_ORDER}");
    let mut index_acc: u64 = 0;
    let mut entry_state = 0;
    let mut direction_state = 0;
    for step in 0..order {
        let bit_offset = order - step - 1;
        let a_bit = (y >> bit_offset) & 1;
        let b_bit = (x >> bit_offset) & 1;
        let label: u32 = (a_bit | b_bit << 1) ^ entry_state;
        let word = match direction_state {
            0 => gray2(rot2(label)),
            _ => gray2(label),
        };
        if word == 3 {
            entry_state = 3 - entry_state;
        }
        index_acc = (index_acc << 2) | u64::from(word);
        if word == 0 || word == 3 {
            direction_state ^= 1;
        }
    }
    index_acc
}

/// Inverse of [`hilbert_index`]: the `(x, y)` cell at `index` on a
/// `2^order` square grid.
pub fn hilbert_point(order: u32, index: u64) -> (u32, u32) {
    debug_assert!(order <= MAX_ORDER, "order {order} exceeds {MAX_ORDER}");
    let hwidth = order * 2;
    let mut entry_state = 0;
    let mut direction_state = 0;
    let mut x_coord: u32 = 0;
    let mut y_coord: u32 = 0;
    for step in 0..order {
        // Two bits per step, most significant digit first.
        let word = ((index >> (hwidth - (step * 2) - 2)) & 3) as u32;

        let label = match direction_state {
            0 => rot2(gray2(word)) ^ entry_state,
            _ => gray2(word) ^ entry_state,
        };

        let bit_mask: u32 = 1 << (order - step - 1);

        if (label & 2) != 0 {
            x_coord |= bit_mask;
        }
        if (label & 1) != 0 {
            y_coord |= bit_mask;
        }

        if word == 3 {
            entry_state = 3 - entry_state;
        }
        if word == 0 || word == 3 {
            direction_state ^= 1;
        }
    }
    (x_coord, y_coord)
}
