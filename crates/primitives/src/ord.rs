//! Constant-time ordering.
//!
//! [`ct_le`] is the only leaf here. The other three are mask algebra on top
//! of it and [`ct_eq`], never native comparisons.

use crate::eq::ct_eq;
use crate::uint::{CtUint, broadcast};

/// OR-propagates every set bit of `v` into all lower positions.
///
/// Uses doubling shifts (1, 2, 4, ...) so the work depends only on the width.
#[inline(always)]
fn smear_right<T: CtUint>(mut v: T) -> T {
    let mut shift = 1;
    while shift < T::BITS {
        v = v | (v >> shift);
        shift += shift;
    }
    v
}

/// Returns the true mask if `x <= y`, the false mask otherwise.
///
/// After smearing, bit `i` of `lt_bits` is set iff `y` wins some position at
/// or above `i`. A position where `x` wins survives `gt_bits & !lt_bits`
/// only if it is the most significant difference, so the smeared survivor
/// reaching bit zero means `x > y`.
///
/// ```
/// use ct_primitives::ct_le;
///
/// assert_eq!(ct_le::<u8, u8>(5, 200), 0xff);
/// assert_eq!(ct_le::<u8, u8>(200, 5), 0x00);
/// ```
#[inline]
pub fn ct_le<T: CtUint, R: CtUint>(x: T, y: T) -> R {
    let gt_bits = x & !y;
    let lt_bits = smear_right(!x & y);
    let bit = smear_right(gt_bits & !lt_bits);

    broadcast::<R>(bit.low_bit() ^ 1)
}

/// Returns the true mask if `x > y`, the false mask otherwise.
#[inline]
pub fn ct_gt<T: CtUint, R: CtUint>(x: T, y: T) -> R {
    !ct_le::<T, R>(x, y)
}

/// Returns the true mask if `x >= y`, the false mask otherwise.
#[inline]
pub fn ct_ge<T: CtUint, R: CtUint>(x: T, y: T) -> R {
    ct_gt::<T, R>(x, y) | ct_eq::<T, R>(x, y)
}

/// Returns the true mask if `x < y`, the false mask otherwise.
#[inline]
pub fn ct_lt<T: CtUint, R: CtUint>(x: T, y: T) -> R {
    !ct_ge::<T, R>(x, y)
}
