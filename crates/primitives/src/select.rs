//! Constant-time conditional selection and swap.
//!
//! # Branch values
//!
//! Both operations take a branch value `br` that must be either all ones
//! (true) or all zeros (false), in any supported width independent of the
//! operand width. Any other pattern is a precondition violation: the result
//! is unspecified but never memory-unsafe. The precondition is not checked,
//! since a check would itself be a branch on the secret.
//!
//! Both operations read only the most significant bit of `br`, so a
//! malformed value such as `0x8000_0000` selects `x` and swaps, while
//! `0x0000_0001` selects `y` and does not swap.

use std::hint::black_box;

use crate::uint::{CtUint, broadcast, msb};

/// Broadcasts the top bit of `br` to a full-width operand mask.
///
/// The mask goes through [`black_box`] so the optimizer cannot rely on it
/// being `0` or `!0` and lower the callers into a branch.
#[inline(always)]
fn branch_mask<B: CtUint, T: CtUint>(br: B) -> T {
    black_box(broadcast::<T>(msb(br)))
}

/// Returns `x` if `br` is true and `y` if `br` is false.
///
/// ```
/// use ct_primitives::ct_select;
///
/// assert_eq!(ct_select(0xffff_ffff_u32, 10u64, 20), 10);
/// assert_eq!(ct_select(0u32, 10u64, 20), 20);
/// ```
#[inline]
pub fn ct_select<B: CtUint, T: CtUint>(br: B, x: T, y: T) -> T {
    let mask = branch_mask::<B, T>(br);
    (x & mask) | (y & !mask)
}

/// Swaps `x` and `y` in place if `br` is true, leaves both untouched if
/// `br` is false.
///
/// ```
/// use ct_primitives::ct_swap;
///
/// let (mut x, mut y) = (3u16, 7u16);
/// ct_swap(u8::MAX, &mut x, &mut y);
/// assert_eq!((x, y), (7, 3));
/// ```
#[inline]
pub fn ct_swap<B: CtUint, T: CtUint>(br: B, x: &mut T, y: &mut T) {
    let mask = branch_mask::<B, T>(br);

    *x = *x ^ (mask & *y);
    *y = *y ^ (mask & *x);
    *x = *x ^ (mask & *y);
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    use super::*;

    const SAMPLES: usize = 1 << 12;

    macro_rules! check_select_swap {
        ($rng:expr, $t:ty, $b:ty) => {
            for _ in 0..SAMPLES {
                let x: $t = $rng.random();
                let y: $t = $rng.random();

                assert_eq!(ct_select(<$b>::MAX, x, y), x);
                assert_eq!(ct_select(<$b>::MIN, x, y), y);

                let (mut a, mut b) = (x, y);
                ct_swap(<$b>::MAX, &mut a, &mut b);
                assert_eq!((a, b), (y, x));
                ct_swap(<$b>::MAX, &mut a, &mut b);
                assert_eq!((a, b), (x, y));
                ct_swap(<$b>::MIN, &mut a, &mut b);
                assert_eq!((a, b), (x, y));
            }
        };
    }

    #[test]
    fn test_select_swap_all_widths() {
        let mut rng = ChaCha20Rng::seed_from_u64(0x5e);
        for_each_result_width!(check_select_swap, rng, u8);
        for_each_result_width!(check_select_swap, rng, u16);
        for_each_result_width!(check_select_swap, rng, u32);
        for_each_result_width!(check_select_swap, rng, u64);
    }

    #[test]
    fn test_select_scenario() {
        assert_eq!(ct_select(0xffff_ffff_u32, 10u32, 20), 10);
        assert_eq!(ct_select(0x0000_0000_u32, 10u32, 20), 20);
    }

    #[test]
    fn test_swap_scenario() {
        let (mut x, mut y) = (3u32, 7u32);
        ct_swap(0xffff_ffff_u32, &mut x, &mut y);
        assert_eq!((x, y), (7, 3));

        let (mut x, mut y) = (3u32, 7u32);
        ct_swap(0x0000_0000_u32, &mut x, &mut y);
        assert_eq!((x, y), (3, 7));
    }

    #[test]
    fn test_swap_equal_operands() {
        let (mut x, mut y) = (0xa5u8, 0xa5u8);
        ct_swap(u64::MAX, &mut x, &mut y);
        assert_eq!((x, y), (0xa5, 0xa5));
    }

    #[test]
    fn test_malformed_branch_follows_msb() {
        assert_eq!(ct_select(0x8000_0000_u32, 1u8, 2), 1);
        assert_eq!(ct_select(0x0000_0001_u32, 1u8, 2), 2);

        let (mut x, mut y) = (1u8, 2u8);
        ct_swap(0x8000_0000_u32, &mut x, &mut y);
        assert_eq!((x, y), (2, 1));

        let (mut x, mut y) = (1u8, 2u8);
        ct_swap(0x0000_0001_u32, &mut x, &mut y);
        assert_eq!((x, y), (1, 2));
    }
}
