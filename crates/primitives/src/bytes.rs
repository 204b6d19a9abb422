//! Slice helpers built on the scalar primitives.
//!
//! These visit every element regardless of content. Slice lengths are
//! treated as public and compared with ordinary branches.

use crate::eq::ct_eq;
use crate::error::LengthMismatch;
use crate::select::{ct_select, ct_swap};
use crate::uint::CtUint;

/// Compares two byte strings, returning the true mask if they are identical.
///
/// Returns the false mask immediately if the lengths differ. Otherwise every
/// byte pair is folded into an all-ones accumulator, so a mismatch anywhere
/// clears the result without shortening the loop.
///
/// ```
/// use ct_primitives::ct_compare;
///
/// assert_eq!(ct_compare::<u32>(b"tag", b"tag"), u32::MAX);
/// assert_eq!(ct_compare::<u32>(b"tag", b"taG"), 0);
/// ```
pub fn ct_compare<R: CtUint>(a: &[u8], b: &[u8]) -> R {
    if a.len() != b.len() {
        return R::ZERO;
    }

    a.iter()
        .zip(b)
        .fold(R::MAX, |acc, (&x, &y)| acc & ct_eq::<u8, R>(x, y))
}

/// Overwrites `dst` with `src` if `br` is true, leaves `dst` as is if `br`
/// is false.
///
/// `br` follows the same precondition as [`ct_select`]. `dst` is not touched
/// when the lengths differ.
pub fn ct_copy<B: CtUint, T: CtUint>(
    br: B,
    src: &[T],
    dst: &mut [T],
) -> Result<(), LengthMismatch> {
    LengthMismatch::check(src.len(), dst.len())?;

    for (d, &s) in dst.iter_mut().zip(src) {
        *d = ct_select(br, s, *d);
    }
    Ok(())
}

/// Swaps `a` and `b` element-wise if `br` is true.
pub fn ct_swap_slices<B: CtUint, T: CtUint>(
    br: B,
    a: &mut [T],
    b: &mut [T],
) -> Result<(), LengthMismatch> {
    LengthMismatch::check(a.len(), b.len())?;

    for (x, y) in a.iter_mut().zip(b.iter_mut()) {
        ct_swap(br, x, y);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    const TAG_A: [u8; 16] = hex!("2b7e151628aed2a6abf7158809cf4f3c");
    const TAG_B: [u8; 16] = hex!("3d80477d4716fe3e1e237e446d7a883b");

    #[test]
    fn test_compare_equal() {
        assert_eq!(ct_compare::<u32>(&TAG_A, &TAG_A), u32::MAX);
        assert_eq!(ct_compare::<u8>(&TAG_B, &TAG_B), u8::MAX);
    }

    #[test]
    fn test_compare_empty() {
        assert_eq!(ct_compare::<u64>(&[], &[]), u64::MAX);
    }

    #[test]
    fn test_compare_different() {
        assert_eq!(ct_compare::<u32>(&TAG_A, &TAG_B), 0);
    }

    #[test]
    fn test_compare_single_flip_anywhere() {
        for i in 0..TAG_A.len() {
            for bit in 0..8 {
                let mut other = TAG_A;
                other[i] ^= 1 << bit;
                assert_eq!(ct_compare::<u16>(&TAG_A, &other), 0, "byte {i} bit {bit}");
            }
        }
    }

    #[test]
    fn test_compare_length_mismatch() {
        assert_eq!(ct_compare::<u32>(&TAG_A, &TAG_A[..15]), 0);
        assert_eq!(ct_compare::<u32>(&[], &TAG_A), 0);
    }

    #[test]
    fn test_copy() {
        let mut dst = TAG_B;
        ct_copy(0u32, &TAG_A, &mut dst).unwrap();
        assert_eq!(dst, TAG_B);

        ct_copy(u32::MAX, &TAG_A, &mut dst).unwrap();
        assert_eq!(dst, TAG_A);
    }

    #[test]
    fn test_copy_wide_elements() {
        let src = [1u64, 2, 3];
        let mut dst = [7u64, 8, 9];
        ct_copy(u8::MAX, &src, &mut dst).unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn test_copy_length_mismatch_leaves_dst() {
        let mut dst = [0u8; 4];
        let err = ct_copy(u32::MAX, &TAG_A, &mut dst).unwrap_err();
        assert_eq!(err, LengthMismatch { left: 16, right: 4 });
        assert_eq!(err.to_string(), "slice length mismatch: 16 != 4");
        assert_eq!(dst, [0u8; 4]);
    }

    #[test]
    fn test_swap_slices() {
        let mut a = TAG_A;
        let mut b = TAG_B;

        ct_swap_slices(0u16, &mut a, &mut b).unwrap();
        assert_eq!((a, b), (TAG_A, TAG_B));

        ct_swap_slices(u16::MAX, &mut a, &mut b).unwrap();
        assert_eq!((a, b), (TAG_B, TAG_A));
    }

    #[test]
    fn test_swap_slices_length_mismatch() {
        let mut a = [1u32, 2];
        let mut b = [3u32];
        assert!(ct_swap_slices(u32::MAX, &mut a, &mut b).is_err());
        assert_eq!(a, [1, 2]);
        assert_eq!(b, [3]);
    }
}
