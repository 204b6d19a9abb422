//! Constant-time equality and inequality.

use crate::uint::{CtUint, msb};

/// Returns the true mask if `x == y`, the false mask otherwise.
///
/// `x ^ y` is zero exactly when the operands match. For any nonzero `a`,
/// one of `a` and `-a` has its top bit set, so the top bit of `a | -a` is the
/// "differs" bit. Subtracting one from that bit in the result width turns
/// `0` into all ones and `1` into zero.
///
/// ```
/// use ct_primitives::ct_eq;
///
/// assert_eq!(ct_eq::<u8, u32>(200, 200), u32::MAX);
/// assert_eq!(ct_eq::<u64, u8>(1, 2), 0);
/// ```
#[inline]
pub fn ct_eq<T: CtUint, R: CtUint>(x: T, y: T) -> R {
    let a = x ^ y;
    let b = a | a.wrapping_neg();
    R::from_bit(msb(b)).wrapping_sub(R::ONE)
}

/// Returns the true mask if `x != y`, the false mask otherwise.
#[inline]
pub fn ct_ne<T: CtUint, R: CtUint>(x: T, y: T) -> R {
    !ct_eq::<T, R>(x, y)
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    use super::*;

    const SAMPLES: usize = 1 << 14;

    fn expect<R: CtUint>(cond: bool) -> R {
        if cond { R::MAX } else { R::ZERO }
    }

    fn check_exhaustive_u8<R: CtUint>() {
        for x in 0..=u8::MAX {
            for y in 0..=u8::MAX {
                let eq = ct_eq::<u8, R>(x, y);
                assert_eq!(eq, expect::<R>(x == y), "ct_eq({x}, {y})");
                assert_eq!(ct_ne::<u8, R>(x, y), !eq, "ct_ne({x}, {y})");
            }
        }
    }

    macro_rules! check_sampled {
        ($rng:expr, $t:ty, $r:ty) => {
            for _ in 0..SAMPLES {
                let x: $t = $rng.random();
                let y: $t = $rng.random();
                assert_eq!(ct_eq::<$t, $r>(x, y), expect::<$r>(x == y));
                assert_eq!(ct_eq::<$t, $r>(x, x), <$r>::MAX);
                assert_eq!(ct_ne::<$t, $r>(y, y), 0);
                assert_eq!(ct_ne::<$t, $r>(x, y), !ct_eq::<$t, $r>(x, y));
            }
        };
    }

    #[test]
    fn test_eq_exhaustive_u8() {
        check_exhaustive_u8::<u8>();
        check_exhaustive_u8::<u16>();
        check_exhaustive_u8::<u32>();
        check_exhaustive_u8::<u64>();
    }

    #[test]
    fn test_eq_sampled_wide() {
        let mut rng = ChaCha20Rng::seed_from_u64(0xe9);
        for_each_result_width!(check_sampled, rng, u16);
        for_each_result_width!(check_sampled, rng, u32);
        for_each_result_width!(check_sampled, rng, u64);
    }

    #[test]
    fn test_eq_extremes() {
        assert_eq!(ct_eq::<u64, u64>(0, 0), u64::MAX);
        assert_eq!(ct_eq::<u64, u64>(u64::MAX, u64::MAX), u64::MAX);
        assert_eq!(ct_eq::<u64, u64>(0, u64::MAX), 0);
        assert_eq!(ct_eq::<u32, u8>(0x8000_0000, 0), 0);
        assert_eq!(ct_eq::<u16, u8>(1, 0), 0);
    }

    #[test]
    fn test_eq_scenario() {
        assert_eq!(ct_eq::<u8, u8>(200, 200), 0xff);
        assert_eq!(ct_ne::<u8, u8>(200, 200), 0x00);
        assert_eq!(ct_eq::<u8, u8>(5, 200), 0x00);
        assert_eq!(ct_ne::<u8, u8>(5, 200), 0xff);
    }
}
