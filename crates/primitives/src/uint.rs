//! Width capability shared by every primitive.
//!
//! All operations in this crate are generic over [`CtUint`], which is
//! implemented for exactly `u8`, `u16`, `u32` and `u64`. Operand width and
//! result/mask width are chosen independently at the call site.

use std::fmt::Debug;
use std::ops::{BitAnd, BitOr, BitXor, Not, Shr};

mod sealed {
    pub trait Sealed {}
}

/// Unsigned fixed-width integer usable as an operand, a truth mask or a
/// branch value.
///
/// A truth mask uses the all-bits convention: [`CtUint::MAX`] is true and
/// [`CtUint::ZERO`] is false. Partially set values are not truth values.
///
/// This trait is sealed.
pub trait CtUint:
    sealed::Sealed
    + Copy
    + Eq
    + Debug
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + Shr<u32, Output = Self>
{
    /// Width in bits.
    const BITS: u32;
    /// All bits clear, the false truth value.
    const ZERO: Self;
    /// The value one.
    const ONE: Self;
    /// All bits set, the true truth value.
    const MAX: Self;

    /// Two's-complement negation modulo `2^BITS`.
    fn wrapping_neg(self) -> Self;

    /// Subtraction modulo `2^BITS`.
    fn wrapping_sub(self, rhs: Self) -> Self;

    /// Returns bit zero as `0` or `1`.
    fn low_bit(self) -> u8;

    /// Builds `0` or `1` from bit zero of `bit`; higher bits are dropped.
    fn from_bit(bit: u8) -> Self;
}

macro_rules! impl_ct_uint {
    ($($t:ty),*) => {
        $(
            impl sealed::Sealed for $t {}

            impl CtUint for $t {
                const BITS: u32 = <$t>::BITS;
                const ZERO: Self = 0;
                const ONE: Self = 1;
                const MAX: Self = <$t>::MAX;

                #[inline(always)]
                fn wrapping_neg(self) -> Self {
                    <$t>::wrapping_neg(self)
                }

                #[inline(always)]
                fn wrapping_sub(self, rhs: Self) -> Self {
                    <$t>::wrapping_sub(self, rhs)
                }

                #[inline(always)]
                fn low_bit(self) -> u8 {
                    (self & 1) as u8
                }

                #[inline(always)]
                fn from_bit(bit: u8) -> Self {
                    (bit & 1) as $t
                }
            }
        )*
    };
}

impl_ct_uint!(u8, u16, u32, u64);

/// Moves the most significant bit of `v` into bit zero.
#[inline(always)]
pub(crate) fn msb<T: CtUint>(v: T) -> u8 {
    (v >> (T::BITS - 1)).low_bit()
}

/// Widens a `0`/`1` bit into an all-zeros/all-ones mask of width `T`.
#[inline(always)]
pub(crate) fn broadcast<T: CtUint>(bit: u8) -> T {
    T::from_bit(bit).wrapping_neg()
}
