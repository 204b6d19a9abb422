//! Branchless comparison and selection over fixed-width unsigned integers.
//!
//! Every operation is generic over an operand width and, independently, a
//! result or branch width, both drawn from `u8`, `u16`, `u32` and `u64`:
//!
//! ```
//! use ct_primitives::{ct_eq, ct_lt, ct_select};
//!
//! let eq: u32 = ct_eq::<u8, u32>(0x2b, 0x2b);
//! let lt = ct_lt::<u64, u8>(5, 200);
//! assert_eq!(ct_select(eq, 1u16, 2), 1);
//! assert_eq!(lt, 0xff);
//! ```
//!
//! Results are truth masks: all bits set for true, all bits clear for false.
//!
//! # Timing
//!
//! The source contains no branches or table lookups that depend on operand
//! values. That is a property of the source only. An optimizing compiler may
//! still prove a formula equivalent to a branch and emit one; use the
//! `ctcheck` tool to inspect the generated code on each target.

// Runs `$check!($rng, $t, R)` once for every supported result width `R`.
#[cfg(test)]
macro_rules! for_each_result_width {
    ($check:ident, $rng:expr, $t:ty) => {
        $check!($rng, $t, u8);
        $check!($rng, $t, u16);
        $check!($rng, $t, u32);
        $check!($rng, $t, u64);
    };
}

mod bytes;
mod eq;
mod error;
mod ord;
mod select;
mod uint;

pub use bytes::{ct_compare, ct_copy, ct_swap_slices};
pub use eq::{ct_eq, ct_ne};
pub use error::LengthMismatch;
pub use ord::{ct_ge, ct_gt, ct_le, ct_lt};
pub use select::{ct_select, ct_swap};
pub use uint::CtUint;
