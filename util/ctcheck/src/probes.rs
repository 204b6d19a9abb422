//! Exported, non-inlined instances of every primitive.
//!
//! Each probe is a monomorphic copy of one (operation, width) pair with a
//! stable symbol name, so its machine code can be located in a disassembly
//! and timed through a plain function call. Comparison probes use a `u32`
//! mask and selection probes a `u32` branch value.

use ct_primitives::{ct_eq, ct_ge, ct_gt, ct_le, ct_lt, ct_ne, ct_select, ct_swap};

use crate::cli::{Op, Width};

/// Symbol prefix shared by all probes.
pub(crate) const PROBE_PREFIX: &str = "ctcheck_probe_";

macro_rules! cmp_probe {
    ($name:ident, $f:ident, $t:ty) => {
        #[unsafe(no_mangle)]
        #[inline(never)]
        pub(crate) extern "C" fn $name(x: $t, y: $t) -> u32 {
            $f::<$t, u32>(x, y)
        }
    };
}

macro_rules! select_probe {
    ($name:ident, $t:ty) => {
        #[unsafe(no_mangle)]
        #[inline(never)]
        pub(crate) extern "C" fn $name(br: u32, x: $t, y: $t) -> $t {
            ct_select(br, x, y)
        }
    };
}

macro_rules! swap_probe {
    ($name:ident, $t:ty) => {
        #[unsafe(no_mangle)]
        #[inline(never)]
        pub(crate) extern "C" fn $name(br: u32, x: &mut $t, y: &mut $t) {
            ct_swap(br, x, y)
        }
    };
}

cmp_probe!(ctcheck_probe_eq_u8, ct_eq, u8);
cmp_probe!(ctcheck_probe_eq_u16, ct_eq, u16);
cmp_probe!(ctcheck_probe_eq_u32, ct_eq, u32);
cmp_probe!(ctcheck_probe_eq_u64, ct_eq, u64);
cmp_probe!(ctcheck_probe_ne_u8, ct_ne, u8);
cmp_probe!(ctcheck_probe_ne_u16, ct_ne, u16);
cmp_probe!(ctcheck_probe_ne_u32, ct_ne, u32);
cmp_probe!(ctcheck_probe_ne_u64, ct_ne, u64);
cmp_probe!(ctcheck_probe_le_u8, ct_le, u8);
cmp_probe!(ctcheck_probe_le_u16, ct_le, u16);
cmp_probe!(ctcheck_probe_le_u32, ct_le, u32);
cmp_probe!(ctcheck_probe_le_u64, ct_le, u64);
cmp_probe!(ctcheck_probe_gt_u8, ct_gt, u8);
cmp_probe!(ctcheck_probe_gt_u16, ct_gt, u16);
cmp_probe!(ctcheck_probe_gt_u32, ct_gt, u32);
cmp_probe!(ctcheck_probe_gt_u64, ct_gt, u64);
cmp_probe!(ctcheck_probe_ge_u8, ct_ge, u8);
cmp_probe!(ctcheck_probe_ge_u16, ct_ge, u16);
cmp_probe!(ctcheck_probe_ge_u32, ct_ge, u32);
cmp_probe!(ctcheck_probe_ge_u64, ct_ge, u64);
cmp_probe!(ctcheck_probe_lt_u8, ct_lt, u8);
cmp_probe!(ctcheck_probe_lt_u16, ct_lt, u16);
cmp_probe!(ctcheck_probe_lt_u32, ct_lt, u32);
cmp_probe!(ctcheck_probe_lt_u64, ct_lt, u64);
select_probe!(ctcheck_probe_select_u8, u8);
select_probe!(ctcheck_probe_select_u16, u16);
select_probe!(ctcheck_probe_select_u32, u32);
select_probe!(ctcheck_probe_select_u64, u64);
swap_probe!(ctcheck_probe_swap_u8, u8);
swap_probe!(ctcheck_probe_swap_u16, u16);
swap_probe!(ctcheck_probe_swap_u32, u32);
swap_probe!(ctcheck_probe_swap_u64, u64);

/// A probe together with a width-erased way to call it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Probe {
    pub(crate) name: &'static str,
    pub(crate) op: Op,
    pub(crate) width: Width,
    /// Calls the probe with `(branch, x, y)` truncated to the probe's types.
    /// Comparisons ignore the branch. Swap returns the new `x`.
    pub(crate) call: fn(u64, u64, u64) -> u64,
}

macro_rules! probe_entry {
    (cmp $op:ident, $w:ident, $t:ty, $f:ident) => {
        Probe {
            name: stringify!($f),
            op: Op::$op,
            width: Width::$w,
            call: |_: u64, x: u64, y: u64| $f(x as $t, y as $t) as u64,
        }
    };
    (select $w:ident, $t:ty, $f:ident) => {
        Probe {
            name: stringify!($f),
            op: Op::Select,
            width: Width::$w,
            call: |br: u64, x: u64, y: u64| $f(br as u32, x as $t, y as $t) as u64,
        }
    };
    (swap $w:ident, $t:ty, $f:ident) => {
        Probe {
            name: stringify!($f),
            op: Op::Swap,
            width: Width::$w,
            call: |br: u64, x: u64, y: u64| {
                let (mut a, mut b) = (x as $t, y as $t);
                $f(br as u32, &mut a, &mut b);
                a as u64
            },
        }
    };
}

/// Every exported probe, in a stable order.
pub(crate) static PROBES: &[Probe] = &[
    probe_entry!(cmp Eq, W8, u8, ctcheck_probe_eq_u8),
    probe_entry!(cmp Eq, W16, u16, ctcheck_probe_eq_u16),
    probe_entry!(cmp Eq, W32, u32, ctcheck_probe_eq_u32),
    probe_entry!(cmp Eq, W64, u64, ctcheck_probe_eq_u64),
    probe_entry!(cmp Ne, W8, u8, ctcheck_probe_ne_u8),
    probe_entry!(cmp Ne, W16, u16, ctcheck_probe_ne_u16),
    probe_entry!(cmp Ne, W32, u32, ctcheck_probe_ne_u32),
    probe_entry!(cmp Ne, W64, u64, ctcheck_probe_ne_u64),
    probe_entry!(cmp Le, W8, u8, ctcheck_probe_le_u8),
    probe_entry!(cmp Le, W16, u16, ctcheck_probe_le_u16),
    probe_entry!(cmp Le, W32, u32, ctcheck_probe_le_u32),
    probe_entry!(cmp Le, W64, u64, ctcheck_probe_le_u64),
    probe_entry!(cmp Gt, W8, u8, ctcheck_probe_gt_u8),
    probe_entry!(cmp Gt, W16, u16, ctcheck_probe_gt_u16),
    probe_entry!(cmp Gt, W32, u32, ctcheck_probe_gt_u32),
    probe_entry!(cmp Gt, W64, u64, ctcheck_probe_gt_u64),
    probe_entry!(cmp Ge, W8, u8, ctcheck_probe_ge_u8),
    probe_entry!(cmp Ge, W16, u16, ctcheck_probe_ge_u16),
    probe_entry!(cmp Ge, W32, u32, ctcheck_probe_ge_u32),
    probe_entry!(cmp Ge, W64, u64, ctcheck_probe_ge_u64),
    probe_entry!(cmp Lt, W8, u8, ctcheck_probe_lt_u8),
    probe_entry!(cmp Lt, W16, u16, ctcheck_probe_lt_u16),
    probe_entry!(cmp Lt, W32, u32, ctcheck_probe_lt_u32),
    probe_entry!(cmp Lt, W64, u64, ctcheck_probe_lt_u64),
    probe_entry!(select W8, u8, ctcheck_probe_select_u8),
    probe_entry!(select W16, u16, ctcheck_probe_select_u16),
    probe_entry!(select W32, u32, ctcheck_probe_select_u32),
    probe_entry!(select W64, u64, ctcheck_probe_select_u64),
    probe_entry!(swap W8, u8, ctcheck_probe_swap_u8),
    probe_entry!(swap W16, u16, ctcheck_probe_swap_u16),
    probe_entry!(swap W32, u32, ctcheck_probe_swap_u32),
    probe_entry!(swap W64, u64, ctcheck_probe_swap_u64),
];

/// Probes matching the optional operation and width filters.
pub(crate) fn select(
    op: Option<Op>,
    width: Option<Width>,
) -> impl Iterator<Item = &'static Probe> {
    PROBES
        .iter()
        .filter(move |p| op.is_none_or(|op| p.op == op))
        .filter(move |p| width.is_none_or(|w| p.width == w))
}
