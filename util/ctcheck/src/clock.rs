//! Cycle-resolution timestamps for the timing test.

#[cfg(target_arch = "x86_64")]
mod x86_64 {
    use std::arch::x86_64::{_mm_lfence, _rdtsc};

    /// Reads the time-stamp counter, fenced so earlier loads retire first.
    #[inline(always)]
    pub(crate) fn now() -> u64 {
        unsafe {
            _mm_lfence();
            let t = _rdtsc();
            _mm_lfence();
            t
        }
    }
}

#[cfg(not(target_arch = "x86_64"))]
mod fallback {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();

    /// Nanoseconds since the first call.
    #[inline(always)]
    pub(crate) fn now() -> u64 {
        START.get_or_init(Instant::now).elapsed().as_nanos() as u64
    }
}

#[cfg(target_arch = "x86_64")]
pub(crate) use x86_64::now;

#[cfg(not(target_arch = "x86_64"))]
pub(crate) use fallback::now;

/// Unit reported alongside measurements.
pub(crate) const UNIT: &str = if cfg!(target_arch = "x86_64") { "cycles" } else { "ns" };
