//! Error types for the slice helpers.

use thiserror::Error;

/// Two slices that must have equal length did not.
///
/// Lengths are treated as public, so reporting them leaks nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("slice length mismatch: {left} != {right}")]
pub struct LengthMismatch {
    /// Length of the first slice argument.
    pub left: usize,
    /// Length of the second slice argument.
    pub right: usize,
}

impl LengthMismatch {
    /// Returns `Ok(())` for equal lengths, the mismatch otherwise.
    pub(crate) fn check(left: usize, right: usize) -> Result<(), Self> {
        if left != right {
            return Err(Self { left, right });
        }
        Ok(())
    }
}
