//! Method size limits
//!
//! Bytecode uses 16-bit counts for instructions and registers. The optimizer
//! accepts a quarter of that range, or half when the knob is set, which keeps
//! its 16-bit internal SSA name space from overflowing.

use crate::knob;

/// Maximum tolerated instruction and register counts (exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SizeLimits {
    /// Instruction limit in code units
    pub max_insns: u32,
    /// Virtual register limit
    pub max_regs: u32,
}

impl SizeLimits {
    /// Limits with the knob unset: 16383 each
    pub const DEFAULT: SizeLimits = SizeLimits::for_knob(false);

    /// Limits with the knob set: 32767 each
    pub const INCREASED: SizeLimits = SizeLimits::for_knob(true);

    /// Limits for a given knob value
    pub const fn for_knob(increase_max_method_size: bool) -> Self {
        let divisor = if increase_max_method_size { 2 } else { 4 };
        let limit = u16::MAX as u32 / divisor;
        SizeLimits {
            max_insns: limit,
            max_regs: limit,
        }
    }

    /// Limits for the process-wide knob
    pub fn current() -> Self {
        Self::for_knob(knob::increase_max_method_size())
    }
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        assert_eq!(SizeLimits::DEFAULT, SizeLimits { max_insns: 16383, max_regs: 16383 });
        assert_eq!(SizeLimits::default(), SizeLimits::DEFAULT);
    }

    #[test]
    fn test_increased_limits() {
        assert_eq!(SizeLimits::INCREASED, SizeLimits { max_insns: 32767, max_regs: 32767 });
    }

    #[test]
    fn test_limits_below_encoding_limit() {
        for limits in [SizeLimits::DEFAULT, SizeLimits::INCREASED] {
            assert!(limits.max_insns < 65536);
            assert!(limits.max_regs < 65536);
        }
    }
}
