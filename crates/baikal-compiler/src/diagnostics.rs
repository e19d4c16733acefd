//! Fatal diagnostics
//!
//! Version skew and unknown compiler kinds are build errors: continuing would
//! produce images that load but misbehave. These paths log and abort.

use std::fmt::Display;

/// Write `message` to stderr, log it at error level, and abort the process.
///
/// The stderr line does not depend on the installed subscriber or its filter.
pub fn fatal(message: impl Display) -> ! {
    eprintln!("FATAL: {}", message);
    tracing::error!("{}", message);
    std::process::abort()
}
