//! Error types for the simulator crate.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("register index {0} out of range (expected 0..=7)")]
    InvalidRegister(u8),
    #[error("breakpoint at x{0:04X} already set")]
    DuplicateBreakpoint(u16),
}
