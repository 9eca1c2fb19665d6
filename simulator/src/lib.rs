//! # LC-3 Simulator
//!
//! A cycle-accurate instruction-set simulator for the LC-3 educational
//! computer: memory with memory-mapped I/O, an eight-register file with
//! shadow stack pointers, the processor status register, the fetch-decode-
//! execute loop, and debugger-style stepping with an inspection API.
//!
//! ## Layers
//!
//! - [`memory`] / [`registers`] / [`psr`] / [`interrupts`] / [`breakpoints`] -
//!   the state the simulated machine owns.
//! - [`os`] - the hand-assembled built-in service routines.
//! - [`cpu`] - the fetch-decode-execute loop, one cycle at a time.
//! - [`debugger`] - `run`/`stepIn`/`stepOver`/`stepOut`, the inspection API,
//!   and the four reset modes, wrapping [`cpu::Cpu`].
//! - [`sink`] - the diagnostic output boundary.

pub mod breakpoints;
pub mod cpu;
pub mod debugger;
pub mod error;
pub mod interrupts;
pub mod memory;
pub mod os;
pub mod psr;
pub mod registers;
pub mod sink;

pub use cpu::Cpu;
pub use debugger::{Simulator, StopReason};
