//! # Debugger-style operations and inspection API
//!
//! [`Simulator`] owns the [`Cpu`], the breakpoint set, the source map, and
//! the sinks, and exposes exactly the surface a UI needs (§4.2.4, §4.2.5):
//! run/step, get/set state, and the four reset modes (§4.2.6). Nothing
//! outside this module mutates CPU state directly — shared resources are
//! only ever touched through these methods, matching §5's "the UI mutates
//! them only through the inspection API."

use std::collections::HashMap;

use rand::Rng;

use crate::breakpoints::BreakpointSet;
use crate::cpu::Cpu;
use crate::error::SimError;
use crate::memory::DisplaySink;
use crate::psr::Psr;

/// Why a `run`/`stepOver`/`stepOut` loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    ClockDisabled,
    Breakpoint,
    /// `stepIn`/`stepOver`/`stepOut` completed their one logical unit of work.
    Completed,
}

/// A formatted memory row for the UI: `[hexAddr, hexVal, decVal, sourceText]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRow {
    pub addr: u16,
    pub hex_value: String,
    pub dec_value: i16,
    pub source_text: Option<String>,
}

pub struct Simulator<D: DisplaySink> {
    cpu: Cpu,
    breakpoints: BreakpointSet,
    /// Address -> source line, populated only for instructions (§3 "Source map").
    source_map: HashMap<u16, usize>,
    display: D,
    /// The last-loaded image, kept for `reload`/`restart` (§4.2.6).
    image_origin: u16,
    image_words: Vec<u16>,
}

/// Is the instruction about to execute a call (`JSR`/`JSRR`/`TRAP`)? Used
/// only to decide whether `stepOver` should behave like `stepIn` or needs
/// to track depth; depth *changes* during the loop come from the actual
/// executed-instruction outcome, not from re-peeking (§4.2.4).
fn is_call_instruction(word: u16) -> bool {
    matches!(word >> 12, 0b0100 | 0b1111)
}

impl<D: DisplaySink> Simulator<D> {
    pub fn new(display: D) -> Self {
        Self {
            cpu: Cpu::new(),
            breakpoints: BreakpointSet::new(),
            source_map: HashMap::new(),
            display,
            image_origin: 0x3000,
            image_words: Vec::new(),
        }
    }

    /// Load an object image (§3 "Object image": word 0 is origin, words
    /// 1..N are the program) and perform a `reload` reset.
    pub fn load_image(&mut self, words: &[u16], source_map: HashMap<u16, usize>) {
        let origin = words.first().copied().unwrap_or(0);
        let program = if words.is_empty() { &[][..] } else { &words[1..] };
        self.image_origin = origin;
        self.image_words = program.to_vec();
        self.source_map = source_map;
        self.reload();
    }

    // ---- Reset modes (§4.2.6) ----

    /// Copy the object image into memory at origin, reset PC to origin,
    /// restore default PSR.
    pub fn reload(&mut self) {
        self.cpu.memory.load_image(self.image_origin, &self.image_words);
        self.cpu.pc = self.image_origin;
        self.cpu.psr = Psr::default_reset();
        self.cpu.registers.saved_ssp = 0x3000;
        self.cpu.registers.saved_usp = 0;
    }

    /// Reset PC to origin only; memory and PSR untouched.
    pub fn restart(&mut self) {
        self.cpu.pc = self.image_origin;
    }

    /// Zero all memory, then reload the built-in OS region.
    pub fn reset_memory(&mut self) {
        self.cpu.memory.zero();
        crate::os::install(&mut self.cpu.memory);
    }

    /// Fill all memory with uniformly random words, then reload the
    /// built-in OS region (overwriting the random fill in `0x0000..0x02FF`).
    pub fn randomize_memory(&mut self) {
        let mut rng = rand::thread_rng();
        for addr in 0u32..=0xFFFF {
            self.cpu.memory.poke(addr as u16, rng.gen());
        }
        crate::os::install(&mut self.cpu.memory);
    }

    // ---- Debugger operations (§4.2.4) ----

    pub fn run(&mut self) -> StopReason {
        self.cpu.memory.set_clock_enabled(true);
        loop {
            if !self.cpu.memory.clock_enabled() {
                return StopReason::ClockDisabled;
            }
            self.cpu.step(&mut self.display);
            if !self.cpu.memory.clock_enabled() {
                return StopReason::ClockDisabled;
            }
            if self.breakpoints.contains(self.cpu.pc) {
                return StopReason::Breakpoint;
            }
        }
    }

    pub fn step_in(&mut self) -> StopReason {
        self.cpu.memory.set_clock_enabled(true);
        self.cpu.step(&mut self.display);
        StopReason::Completed
    }

    pub fn step_over(&mut self) -> StopReason {
        self.cpu.memory.set_clock_enabled(true);
        let entering_call = is_call_instruction(self.cpu.peek_next_instruction());
        if !entering_call {
            self.cpu.step(&mut self.display);
            return StopReason::Completed;
        }
        self.run_until_depth_zero()
    }

    pub fn step_out(&mut self) -> StopReason {
        self.cpu.memory.set_clock_enabled(true);
        self.run_until_depth_zero()
    }

    fn run_until_depth_zero(&mut self) -> StopReason {
        let mut depth: i32 = 0;
        loop {
            if !self.cpu.memory.clock_enabled() {
                return StopReason::ClockDisabled;
            }
            let outcome = self.cpu.step(&mut self.display);
            depth += outcome.depth_delta();
            if !self.cpu.memory.clock_enabled() {
                return StopReason::ClockDisabled;
            }
            if self.breakpoints.contains(self.cpu.pc) {
                return StopReason::Breakpoint;
            }
            if depth <= 0 {
                return StopReason::Completed;
            }
        }
    }

    // ---- Inspection/mutation API (§4.2.5) ----

    pub fn get_word(&self, addr: u16) -> u16 {
        self.cpu.memory.peek(addr)
    }

    pub fn set_word(&mut self, addr: u16, value: u16) {
        self.cpu.memory.poke(addr, value);
    }

    pub fn get_register(&self, index: u8) -> Result<u16, SimError> {
        self.cpu.registers.get(index)
    }

    pub fn set_register(&mut self, index: u8, value: u16) -> Result<(), SimError> {
        self.cpu.registers.set(index, value)
    }

    pub fn get_pc(&self) -> u16 {
        self.cpu.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.cpu.pc = pc;
    }

    pub fn get_psr(&self) -> u16 {
        self.cpu.psr.encode()
    }

    pub fn set_psr(&mut self, word: u16) {
        self.cpu.psr = Psr::decode(word);
    }

    /// Format `[start, start+count)` as `[hexAddr, hexVal, decVal, sourceText]`
    /// rows for the UI.
    pub fn format_range(&self, start: u16, count: u16) -> Vec<MemoryRow> {
        (0..count)
            .map(|i| {
                let addr = start.wrapping_add(i);
                let value = self.cpu.memory.peek(addr);
                MemoryRow {
                    addr,
                    hex_value: format!("x{:04X}", value),
                    dec_value: value as i16,
                    source_text: self.source_map.get(&addr).map(|line| line.to_string()),
                }
            })
            .collect()
    }

    pub fn add_breakpoint(&mut self, addr: u16) -> Result<(), SimError> {
        self.breakpoints.add(addr)
    }

    pub fn remove_breakpoint(&mut self, addr: u16) {
        self.breakpoints.remove(addr);
    }

    pub fn clear_breakpoints(&mut self) {
        self.breakpoints.clear();
    }

    pub fn breakpoints(&self) -> impl Iterator<Item = u16> + '_ {
        self.breakpoints.iter()
    }

    /// Latch a keyboard byte and raise the interrupt latch if eligible
    /// (§4.2.5). Safe to call between cycles only (§5 "Suspension points").
    pub fn keyboard_interrupt(&mut self, ascii: u8) {
        self.cpu.keyboard_interrupt(ascii);
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }
}
