//! # Diagnostic sink
//!
//! The simulator's only I/O boundary for human-readable output (§1, §6.5):
//! assembly diagnostics, `Assembly successful.`, and anything else meant
//! for a human rather than the simulated machine. Keeping this behind a
//! trait, rather than scattering `println!`/`eprintln!`, is what lets the
//! TUI debugger capture the same messages a headless run would print.

use std::io::Write;

use crate::memory::DisplaySink;

pub trait DiagnosticSink {
    fn diagnostic(&mut self, message: &str);
}

#[derive(Debug, Default)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn diagnostic(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

/// Collects diagnostics in memory, for tests and the TUI's scrollback pane.
#[derive(Debug, Default)]
pub struct BufferingSink {
    pub messages: Vec<String>,
}

impl DiagnosticSink for BufferingSink {
    fn diagnostic(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

/// The CLI debugger's default outside the TUI: diagnostics to stderr,
/// simulated-machine output written straight to stdout as `DDR` is hit.
///
/// Unlike `BufferingDisplaySink`, bytes reach the terminal as the simulated
/// program writes them rather than being collected for a final print, which
/// matters for `IN`/`GETC` programs that prompt before reading.
#[derive(Debug, Default)]
pub struct StdIoSink;

impl DiagnosticSink for StdIoSink {
    fn diagnostic(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

impl DisplaySink for StdIoSink {
    fn emit_byte(&mut self, byte: u8) {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        let _ = handle.write_all(&[byte]);
        let _ = handle.flush();
    }
}
