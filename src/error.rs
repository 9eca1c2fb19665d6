//! # Diagnostics
//!
//! Error types shared by every assembler stage (lexer, parser, first pass,
//! encoder). Each diagnostic carries enough context — a [`Span`] and a human
//! message — to be rendered as `<file>:<line>: <message>` by the caller, which
//! has access to the original source text and file name that `AsmError` itself
//! does not keep.

use thiserror::Error;

/// A location in the original source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub col: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, col: usize) -> Self {
        Self { start, end, line, col }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("ERROR (line {}:{}): {}", span.line, span.col, message)]
pub struct AsmError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnterminatedString,
    InvalidEscapeSequence,
    InvalidDecimalLiteral,
    InvalidHexLiteral,
    InvalidBinaryLiteral,
    InvalidRegister,
    UnknownDirective,
    UnexpectedCharacter,

    ExpectedOperand,
    ExpectedRegister,
    ExpectedComma,
    UnexpectedToken,
    TooManyOperands,
    TooFewOperands,
    InvalidOperandType,

    DuplicateLabel,
    MissingOrig,
    MultipleOrig,
    OrigNotFirst,
    MissingEnd,
    InvalidOrigAddress,
    InvalidBlkwCount,
    AddressOverflow,
    LabelIsReservedWord,

    UndefinedLabel,
    OffsetOutOfRange,
    ValueOutOfRange,
    EmptySource,
}

impl AsmError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self { kind, message: message.into(), span }
    }

    pub fn undefined_label(label: &str, span: Span) -> Self {
        Self::new(
            ErrorKind::UndefinedLabel,
            format!("Undefined label '{}'", label),
            span,
        )
    }

    pub fn duplicate_label(label: &str, first_addr: u16, span: Span) -> Self {
        Self::new(
            ErrorKind::DuplicateLabel,
            format!("Label '{}' already defined at x{:04X}", label, first_addr),
            span,
        )
    }

    pub fn offset_out_of_range(label: &str, offset: i32, bits: u8, span: Span) -> Self {
        let max = (1i32 << (bits - 1)) - 1;
        let min = -(1i32 << (bits - 1));
        Self::new(
            ErrorKind::OffsetOutOfRange,
            format!(
                "PC offset {} to label '{}' exceeds {}-bit range [{}, {}]",
                offset, label, bits, min, max
            ),
            span,
        )
    }

    /// Render a full diagnostic line as specified: `<file>:<line>: <message>`
    /// followed by a tab-indented copy of the offending source line.
    pub fn render(&self, file: &str, source_line: &str) -> String {
        format!(
            "{file}:{line}: {message}\n\t{source}",
            file = file,
            line = self.span.line,
            message = self.message,
            source = source_line.trim_end()
        )
    }
}
