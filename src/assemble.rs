//! # Assemble
//!
//! Top-level orchestrator tying the four pipeline stages together: lexer →
//! parser → first pass → encoder. Callers that only want an object image
//! and a flat diagnostic list (the CLI, the simulator's `reload`) should use
//! [`assemble`] rather than driving the stages individually.

use crate::encoder::{self};
use crate::error::AsmError;
use crate::first_pass;
use crate::image::ObjectImage;
use crate::lexer;
use crate::parser;

/// Everything produced by assembling one source file.
pub struct AssembleResult {
    /// The resulting object image. Empty (origin 0, no words) if any stage
    /// reported an error — per §7, any diagnostic at all suppresses output.
    pub image: ObjectImage,
    /// All diagnostics accumulated across every stage, in source order.
    pub errors: Vec<AsmError>,
}

impl AssembleResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Run the full pipeline over `source` and return the object image plus any
/// diagnostics. Diagnostics accumulate across all four stages rather than
/// stopping at the first error, matching §7's "diagnostics accumulate per
/// line and are all reported."
#[must_use]
pub fn assemble(source: &str) -> AssembleResult {
    if source.trim().is_empty() {
        return AssembleResult {
            image: ObjectImage::new(0, Vec::new()),
            errors: vec![AsmError::new(
                crate::error::ErrorKind::EmptySource,
                "Source file is empty",
                crate::error::Span::new(0, 0, 1, 1),
            )],
        };
    }

    let lexed = lexer::tokenize(source);
    let parsed = parser::parse_lines(&lexed.tokens);
    let first = first_pass::first_pass(parsed.lines);
    let encoded = encoder::encode(&first);

    let mut errors = Vec::new();
    errors.extend(lexed.errors);
    errors.extend(parsed.errors);
    errors.extend(first.errors);
    errors.extend(encoded.errors);

    let image = if errors.is_empty() {
        ObjectImage::new(encoded.orig_address, encoded.machine_code)
    } else {
        ObjectImage::new(0, Vec::new())
    };

    AssembleResult { image, errors }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_minimal_program() {
        let source = "\
.ORIG x3000
AND R0, R0, #0
ADD R0, R0, #5
HALT
.END
";
        let result = assemble(source);
        assert!(result.errors.is_empty(), "errors: {:?}", result.errors);
        assert_eq!(result.image.origin, 0x3000);
        assert_eq!(result.image.words, vec![0x5020, 0x1025, 0xF025]);
    }

    #[test]
    fn empty_source_reports_error() {
        let result = assemble("");
        assert!(!result.is_success());
        assert!(result
            .errors
            .iter()
            .any(|e| e.kind == crate::error::ErrorKind::EmptySource));
    }

    #[test]
    fn undefined_label_suppresses_image() {
        let source = "\
.ORIG x3000
LD R0, MISSING
HALT
.END
";
        let result = assemble(source);
        assert!(!result.is_success());
        assert!(result.image.words.is_empty());
    }
}
