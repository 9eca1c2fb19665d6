//! # LC-3 Assembler
//!
//! A complete two-pass assembler for the LC-3 (Little Computer 3) architecture.
//!
//! ## Pipeline
//!
//! The assembler processes LC-3 assembly code through four stages:
//!
//! 1. **Lexer** - Tokenizes source code into tokens
//! 2. **Parser** - Parses tokens into an Abstract Syntax Tree (AST)
//! 3. **First Pass** - Builds symbol table and validates structure
//! 4. **Encoder** - Generates binary machine code
//!
//! ## Example
//!
//! ```rust,no_run
//! use lc3_assembler::assemble::assemble;
//!
//! let source = std::fs::read_to_string("program.asm").unwrap();
//! let result = assemble(&source);
//!
//! if result.errors.is_empty() {
//!     println!("Assembly successful: {} words", result.image.words.len());
//! }
//! ```

pub mod assemble;
pub mod encoder;
pub mod error;
pub mod first_pass;
pub mod image;
pub mod lexer;
pub mod parser;
