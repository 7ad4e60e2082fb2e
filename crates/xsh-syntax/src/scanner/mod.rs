//! Context-sensitive tokenization.
//!
//! # Architecture
//!
//! Tokens come from two sources. The external scanner ([`external::scan`])
//! sees the [`ScannerState`] and recognizes everything that depends on
//! context: layout, subprocess sigils, shell words, interpolation closers.
//! When it declines, the logos-derived rules on [`SyntaxKind`] produce one
//! token and the state observes it.
//!
//! Scanning decisions depend only on the state and the upcoming bytes, so a
//! state saved at a statement boundary resumes the token stream exactly.

pub mod external;
pub mod lexer;
pub mod state;

mod words;

#[cfg(test)]
mod external_tests;
#[cfg(test)]
mod lexer_tests;

pub use lexer::{Lexer, Token, lex, token_text};
pub use state::{Closer, Mode, STATE_FORMAT_VERSION, ScannerState, StateError};
