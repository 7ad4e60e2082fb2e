//! Parser infrastructure for xsh source.
//!
//! # Architecture
//!
//! This parser produces a lossless concrete syntax tree (CST) via Rowan's green tree builder.
//! Key design decisions borrowed from rust-analyzer and rnix-parser:
//!
//! - Zero-copy parsing: tokens carry spans, text sliced only when building tree nodes
//! - Trivia buffering: whitespace/comments collected, then attached as leading trivia
//! - Checkpoint-based wrapping: retroactively wrap nodes for binary operators and
//!   subprocess regions whose kind is only known at their end
//! - Explicit recovery sets: per-production sets determine when to bail vs consume
//!
//! Unlike a classic front end, tokens are scanned on demand from a [`Lexer`]
//! whose scanner state is recorded at every possible statement start. The
//! module loop turns those records into [`Checkpoint`](crate::tree::Checkpoint)s,
//! which is what makes resuming in the middle of a file possible.
//!
//! # Recovery Strategy
//!
//! The parser is resilient: it always produces a tree. Recovery follows these rules:
//!
//! 1. A missing required element becomes a zero-width `Missing` node holding
//!    a token of the expected kind
//! 2. Unexpected tokens are wrapped in `Error` nodes, or skipped up to the
//!    production's recovery set
//! 3. A subprocess region cut off by end of input becomes an `Error` node
//!    covering the whole region
//!
//! [`Lexer`]: crate::scanner::Lexer

mod core;
mod invariants;

pub use core::{ParseOutput, Parser};
