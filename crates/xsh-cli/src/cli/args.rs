//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so the same definition can be reused
//! across commands.

use std::ops::Range;
use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Source file to parse (positional). `-` reads stdin.
pub fn source_path_arg() -> Arg {
    Arg::new("source_path")
        .value_name("SOURCE")
        .value_parser(value_parser!(PathBuf))
        .help("Source file to parse (use \"-\" for stdin)")
}

/// Inline source text (-s/--source).
pub fn source_text_arg() -> Arg {
    Arg::new("source_text")
        .short('s')
        .long("source")
        .value_name("TEXT")
        .conflicts_with("source_path")
        .help("Inline source text")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Include trivia tokens (--trivia).
pub fn trivia_arg() -> Arg {
    Arg::new("trivia")
        .long("trivia")
        .action(ArgAction::SetTrue)
        .help("Include whitespace, comments and line breaks")
}

/// Show byte ranges (--spans).
pub fn spans_arg() -> Arg {
    Arg::new("spans")
        .long("spans")
        .action(ArgAction::SetTrue)
        .help("Show byte ranges")
}

/// Treat warnings as errors (--strict).
pub fn strict_arg() -> Arg {
    Arg::new("strict")
        .long("strict")
        .action(ArgAction::SetTrue)
        .help("Treat warnings as errors")
}

/// Execution fuel (--fuel).
pub fn fuel_arg() -> Arg {
    Arg::new("fuel")
        .long("fuel")
        .value_name("N")
        .value_parser(value_parser!(u32))
        .help("Token budget for one parse (unlimited by default)")
}

/// Verbosity (-v, repeatable).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Verbosity level (-v info, -vv debug, -vvv trace)")
}

/// Edited byte range (--range START..END).
pub fn range_arg() -> Arg {
    Arg::new("range")
        .long("range")
        .value_name("START..END")
        .required(true)
        .value_parser(parse_range)
        .help("Byte range to replace")
}

/// Replacement text (--text).
pub fn text_arg() -> Arg {
    Arg::new("text")
        .long("text")
        .value_name("TEXT")
        .default_value("")
        .help("Text inserted in place of the range")
}

/// Reparse from scratch instead of reusing the old tree (--full).
pub fn full_arg() -> Arg {
    Arg::new("full")
        .long("full")
        .action(ArgAction::SetTrue)
        .help("Parse the edited source from scratch")
}

/// Compact JSON output (--compact).
pub fn compact_arg() -> Arg {
    Arg::new("compact")
        .long("compact")
        .action(ArgAction::SetTrue)
        .help("Print JSON on one line")
}

/// Snapshot file to write (-o/--output).
pub fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Write the snapshot to FILE")
}

/// Snapshot file to restore (--load).
pub fn load_arg() -> Arg {
    Arg::new("load")
        .long("load")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .conflicts_with("output")
        .help("Restore the tree from FILE instead of parsing")
}

/// `6..8` or `6` (empty range).
pub fn parse_range(s: &str) -> Result<Range<usize>, String> {
    let number = |part: &str| {
        part.trim()
            .parse::<usize>()
            .map_err(|_| format!("invalid offset '{part}'"))
    };
    let range = match s.split_once("..") {
        Some((start, end)) => number(start)?..number(end)?,
        None => {
            let at = number(s)?;
            at..at
        }
    };
    if range.start > range.end {
        return Err(format!("range {s} ends before it starts"));
    }
    Ok(range)
}
