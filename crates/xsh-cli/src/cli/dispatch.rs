//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! `*Params` structs mirror the command `*Args` but keep the raw clap view
//! (color as a choice rather than a decision), so they can be checked
//! without touching the terminal.

use std::ops::Range;
use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::check::CheckArgs;
use crate::commands::edit::EditArgs;
use crate::commands::node_types::NodeTypesArgs;
use crate::commands::parse::ParseArgs;
use crate::commands::snapshot::SnapshotArgs;
use crate::commands::source_loader::SourceInput;

pub struct ParseParams {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub trivia: bool,
    pub spans: bool,
    pub fuel: Option<u32>,
    pub color: ColorChoice,
}

impl ParseParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: m.get_one::<PathBuf>("source_path").cloned(),
            source_text: m.get_one::<String>("source_text").cloned(),
            trivia: m.get_flag("trivia"),
            spans: m.get_flag("spans"),
            fuel: parse_fuel(m),
            color: parse_color(m),
        }
    }
}

impl From<ParseParams> for ParseArgs {
    fn from(p: ParseParams) -> Self {
        Self {
            input: SourceInput::new(p.source_path, p.source_text),
            trivia: p.trivia,
            spans: p.spans,
            fuel: p.fuel,
            color: p.color.should_colorize(),
        }
    }
}

pub struct CheckParams {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub strict: bool,
    pub fuel: Option<u32>,
    pub color: ColorChoice,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: m.get_one::<PathBuf>("source_path").cloned(),
            source_text: m.get_one::<String>("source_text").cloned(),
            strict: m.get_flag("strict"),
            fuel: parse_fuel(m),
            color: parse_color(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            input: SourceInput::new(p.source_path, p.source_text),
            strict: p.strict,
            fuel: p.fuel,
            color: p.color.should_colorize(),
        }
    }
}

pub struct EditParams {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub range: Range<usize>,
    pub text: String,
    pub full: bool,
    pub trivia: bool,
    pub spans: bool,
    pub color: ColorChoice,
}

impl EditParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: m.get_one::<PathBuf>("source_path").cloned(),
            source_text: m.get_one::<String>("source_text").cloned(),
            // Required by the builder.
            range: m.get_one::<Range<usize>>("range").cloned().unwrap_or(0..0),
            text: m.get_one::<String>("text").cloned().unwrap_or_default(),
            full: m.get_flag("full"),
            trivia: m.get_flag("trivia"),
            spans: m.get_flag("spans"),
            color: parse_color(m),
        }
    }
}

impl From<EditParams> for EditArgs {
    fn from(p: EditParams) -> Self {
        Self {
            input: SourceInput::new(p.source_path, p.source_text),
            range: p.range,
            text: p.text,
            incremental: !p.full,
            trivia: p.trivia,
            spans: p.spans,
            color: p.color.should_colorize(),
        }
    }
}

pub struct NodeTypesParams {
    pub compact: bool,
}

impl NodeTypesParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            compact: m.get_flag("compact"),
        }
    }
}

impl From<NodeTypesParams> for NodeTypesArgs {
    fn from(p: NodeTypesParams) -> Self {
        Self { compact: p.compact }
    }
}

pub struct SnapshotParams {
    pub source_path: Option<PathBuf>,
    pub source_text: Option<String>,
    pub output: Option<PathBuf>,
    pub load: Option<PathBuf>,
}

impl SnapshotParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: m.get_one::<PathBuf>("source_path").cloned(),
            source_text: m.get_one::<String>("source_text").cloned(),
            output: m.get_one::<PathBuf>("output").cloned(),
            load: m.get_one::<PathBuf>("load").cloned(),
        }
    }
}

impl From<SnapshotParams> for SnapshotArgs {
    fn from(p: SnapshotParams) -> Self {
        Self {
            input: SourceInput::new(p.source_path, p.source_text),
            output: p.output,
            load: p.load,
        }
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

fn parse_fuel(m: &ArgMatches) -> Option<u32> {
    m.get_one::<u32>("fuel").copied()
}
