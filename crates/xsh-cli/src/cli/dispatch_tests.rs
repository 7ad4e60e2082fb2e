//! Tests for CLI dispatch: argument validation and params extraction.

use std::path::PathBuf;

use super::args::parse_range;
use super::*;
use crate::cli::commands::{
    check_command, edit_command, node_types_command, parse_command, snapshot_command,
};

#[test]
fn parse_takes_a_positional_path() {
    let m = parse_command()
        .try_get_matches_from(["parse", "script.xsh", "--trivia", "--spans"])
        .unwrap();
    let params = ParseParams::from_matches(&m);

    assert_eq!(params.source_path, Some(PathBuf::from("script.xsh")));
    assert_eq!(params.source_text, None);
    assert!(params.trivia);
    assert!(params.spans);
    assert_eq!(params.color, ColorChoice::Auto);
}

#[test]
fn parse_takes_inline_source() {
    let m = parse_command()
        .try_get_matches_from(["parse", "-s", "ls -la", "--color", "never"])
        .unwrap();
    let params = ParseParams::from_matches(&m);

    assert_eq!(params.source_path, None);
    assert_eq!(params.source_text.as_deref(), Some("ls -la"));
    assert_eq!(params.color, ColorChoice::Never);
    assert!(!params.trivia);
}

#[test]
fn inline_source_conflicts_with_path() {
    let result = parse_command().try_get_matches_from(["parse", "a.xsh", "-s", "ls"]);
    let err = result.err().unwrap();
    assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
}

#[test]
fn fuel_is_unlimited_by_default() {
    let m = check_command()
        .try_get_matches_from(["check", "a.xsh"])
        .unwrap();
    let params = CheckParams::from_matches(&m);
    assert_eq!(params.fuel, None);
    assert!(!params.strict);

    let m = check_command()
        .try_get_matches_from(["check", "a.xsh", "--fuel", "500", "--strict"])
        .unwrap();
    let params = CheckParams::from_matches(&m);
    assert_eq!(params.fuel, Some(500));
    assert!(params.strict);
}

#[test]
fn fuel_must_be_a_number() {
    let result = check_command().try_get_matches_from(["check", "a.xsh", "--fuel", "lots"]);
    assert!(result.is_err());
}

#[test]
fn edit_requires_a_range() {
    let result = edit_command().try_get_matches_from(["edit", "-s", "ls"]);
    let err = result.err().unwrap();
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
}

#[test]
fn edit_params() {
    let m = edit_command()
        .try_get_matches_from(["edit", "-s", "x = 1", "--range", "4..5", "--text", "22", "--full"])
        .unwrap();
    let params = EditParams::from_matches(&m);

    assert_eq!(params.range, 4..5);
    assert_eq!(params.text, "22");
    assert!(params.full);
}

#[test]
fn edit_text_defaults_to_deletion() {
    let m = edit_command()
        .try_get_matches_from(["edit", "a.xsh", "--range", "3"])
        .unwrap();
    let params = EditParams::from_matches(&m);
    assert_eq!(params.range, 3..3);
    assert_eq!(params.text, "");
    assert!(!params.full);
}

#[test]
fn range_forms() {
    assert_eq!(parse_range("6..8"), Ok(6..8));
    assert_eq!(parse_range(" 6 .. 8 "), Ok(6..8));
    assert_eq!(parse_range("7"), Ok(7..7));
    assert_eq!(parse_range("x..2"), Err("invalid offset 'x'".to_string()));
    assert_eq!(parse_range("5..2"), Err("range 5..2 ends before it starts".to_string()));
}

#[test]
fn node_types_compact_flag() {
    let m = node_types_command()
        .try_get_matches_from(["node-types", "--compact"])
        .unwrap();
    assert!(NodeTypesParams::from_matches(&m).compact);

    let m = node_types_command()
        .try_get_matches_from(["node-types"])
        .unwrap();
    assert!(!NodeTypesParams::from_matches(&m).compact);
}

#[test]
fn snapshot_output_and_load() {
    let m = snapshot_command()
        .try_get_matches_from(["snapshot", "a.xsh", "-o", "a.snap"])
        .unwrap();
    let params = SnapshotParams::from_matches(&m);
    assert_eq!(params.output, Some(PathBuf::from("a.snap")));
    assert_eq!(params.load, None);

    let result =
        snapshot_command().try_get_matches_from(["snapshot", "a.xsh", "-o", "a.snap", "--load", "b.snap"]);
    let err = result.err().unwrap();
    assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
}

#[test]
fn verbosity_counts() {
    let m = parse_command()
        .try_get_matches_from(["parse", "a.xsh", "-vv"])
        .unwrap();
    assert_eq!(m.get_count("verbose"), 2);
}

#[test]
fn subcommand_is_required() {
    assert!(build_cli().try_get_matches_from(["xsh"]).is_err());

    let m = build_cli()
        .try_get_matches_from(["xsh", "node-types"])
        .unwrap();
    assert_eq!(m.subcommand_name(), Some("node-types"));
}

#[test]
fn cli_definition_is_consistent() {
    build_cli().debug_assert();
}
