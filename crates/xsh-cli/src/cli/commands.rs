//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("xsh")
        .about("Incremental, error-tolerant parser for xonsh-style source")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(parse_command())
        .subcommand(check_command())
        .subcommand(edit_command())
        .subcommand(node_types_command())
        .subcommand(snapshot_command())
}

fn with_source_args(cmd: Command) -> Command {
    cmd.arg(source_path_arg()).arg(source_text_arg())
}

/// Print the syntax tree of a source file.
pub fn parse_command() -> Command {
    let cmd = Command::new("parse")
        .about("Print the syntax tree of a source file")
        .after_help(
            r#"EXAMPLES:
  xsh parse script.xsh                # tree, diagnostics on stderr
  xsh parse -s 'ls -la | grep x'      # inline source
  xsh parse script.xsh --trivia --spans"#,
        );
    with_source_args(cmd)
        .arg(trivia_arg())
        .arg(spans_arg())
        .arg(fuel_arg())
        .arg(color_arg())
        .arg(verbose_arg())
}

/// Report diagnostics only.
pub fn check_command() -> Command {
    let cmd = Command::new("check")
        .about("Report syntax errors")
        .after_help(
            r#"EXAMPLES:
  xsh check script.xsh                # silent when clean
  xsh check script.xsh --strict       # warnings fail too"#,
        );
    with_source_args(cmd)
        .arg(strict_arg())
        .arg(fuel_arg())
        .arg(color_arg())
        .arg(verbose_arg())
}

/// Apply one edit and print the re-derived tree.
pub fn edit_command() -> Command {
    let cmd = Command::new("edit")
        .about("Apply an edit incrementally and print the new tree")
        .after_help(
            r#"EXAMPLES:
  xsh edit -s 'x = $(ls)' --range 8 --text a      # insert
  xsh edit script.xsh --range 10..14 --text 'f(2)'
  xsh edit script.xsh --range 0..3 --full         # no reuse"#,
        );
    with_source_args(cmd)
        .arg(range_arg())
        .arg(text_arg())
        .arg(full_arg())
        .arg(trivia_arg())
        .arg(spans_arg())
        .arg(color_arg())
        .arg(verbose_arg())
}

/// Print the grammar's node-types JSON.
pub fn node_types_command() -> Command {
    Command::new("node-types")
        .about("Print the node-types JSON of the grammar")
        .arg(compact_arg())
        .arg(verbose_arg())
}

/// Save or restore a tree snapshot.
pub fn snapshot_command() -> Command {
    let cmd = Command::new("snapshot")
        .about("Save a parsed tree, or restore one and print it")
        .after_help(
            r#"EXAMPLES:
  xsh snapshot script.xsh -o script.snap
  xsh snapshot script.xsh --load script.snap"#,
        );
    with_source_args(cmd)
        .arg(output_arg())
        .arg(load_arg())
        .arg(verbose_arg())
}
