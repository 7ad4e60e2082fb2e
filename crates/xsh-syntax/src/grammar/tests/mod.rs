mod scenarios_tests;
mod subprocess_tests;

use std::fmt::Write;

use crate::parse;

/// Tree dump without trivia, then one line per diagnostic.
fn shot(source: &str) -> String {
    let tree = parse(source).unwrap();
    let mut out = tree.dump();
    for d in tree.diagnostics() {
        writeln!(out, "{:?} {:?}: {}", d.kind(), d.range(), d.message()).unwrap();
    }
    out
}
