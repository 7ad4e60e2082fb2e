use xsh_syntax::ParseSession;

use super::fail;
use super::source_loader::SourceInput;

pub struct CheckArgs {
    pub input: SourceInput,
    pub strict: bool,
    pub fuel: Option<u32>,
    pub color: bool,
}

pub fn run(args: CheckArgs) {
    let source = args.input.load().unwrap_or_else(|msg| fail(msg));
    let session = ParseSession::new().exec_fuel(args.fuel);
    let tree = session.parse(&source.text).unwrap_or_else(|err| fail(err));

    let diagnostics = tree.diagnostics();
    let is_valid = if args.strict {
        !diagnostics.has_errors() && !diagnostics.has_warnings()
    } else {
        !diagnostics.has_errors()
    };

    if !diagnostics.is_empty() {
        eprint!(
            "{}",
            diagnostics
                .filtered_printer(&source.text)
                .path(&source.name)
                .colored(args.color)
                .render()
        );
    }
    if !is_valid {
        std::process::exit(1);
    }
    // Silent on success (like cargo check)
}
