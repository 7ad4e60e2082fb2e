use xsh_syntax::{ParseSession, Tree};

use super::fail;
use super::source_loader::SourceInput;

pub struct ParseArgs {
    pub input: SourceInput,
    pub trivia: bool,
    pub spans: bool,
    pub fuel: Option<u32>,
    pub color: bool,
}

pub fn run(args: ParseArgs) {
    let source = args.input.load().unwrap_or_else(|msg| fail(msg));
    let session = ParseSession::new().exec_fuel(args.fuel);
    let tree = session.parse(&source.text).unwrap_or_else(|err| fail(err));

    print!("{}", dump(&tree, args.trivia, args.spans));
    if !tree.diagnostics().is_empty() {
        eprint!(
            "{}",
            tree.diagnostics()
                .printer(&source.text)
                .path(&source.name)
                .colored(args.color)
                .render()
        );
    }
}

pub fn dump(tree: &Tree, trivia: bool, spans: bool) -> String {
    tree.printer().with_trivia(trivia).with_spans(spans).dump()
}
