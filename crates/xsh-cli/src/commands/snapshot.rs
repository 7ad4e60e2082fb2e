use std::fs;
use std::path::{Path, PathBuf};

use xsh_syntax::{ParseSession, Tree};

use super::fail;
use super::source_loader::SourceInput;

pub struct SnapshotArgs {
    pub input: SourceInput,
    pub output: Option<PathBuf>,
    pub load: Option<PathBuf>,
}

pub fn run(args: SnapshotArgs) {
    let source = args.input.load().unwrap_or_else(|msg| fail(msg));
    match (&args.output, &args.load) {
        (Some(path), _) => {
            let written = save(&source.text, path).unwrap_or_else(|msg| fail(msg));
            eprintln!("wrote {} bytes to {}", written, path.display());
        }
        (None, Some(path)) => {
            let tree = load(&source.text, path).unwrap_or_else(|msg| fail(msg));
            print!("{}", tree.dump());
        }
        (None, None) => fail("nothing to do: use -o/--output or --load"),
    }
}

/// Parses `source` and writes its snapshot. Returns the snapshot size.
pub fn save(source: &str, path: &Path) -> Result<usize, String> {
    let tree = ParseSession::new()
        .parse(source)
        .map_err(|e| e.to_string())?;
    let bytes = tree.to_snapshot().map_err(|e| e.to_string())?;
    fs::write(path, &bytes).map_err(|e| format!("failed to write '{}': {}", path.display(), e))?;
    Ok(bytes.len())
}

pub fn load(source: &str, path: &Path) -> Result<Tree, String> {
    let bytes =
        fs::read(path).map_err(|e| format!("failed to read '{}': {}", path.display(), e))?;
    Tree::from_snapshot(&bytes, source).map_err(|e| e.to_string())
}
