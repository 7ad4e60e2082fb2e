pub mod check;
pub mod edit;
pub mod node_types;
pub mod parse;
pub mod snapshot;
pub mod source_loader;


/// Prints `error: {msg}` and exits with status 1.
pub fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", msg);
    std::process::exit(1);
}
