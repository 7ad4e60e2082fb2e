mod cli;
mod commands;
mod logging;

use cli::{CheckParams, EditParams, NodeTypesParams, ParseParams, SnapshotParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();
    let Some((name, m)) = matches.subcommand() else {
        unreachable!("clap should have caught this");
    };
    logging::init(m.get_count("verbose"));

    match name {
        "parse" => {
            let params = ParseParams::from_matches(m);
            commands::parse::run(params.into());
        }
        "check" => {
            let params = CheckParams::from_matches(m);
            commands::check::run(params.into());
        }
        "edit" => {
            let params = EditParams::from_matches(m);
            commands::edit::run(params.into());
        }
        "node-types" => {
            let params = NodeTypesParams::from_matches(m);
            commands::node_types::run(params.into());
        }
        "snapshot" => {
            let params = SnapshotParams::from_matches(m);
            commands::snapshot::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
