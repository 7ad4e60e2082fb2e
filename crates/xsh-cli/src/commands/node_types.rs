use xsh_core::NodeTypesError;

use super::fail;

pub struct NodeTypesArgs {
    pub compact: bool,
}

pub fn run(args: NodeTypesArgs) {
    let json = render(args.compact).unwrap_or_else(|err| fail(err));
    println!("{}", json);
}

pub fn render(compact: bool) -> Result<String, NodeTypesError> {
    let nodes = xsh_syntax::grammar::node_types();
    if compact {
        return serde_json::to_string(nodes).map_err(NodeTypesError::Json);
    }
    xsh_core::node_types_to_json(nodes)
}

#[cfg(test)]
mod tests {
    use xsh_core::NodeTypeTable;

    use super::render;

    #[test]
    fn pretty_and_compact_agree() {
        let pretty = render(false).unwrap();
        let compact = render(true).unwrap();
        assert!(pretty.contains('\n'));
        assert!(!compact.contains('\n'));

        let table = NodeTypeTable::from_json(&compact).unwrap();
        assert_eq!(table.root(), Some("module"));
        assert!(table.contains_kind("captured_subprocess"));
        assert!(table.has_field("assignment", "right"));
        assert_eq!(
            NodeTypeTable::from_json(&pretty).unwrap().len(),
            table.len()
        );
    }
}
