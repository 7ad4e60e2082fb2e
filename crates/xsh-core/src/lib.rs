#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared by the xsh parser and its consumers.
//!
//! Two layers:
//! - **Serialization layer**: 1:1 mapping to the `node-types.json` artifact
//! - **Analysis layer**: name-indexed [`NodeTypeTable`] for capability checks
//!
//! Plus the position types ([`Point`], [`InputEdit`], [`LineIndex`]) that
//! describe text mutations for incremental re-parsing.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

mod error;
mod position;
pub mod utils;

#[cfg(test)]
mod position_tests;
#[cfg(test)]
mod utils_tests;

pub use error::NodeTypesError;
pub use position::{InputEdit, LineIndex, Point};

// ============================================================================
// Serialization Layer
// ============================================================================

/// Node definition as it appears in `node-types.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(rename = "type")]
    pub type_name: String,
    pub named: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub root: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub extra: bool,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, RawCardinality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<RawCardinality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtypes: Option<Vec<RawTypeRef>>,
}

/// Cardinality constraints for a field or children slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCardinality {
    pub multiple: bool,
    pub required: bool,
    pub types: Vec<RawTypeRef>,
}

/// Reference to a node type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawTypeRef {
    #[serde(rename = "type")]
    pub type_name: String,
    pub named: bool,
}

impl RawTypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            type_name: name.into(),
            named: true,
        }
    }

    pub fn anonymous(text: impl Into<String>) -> Self {
        Self {
            type_name: text.into(),
            named: false,
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Parse `node-types.json` content into raw nodes.
pub fn parse_node_types(json: &str) -> Result<Vec<RawNode>, NodeTypesError> {
    serde_json::from_str(json).map_err(NodeTypesError::Json)
}

/// Render raw nodes as pretty-printed `node-types.json`.
pub fn node_types_to_json(nodes: &[RawNode]) -> Result<String, NodeTypesError> {
    serde_json::to_string_pretty(nodes).map_err(NodeTypesError::Json)
}

// ============================================================================
// Analysis Layer
// ============================================================================

/// Cardinality info for a field or children slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cardinality {
    pub multiple: bool,
    pub required: bool,
}

/// Information about a single field on a node type.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub cardinality: Cardinality,
    pub valid_types: Vec<RawTypeRef>,
}

/// Complete node type information.
#[derive(Debug, Clone)]
pub struct NodeTypeInfo {
    pub name: String,
    pub named: bool,
    pub extra: bool,
    pub fields: IndexMap<String, FieldInfo>,
    pub children: Option<FieldInfo>,
}

/// Name-indexed view over a grammar's node types.
///
/// Answers the questions tooling asks before relying on a grammar version:
/// does kind `X` exist, does it carry field `F`, is `X` a subtype of `S`.
#[derive(Debug, Clone, Default)]
pub struct NodeTypeTable {
    nodes: IndexMap<RawTypeRef, NodeTypeInfo>,
    supertypes: IndexMap<String, Vec<RawTypeRef>>,
    root: Option<String>,
}

impl NodeTypeTable {
    pub fn build(raw_nodes: &[RawNode]) -> Self {
        let mut table = Self::default();

        for raw in raw_nodes {
            if let Some(subtypes) = &raw.subtypes {
                table
                    .supertypes
                    .insert(raw.type_name.clone(), subtypes.clone());
                continue;
            }

            if raw.root {
                table.root = Some(raw.type_name.clone());
            }

            let fields = raw
                .fields
                .iter()
                .map(|(name, card)| (name.clone(), field_info(card)))
                .collect();

            let key = RawTypeRef {
                type_name: raw.type_name.clone(),
                named: raw.named,
            };
            table.nodes.insert(
                key,
                NodeTypeInfo {
                    name: raw.type_name.clone(),
                    named: raw.named,
                    extra: raw.extra,
                    fields,
                    children: raw.children.as_ref().map(field_info),
                },
            );
        }

        table
    }

    pub fn from_json(json: &str) -> Result<Self, NodeTypesError> {
        Ok(Self::build(&parse_node_types(json)?))
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Named node kind lookup.
    pub fn get(&self, name: &str) -> Option<&NodeTypeInfo> {
        self.nodes.get(&RawTypeRef::named(name))
    }

    pub fn contains_kind(&self, name: &str) -> bool {
        self.get(name).is_some() || self.is_supertype(name)
    }

    /// Anonymous token lookup (`"("`, `"if"`, ...).
    pub fn contains_token(&self, text: &str) -> bool {
        self.nodes.contains_key(&RawTypeRef::anonymous(text))
    }

    pub fn has_field(&self, kind: &str, field: &str) -> bool {
        self.get(kind).is_some_and(|info| info.fields.contains_key(field))
    }

    pub fn field(&self, kind: &str, field: &str) -> Option<&FieldInfo> {
        self.get(kind).and_then(|info| info.fields.get(field))
    }

    pub fn field_cardinality(&self, kind: &str, field: &str) -> Option<Cardinality> {
        self.field(kind, field).map(|f| f.cardinality)
    }

    pub fn is_extra(&self, name: &str) -> bool {
        self.get(name).is_some_and(|info| info.extra)
    }

    pub fn is_supertype(&self, name: &str) -> bool {
        self.supertypes.contains_key(name)
    }

    pub fn subtypes(&self, supertype: &str) -> &[RawTypeRef] {
        self.supertypes
            .get(supertype)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Transitive subtype check through nested supertypes.
    pub fn is_subtype_of(&self, kind: &str, supertype: &str) -> bool {
        let mut stack = vec![supertype];
        let mut visited = Vec::new();
        while let Some(current) = stack.pop() {
            if visited.contains(&current) {
                continue;
            }
            visited.push(current);
            for sub in self.subtypes(current) {
                if sub.type_name == kind {
                    return true;
                }
                if sub.named && self.is_supertype(&sub.type_name) {
                    stack.push(sub.type_name.as_str());
                }
            }
        }
        false
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeTypeInfo> {
        self.nodes.values()
    }

    pub fn supertype_names(&self) -> impl Iterator<Item = &str> {
        self.supertypes.keys().map(String::as_str)
    }
}

fn field_info(card: &RawCardinality) -> FieldInfo {
    FieldInfo {
        cardinality: Cardinality {
            multiple: card.multiple,
            required: card.required,
        },
        valid_types: card.types.clone(),
    }
}
