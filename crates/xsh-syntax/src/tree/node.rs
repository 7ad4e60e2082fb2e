use rowan::{NodeOrToken, TextRange};

use crate::cst::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
use crate::grammar::kind_name;
use crate::grammar::rules::{FieldSelector, field_rule};

/// Read-only view of one element of a tree, node or token.
///
/// Child indices count every element, trivia included, matching the green
/// children slice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node {
    element: SyntaxElement,
}

impl From<SyntaxNode> for Node {
    fn from(node: SyntaxNode) -> Self {
        Self {
            element: NodeOrToken::Node(node),
        }
    }
}

impl From<SyntaxToken> for Node {
    fn from(token: SyntaxToken) -> Self {
        Self {
            element: NodeOrToken::Token(token),
        }
    }
}

impl From<SyntaxElement> for Node {
    fn from(element: SyntaxElement) -> Self {
        Self { element }
    }
}

impl Node {
    pub fn syntax(&self) -> &SyntaxElement {
        &self.element
    }

    pub fn kind(&self) -> SyntaxKind {
        self.element.kind()
    }

    /// Public name, `None` for layout tokens.
    pub fn kind_name(&self) -> Option<&'static str> {
        kind_name(self.kind()).map(|(name, _)| name)
    }

    pub fn is_named(&self) -> bool {
        kind_name(self.kind()).is_some_and(|(_, named)| named)
    }

    pub fn is_token(&self) -> bool {
        self.element.as_token().is_some()
    }

    pub fn is_trivia(&self) -> bool {
        self.kind().is_trivia()
    }

    pub fn range(&self) -> TextRange {
        self.element.text_range()
    }

    pub fn start_byte(&self) -> u32 {
        self.range().start().into()
    }

    pub fn end_byte(&self) -> u32 {
        self.range().end().into()
    }

    pub fn is_error(&self) -> bool {
        self.kind().is_error()
    }

    pub fn is_missing(&self) -> bool {
        self.kind() == SyntaxKind::Missing
    }

    /// This element or anything below it is an error or a missing node.
    pub fn has_error(&self) -> bool {
        match &self.element {
            NodeOrToken::Token(token) => token.kind().is_error(),
            NodeOrToken::Node(node) => node.descendants_with_tokens().any(|e| {
                let kind = e.kind();
                kind.is_error() || kind == SyntaxKind::Missing
            }),
        }
    }

    pub fn text(&self) -> String {
        match &self.element {
            NodeOrToken::Node(node) => node.text().to_string(),
            NodeOrToken::Token(token) => token.text().to_string(),
        }
    }

    pub fn parent(&self) -> Option<Node> {
        self.element.parent().map(Node::from)
    }

    pub fn child_count(&self) -> usize {
        match &self.element {
            NodeOrToken::Node(node) => node.green().children().len(),
            NodeOrToken::Token(_) => 0,
        }
    }

    /// Child at `index`, trivia included.
    ///
    /// Costs O(`index`) sibling steps: rowan builds red nodes by walking
    /// from the first child. Iterate [`children`](Self::children) to visit
    /// every child in O(1) per step.
    pub fn child(&self, index: usize) -> Option<Node> {
        self.children().nth(index)
    }

    pub fn children(&self) -> impl Iterator<Item = Node> + use<> {
        self.element
            .as_node()
            .map(|node| node.children_with_tokens())
            .into_iter()
            .flatten()
            .map(Node::from)
    }

    pub fn named_children(&self) -> impl Iterator<Item = Node> + use<> {
        self.children().filter(Node::is_named)
    }

    pub fn named_child(&self, index: usize) -> Option<Node> {
        self.named_children().nth(index)
    }

    pub fn named_child_count(&self) -> usize {
        self.named_children().count()
    }

    pub fn child_by_field_name(&self, name: &str) -> Option<Node> {
        self.children_by_field_name(name).into_iter().next()
    }

    /// Children a field selects. Several only for repeated fields.
    pub fn children_by_field_name(&self, name: &str) -> Vec<Node> {
        let Some(rule) = field_rule(self.kind(), name) else {
            return Vec::new();
        };
        match rule.selector {
            FieldSelector::Nth(n) => self.named_child(n).into_iter().collect(),
            FieldSelector::Last => self.named_children().last().into_iter().collect(),
            FieldSelector::After(tokens) => {
                let mut children = self
                    .children()
                    .skip_while(|child| !(child.is_token() && tokens.contains(child.kind())));
                children.next();
                children
                    .find(|child| !child.is_trivia())
                    .filter(Node::is_named)
                    .into_iter()
                    .collect()
            }
            FieldSelector::Kind(kind) => self.children().filter(|c| c.kind() == kind).collect(),
            FieldSelector::OneOf(kinds) => self
                .children()
                .filter(|c| kinds.contains(&c.kind()))
                .collect(),
        }
    }
}
