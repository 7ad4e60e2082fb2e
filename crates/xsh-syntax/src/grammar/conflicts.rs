//! Explicit resolution of locally ambiguous prefixes.
//!
//! Each rule names the node a production has committed to so far and the
//! lookahead tokens that shift it into a more specific node. Productions
//! consult the rule once the shared prefix is parsed, then wrap the prefix
//! through a checkpoint.
//!
//! Two ambiguities need no table entry. A comprehension iterable is parsed
//! at `or` level, so a following `if` always starts a filter clause rather
//! than a conditional expression. `$(` versus `(` is decided by the scanner,
//! which emits a distinct sigil token.

use crate::cst::SyntaxKind::{self, *};

#[derive(Debug, Clone, Copy)]
pub struct ConflictRule {
    pub name: &'static str,
    pub shifts: &'static [(SyntaxKind, SyntaxKind)],
    /// Reduction when no shift applies.
    pub default: SyntaxKind,
}

impl ConflictRule {
    pub fn resolve(&self, lookahead: SyntaxKind) -> SyntaxKind {
        self.shifts
            .iter()
            .find(|(token, _)| *token == lookahead)
            .map(|(_, node)| *node)
            .unwrap_or(self.default)
    }
}

/// `(` expression, then `,` / `for` / `)`.
pub const PAREN: ConflictRule = ConflictRule {
    name: "parenthesized",
    shifts: &[
        (Comma, Tuple),
        (KwFor, GeneratorExpression),
        (KwAsync, GeneratorExpression),
    ],
    default: ParenthesizedExpression,
};

/// `[` expression, then `for` / `,` / `]`.
pub const LIST: ConflictRule = ConflictRule {
    name: "list",
    shifts: &[(KwFor, ListComprehension), (KwAsync, ListComprehension)],
    default: List,
};

/// `{` expression, then `:` / `for` / `,` / `}`.
pub const BRACE: ConflictRule = ConflictRule {
    name: "brace",
    shifts: &[
        (Colon, Dictionary),
        (KwFor, SetComprehension),
        (KwAsync, SetComprehension),
    ],
    default: Set,
};

/// `{` key `:` value, then `for` / `,` / `}`.
pub const DICTIONARY: ConflictRule = ConflictRule {
    name: "dictionary",
    shifts: &[
        (KwFor, DictionaryComprehension),
        (KwAsync, DictionaryComprehension),
    ],
    default: Dictionary,
};

/// Sole call argument, then `for` turns it into a generator.
pub const ARGUMENT: ConflictRule = ConflictRule {
    name: "argument",
    shifts: &[(KwFor, GeneratorExpression), (KwAsync, GeneratorExpression)],
    default: ArgumentList,
};

/// Expression list at statement start, then `=` / `:` / augmented operator.
pub const STATEMENT: ConflictRule = ConflictRule {
    name: "statement",
    shifts: &[
        (Equals, Assignment),
        (Colon, Assignment),
        (AugAssign, AugmentedAssignment),
    ],
    default: ExpressionStatement,
};

pub const ALL: &[&ConflictRule] = &[&PAREN, &LIST, &BRACE, &DICTIONARY, &ARGUMENT, &STATEMENT];
