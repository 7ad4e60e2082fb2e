//! Grammar productions for xsh source.
//!
//! Productions are `parse_*` methods on [`Parser`], grouped by layer:
//! statements, expressions, atoms and subprocess regions. Everything a
//! production needs to decide is data: first-token dispatch tables below,
//! the operator table in [`precedence`], the conflict table in
//! [`conflicts`] and the node/field metadata in [`rules`].

mod atoms;
pub mod conflicts;
mod expressions;
pub mod precedence;
pub mod rules;
mod statements;
mod subprocess;

#[cfg(test)]
mod tests;

pub use rules::{GRAMMAR_VERSION, kind_name, node_types};

use crate::cst::SyntaxKind::{self, *};
use crate::parser::Parser;

/// A production entered on its first token.
pub type Production = fn(&mut Parser<'_>);

/// Statements selected by their first token. Everything else is an
/// expression statement.
pub const STATEMENTS: &[(SyntaxKind, Production)] = &[
    (KwIf, |p| p.parse_if_statement()),
    (KwWhile, |p| p.parse_while_statement()),
    (KwFor, |p| p.parse_for_statement()),
    (KwTry, |p| p.parse_try_statement()),
    (KwWith, |p| p.parse_with_statement()),
    (KwDef, |p| p.parse_function_definition()),
    (KwClass, |p| p.parse_class_definition()),
    (At, |p| p.parse_at_statement()),
    (KwAsync, |p| p.parse_async_statement()),
    (KwPass, |p| p.parse_keyword_statement(PassStatement)),
    (KwBreak, |p| p.parse_keyword_statement(BreakStatement)),
    (KwContinue, |p| p.parse_keyword_statement(ContinueStatement)),
    (KwReturn, |p| p.parse_return_statement()),
    (KwDel, |p| p.parse_delete_statement()),
    (KwRaise, |p| p.parse_raise_statement()),
    (KwAssert, |p| p.parse_assert_statement()),
    (KwGlobal, |p| p.parse_name_list_statement(GlobalStatement)),
    (KwNonlocal, |p| p.parse_name_list_statement(NonlocalStatement)),
    (KwImport, |p| p.parse_import_statement()),
    (KwFrom, |p| p.parse_import_from_statement()),
    (Xontrib, |p| p.parse_xontrib_statement()),
    (SubprocessWord, |p| p.parse_bare_subprocess()),
    (EnvPrefix, |p| p.parse_bare_subprocess()),
    (LexError, |p| p.parse_bare_subprocess()),
    (Indent, |p| p.parse_unexpected_indent()),
];

/// Primary expressions that are more than one token, by first token.
pub const ATOMS: &[(SyntaxKind, Production)] = &[
    (At, |p| p.parse_at_object()),
    (ParenOpen, |p| p.parse_parenthesized()),
    (BracketOpen, |p| p.parse_list()),
    (BraceOpen, |p| p.parse_brace()),
    (DollarParen, |p| p.parse_region()),
    (BangParen, |p| p.parse_region()),
    (DollarBracket, |p| p.parse_region()),
    (BangBracket, |p| p.parse_region()),
    (AtDollarParen, |p| p.parse_region()),
    (DollarBrace, |p| p.parse_region()),
    (KwYield, |p| p.parse_yield()),
];

/// One piece of a shell argument, by first token.
pub const ARGUMENT_PIECES: &[(SyntaxKind, Production)] = &[
    (DollarParen, |p| p.parse_region()),
    (BangParen, |p| p.parse_region()),
    (DollarBracket, |p| p.parse_region()),
    (BangBracket, |p| p.parse_region()),
    (AtDollarParen, |p| p.parse_region()),
    (AtParen, |p| p.parse_region()),
    (DollarBrace, |p| p.parse_region()),
];

pub fn dispatch(table: &[(SyntaxKind, Production)], kind: SyntaxKind) -> Option<Production> {
    table
        .iter()
        .find(|(first, _)| *first == kind)
        .map(|(_, production)| *production)
}
