//! Node names, fields and supertypes.
//!
//! The names here are a public contract: highlighting queries and host
//! accessor layers address nodes by them. [`node_types`] turns the table
//! into the `node-types.json` artifact described by [`xsh_core::RawNode`].

use std::string::String;
use std::sync::OnceLock;

use indexmap::IndexMap;
use xsh_core::utils::to_snake_case;
use xsh_core::{RawCardinality, RawNode, RawTypeRef};

use crate::cst::SyntaxKind::{self, *};
use crate::cst::TokenSet;

/// Bumped whenever a node name, field or tree shape changes.
pub const GRAMMAR_VERSION: u16 = 2;

/// How a field finds its child among a node's children.
#[derive(Debug, Clone, Copy)]
pub enum FieldSelector {
    /// n-th named child.
    Nth(usize),
    /// Last named child.
    Last,
    /// Next non-trivia child after the first token of the set, when named.
    After(TokenSet),
    /// Every child of the kind, tokens included.
    Kind(SyntaxKind),
    OneOf(&'static [SyntaxKind]),
}

/// Type reference inside a field or children slot.
#[derive(Debug, Clone, Copy)]
pub enum Ty {
    Node(&'static str),
    Token(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub selector: FieldSelector,
    pub required: bool,
    pub multiple: bool,
    pub types: &'static [Ty],
}

#[derive(Debug, Clone, Copy)]
pub struct ChildrenRule {
    pub required: bool,
    pub multiple: bool,
    pub types: &'static [Ty],
}

#[derive(Debug, Clone, Copy)]
pub struct NodeRule {
    pub kind: SyntaxKind,
    pub fields: &'static [FieldRule],
    pub children: Option<ChildrenRule>,
}

const fn field(name: &'static str, selector: FieldSelector, types: &'static [Ty]) -> FieldRule {
    FieldRule {
        name,
        selector,
        required: true,
        multiple: false,
        types,
    }
}

const fn optional(name: &'static str, selector: FieldSelector, types: &'static [Ty]) -> FieldRule {
    FieldRule {
        name,
        selector,
        required: false,
        multiple: false,
        types,
    }
}

const fn repeated(name: &'static str, selector: FieldSelector, types: &'static [Ty]) -> FieldRule {
    FieldRule {
        name,
        selector,
        required: false,
        multiple: true,
        types,
    }
}

const fn children(required: bool, types: &'static [Ty]) -> Option<ChildrenRule> {
    Some(ChildrenRule {
        required,
        multiple: true,
        types,
    })
}

const fn node(kind: SyntaxKind, fields: &'static [FieldRule]) -> NodeRule {
    NodeRule {
        kind,
        fields,
        children: None,
    }
}

const fn node_with_children(
    kind: SyntaxKind,
    fields: &'static [FieldRule],
    children: Option<ChildrenRule>,
) -> NodeRule {
    NodeRule {
        kind,
        fields,
        children,
    }
}

use FieldSelector::*;
use Ty::{Node as N, Token as T};

const EXPR: &[Ty] = &[N("expression")];
const PRIMARY: &[Ty] = &[N("primary_expression")];
const IDENT: &[Ty] = &[N("identifier")];
const BLOCK: &[Ty] = &[N("block")];
const STMTS: &[Ty] = &[N("statement")];
const TARGET: &[Ty] = &[N("expression"), N("expression_list")];
const COMMAND: &[Ty] = &[N("subprocess")];

const fn after(kind: SyntaxKind) -> FieldSelector {
    After(TokenSet::single(kind))
}

pub const NODE_RULES: &[NodeRule] = &[
    node_with_children(Module, &[], children(false, STMTS)),
    node_with_children(Block, &[], children(false, STMTS)),
    node_with_children(ExpressionStatement, &[], children(true, TARGET)),
    node(
        Assignment,
        &[
            field("left", Nth(0), TARGET),
            optional("type", after(Colon), EXPR),
            optional(
                "right",
                after(Equals),
                &[N("expression"), N("expression_list"), N("assignment"), N("yield")],
            ),
        ],
    ),
    node(
        AugmentedAssignment,
        &[
            field("left", Nth(0), TARGET),
            field("operator", Kind(AugAssign), &[N("augmented_operator")]),
            field("right", after(AugAssign), &[N("expression"), N("expression_list"), N("yield")]),
        ],
    ),
    node_with_children(ReturnStatement, &[], children(false, TARGET)),
    node_with_children(DeleteStatement, &[], children(true, TARGET)),
    node_with_children(
        RaiseStatement,
        &[optional("cause", after(KwFrom), EXPR)],
        children(false, EXPR),
    ),
    node_with_children(AssertStatement, &[], children(true, EXPR)),
    node_with_children(GlobalStatement, &[], children(true, IDENT)),
    node_with_children(NonlocalStatement, &[], children(true, IDENT)),
    node_with_children(
        ImportStatement,
        &[],
        children(true, &[N("dotted_name"), N("aliased_import")]),
    ),
    node_with_children(
        ImportFromStatement,
        &[field(
            "module_name",
            Nth(0),
            &[N("dotted_name"), N("relative_import")],
        )],
        children(
            true,
            &[N("dotted_name"), N("aliased_import"), N("wildcard_import")],
        ),
    ),
    node_with_children(DottedName, &[], children(true, IDENT)),
    node(
        AliasedImport,
        &[
            field("name", Nth(0), &[N("dotted_name")]),
            field("alias", after(KwAs), IDENT),
        ],
    ),
    node_with_children(RelativeImport, &[], children(false, &[N("dotted_name")])),
    node(
        IfStatement,
        &[
            field("condition", Nth(0), EXPR),
            field("consequence", Kind(Block), BLOCK),
            repeated(
                "alternative",
                OneOf(&[ElifClause, ElseClause]),
                &[N("elif_clause"), N("else_clause")],
            ),
        ],
    ),
    node(
        ElifClause,
        &[
            field("condition", Nth(0), EXPR),
            field("consequence", Kind(Block), BLOCK),
        ],
    ),
    node(ElseClause, &[field("body", Kind(Block), BLOCK)]),
    node(
        WhileStatement,
        &[
            field("condition", Nth(0), EXPR),
            field("body", Kind(Block), BLOCK),
            optional("alternative", Kind(ElseClause), &[N("else_clause")]),
        ],
    ),
    node(
        ForStatement,
        &[
            field("left", Nth(0), TARGET),
            field("right", after(KwIn), TARGET),
            field("body", Kind(Block), BLOCK),
            optional("alternative", Kind(ElseClause), &[N("else_clause")]),
        ],
    ),
    node_with_children(
        TryStatement,
        &[field("body", Kind(Block), BLOCK)],
        children(
            false,
            &[N("except_clause"), N("else_clause"), N("finally_clause")],
        ),
    ),
    node(
        ExceptClause,
        &[
            optional("value", after(KwExcept), EXPR),
            optional("alias", after(KwAs), IDENT),
            field("body", Kind(Block), BLOCK),
        ],
    ),
    node(FinallyClause, &[field("body", Kind(Block), BLOCK)]),
    node_with_children(
        WithStatement,
        &[field("body", Kind(Block), BLOCK)],
        children(true, &[N("with_item")]),
    ),
    node(
        WithItem,
        &[
            field("value", Nth(0), EXPR),
            optional("alias", after(KwAs), EXPR),
        ],
    ),
    node(
        FunctionDefinition,
        &[
            field("name", after(KwDef), IDENT),
            field("parameters", Kind(Parameters), &[N("parameters")]),
            optional("return_type", after(Arrow), EXPR),
            field("body", Kind(Block), BLOCK),
        ],
    ),
    node_with_children(
        Parameters,
        &[],
        children(
            false,
            &[
                N("identifier"),
                N("default_parameter"),
                N("typed_parameter"),
                N("typed_default_parameter"),
                N("list_splat_pattern"),
                N("dictionary_splat_pattern"),
            ],
        ),
    ),
    node_with_children(
        LambdaParameters,
        &[],
        children(
            true,
            &[
                N("identifier"),
                N("default_parameter"),
                N("list_splat_pattern"),
                N("dictionary_splat_pattern"),
            ],
        ),
    ),
    node(
        DefaultParameter,
        &[
            field("name", Nth(0), IDENT),
            field("value", after(Equals), EXPR),
        ],
    ),
    node(
        TypedParameter,
        &[
            field(
                "name",
                Nth(0),
                &[N("identifier"), N("list_splat_pattern"), N("dictionary_splat_pattern")],
            ),
            field("type", after(Colon), EXPR),
        ],
    ),
    node(
        TypedDefaultParameter,
        &[
            field("name", Nth(0), IDENT),
            field("type", after(Colon), EXPR),
            field("value", after(Equals), EXPR),
        ],
    ),
    node_with_children(ListSplatPattern, &[], children(true, IDENT)),
    node_with_children(DictionarySplatPattern, &[], children(true, IDENT)),
    node(
        ClassDefinition,
        &[
            field("name", after(KwClass), IDENT),
            optional("superclasses", Kind(ArgumentList), &[N("argument_list")]),
            field("body", Kind(Block), BLOCK),
        ],
    ),
    node_with_children(
        DecoratedDefinition,
        &[field(
            "definition",
            OneOf(&[FunctionDefinition, ClassDefinition]),
            &[N("function_definition"), N("class_definition")],
        )],
        children(true, &[N("decorator")]),
    ),
    node_with_children(Decorator, &[], children(true, EXPR)),
    node_with_children(XontribStatement, &[], children(true, &[N("dotted_name")])),
    node_with_children(
        BlockMacroStatement,
        &[field("body", Kind(Block), BLOCK)],
        children(true, &[N("with_item")]),
    ),
    node(BareSubprocess, &[field("body", Nth(0), COMMAND)]),
    node_with_children(ExpressionList, &[], children(true, EXPR)),
    node(
        NamedExpression,
        &[
            field("name", Nth(0), EXPR),
            field("value", after(ColonEquals), EXPR),
        ],
    ),
    node(
        Lambda,
        &[
            optional("parameters", Kind(LambdaParameters), &[N("lambda_parameters")]),
            field("body", Last, EXPR),
        ],
    ),
    node_with_children(ConditionalExpression, &[], children(true, EXPR)),
    node(
        BooleanOperator,
        &[
            field("left", Nth(0), EXPR),
            field(
                "operator",
                OneOf(&[KwAnd, KwOr, AmpAmp, PipePipe]),
                &[T("and"), T("or"), T("&&"), T("||")],
            ),
            field("right", Last, EXPR),
        ],
    ),
    node(NotOperator, &[field("argument", Last, EXPR)]),
    node_with_children(ComparisonOperator, &[], children(true, PRIMARY)),
    node(
        BinaryOperator,
        &[
            field("left", Nth(0), PRIMARY),
            field(
                "operator",
                OneOf(&[
                    Pipe,
                    Caret,
                    Amp,
                    ShiftLeft,
                    ShiftRight,
                    Plus,
                    Minus,
                    Star,
                    Slash,
                    DoubleSlash,
                    Percent,
                    At,
                    DoubleStar,
                ]),
                &[
                    T("|"),
                    T("^"),
                    T("&"),
                    T("<<"),
                    T(">>"),
                    T("+"),
                    T("-"),
                    T("*"),
                    T("/"),
                    T("//"),
                    T("%"),
                    T("@"),
                    T("**"),
                ],
            ),
            field("right", Last, PRIMARY),
        ],
    ),
    node(
        UnaryOperator,
        &[
            field(
                "operator",
                OneOf(&[Minus, Plus, Tilde]),
                &[T("-"), T("+"), T("~")],
            ),
            field("argument", Last, PRIMARY),
        ],
    ),
    node_with_children(Await, &[], children(true, PRIMARY)),
    node(
        Call,
        &[
            field("function", Nth(0), PRIMARY),
            field(
                "arguments",
                Last,
                &[N("argument_list"), N("generator_expression")],
            ),
        ],
    ),
    node_with_children(
        ArgumentList,
        &[],
        children(
            false,
            &[
                N("expression"),
                N("list_splat"),
                N("dictionary_splat"),
                N("keyword_argument"),
            ],
        ),
    ),
    node(
        KeywordArgument,
        &[field("name", Nth(0), IDENT), field("value", Last, EXPR)],
    ),
    node_with_children(ListSplat, &[], children(true, EXPR)),
    node_with_children(DictionarySplat, &[], children(true, EXPR)),
    node(
        Attribute,
        &[
            field("object", Nth(0), PRIMARY),
            field("attribute", Last, IDENT),
        ],
    ),
    node(
        Subscript,
        &[
            field("value", Nth(0), PRIMARY),
            repeated("subscript", after(BracketOpen), &[N("expression"), N("slice")]),
        ],
    ),
    node_with_children(Slice, &[], children(false, EXPR)),
    node_with_children(ParenthesizedExpression, &[], children(true, EXPR)),
    node_with_children(Tuple, &[], children(false, EXPR)),
    node_with_children(List, &[], children(false, EXPR)),
    node_with_children(
        Dictionary,
        &[],
        children(false, &[N("pair"), N("dictionary_splat")]),
    ),
    node(
        Pair,
        &[field("key", Nth(0), EXPR), field("value", Last, EXPR)],
    ),
    node_with_children(Set, &[], children(true, EXPR)),
    node_with_children(
        ListComprehension,
        &[field("body", Nth(0), EXPR)],
        children(true, &[N("for_in_clause"), N("if_clause")]),
    ),
    node_with_children(
        DictionaryComprehension,
        &[field("body", Nth(0), &[N("pair")])],
        children(true, &[N("for_in_clause"), N("if_clause")]),
    ),
    node_with_children(
        SetComprehension,
        &[field("body", Nth(0), EXPR)],
        children(true, &[N("for_in_clause"), N("if_clause")]),
    ),
    node_with_children(
        GeneratorExpression,
        &[field("body", Nth(0), EXPR)],
        children(true, &[N("for_in_clause"), N("if_clause")]),
    ),
    node(
        ForInClause,
        &[
            field("left", after(KwFor), TARGET),
            field("right", Last, EXPR),
        ],
    ),
    node_with_children(IfClause, &[], children(true, EXPR)),
    node_with_children(Yield, &[], children(false, TARGET)),
    node_with_children(ConcatenatedString, &[], children(true, &[N("string")])),
    node_with_children(HelpExpression, &[], children(true, PRIMARY)),
    node_with_children(SuperHelpExpression, &[], children(true, PRIMARY)),
    node(
        MacroCall,
        &[
            field("function", Nth(0), PRIMARY),
            field("arguments", Last, &[N("argument_list")]),
        ],
    ),
    node(AtObject, &[field("attribute", Last, IDENT)]),
    node(CapturedSubprocess, &[field("body", Nth(0), COMMAND)]),
    node(CapturedSubprocessObject, &[field("body", Nth(0), COMMAND)]),
    node(UncapturedSubprocess, &[field("body", Nth(0), COMMAND)]),
    node(UncapturedSubprocessObject, &[field("body", Nth(0), COMMAND)]),
    node(TokenizedSubstitution, &[field("body", Nth(0), COMMAND)]),
    node(
        PythonEvaluation,
        &[field("expression", Nth(0), TARGET)],
    ),
    node(EnvVariableBraced, &[field("expression", Nth(0), EXPR)]),
    node_with_children(
        SubprocessCommand,
        &[],
        children(
            true,
            &[
                N("subprocess_modifier"),
                N("subprocess_argument"),
                N("subprocess_redirect"),
                N("stream_merge_operator"),
            ],
        ),
    ),
    node_with_children(
        EnvScopedCommand,
        &[field(
            "command",
            OneOf(&[SubprocessCommand, SubprocessMacro]),
            &[N("subprocess_command"), N("subprocess_macro")],
        )],
        children(true, &[N("env_prefix")]),
    ),
    node(
        SubprocessMacro,
        &[
            field("name", Kind(SubprocessWord), &[N("subprocess_word")]),
            optional("argument", Kind(MacroArgument), &[N("macro_argument")]),
        ],
    ),
    node_with_children(
        SubprocessArgument,
        &[],
        children(
            true,
            &[
                N("subprocess_word"),
                N("env_variable"),
                N("env_variable_braced"),
                N("captured_subprocess"),
                N("captured_subprocess_object"),
                N("uncaptured_subprocess"),
                N("uncaptured_subprocess_object"),
                N("tokenized_substitution"),
                N("python_evaluation"),
                N("regex_glob"),
                N("glob_pattern"),
                N("regex_path_glob"),
                N("glob_path"),
                N("formatted_glob"),
                N("custom_function_glob"),
                N("brace_expansion"),
            ],
        ),
    ),
    node(
        SubprocessPipeline,
        &[
            field("left", Nth(0), COMMAND),
            field("operator", Kind(SubprocessPipe), &[N("pipe_operator")]),
            field("right", Last, COMMAND),
        ],
    ),
    node(
        SubprocessLogical,
        &[
            field("left", Nth(0), COMMAND),
            field(
                "operator",
                OneOf(&[SubprocessAnd, SubprocessOr]),
                &[N("logical_operator")],
            ),
            field("right", Last, COMMAND),
        ],
    ),
    node(
        SubprocessRedirect,
        &[
            field("operator", Kind(Redirect), &[N("redirect_operator")]),
            field("target", Last, &[N("subprocess_argument")]),
        ],
    ),
    node(BackgroundCommand, &[field("command", Nth(0), COMMAND)]),
];

/// Abstract groups of node kinds, as in `node-types.json` supertypes.
pub const SUPERTYPES: &[(&str, &[SyntaxKind])] = &[
    (
        "statement",
        &[
            ExpressionStatement,
            Assignment,
            AugmentedAssignment,
            PassStatement,
            BreakStatement,
            ContinueStatement,
            ReturnStatement,
            DeleteStatement,
            RaiseStatement,
            AssertStatement,
            GlobalStatement,
            NonlocalStatement,
            ImportStatement,
            ImportFromStatement,
            IfStatement,
            WhileStatement,
            ForStatement,
            TryStatement,
            WithStatement,
            FunctionDefinition,
            ClassDefinition,
            DecoratedDefinition,
            XontribStatement,
            BlockMacroStatement,
            BareSubprocess,
        ],
    ),
    (
        "expression",
        &[
            NamedExpression,
            Lambda,
            ConditionalExpression,
            BooleanOperator,
            NotOperator,
            ComparisonOperator,
            Await,
        ],
    ),
    (
        "primary_expression",
        &[
            Name,
            EnvVariable,
            Integer,
            Float,
            SyntaxKind::String,
            PathString,
            RegexGlob,
            GlobPattern,
            RegexPathGlob,
            GlobPath,
            FormattedGlob,
            CustomFunctionGlob,
            KwTrue,
            KwFalse,
            KwNone,
            Ellipsis,
            ConcatenatedString,
            BinaryOperator,
            UnaryOperator,
            Call,
            Attribute,
            Subscript,
            ParenthesizedExpression,
            Tuple,
            List,
            Dictionary,
            Set,
            ListComprehension,
            DictionaryComprehension,
            SetComprehension,
            GeneratorExpression,
            HelpExpression,
            SuperHelpExpression,
            MacroCall,
            AtObject,
            CapturedSubprocess,
            CapturedSubprocessObject,
            UncapturedSubprocess,
            UncapturedSubprocessObject,
            TokenizedSubstitution,
            EnvVariableBraced,
        ],
    ),
    (
        "subprocess",
        &[
            SubprocessCommand,
            EnvScopedCommand,
            SubprocessMacro,
            SubprocessPipeline,
            SubprocessLogical,
            BackgroundCommand,
        ],
    ),
];

/// Public name of a kind and whether it is named. `None` for layout and
/// scanner-internal tokens, which never show up in the tree's public shape.
pub fn kind_name(kind: SyntaxKind) -> Option<(&'static str, bool)> {
    static NAMES: OnceLock<Vec<Option<(String, bool)>>> = OnceLock::new();
    let names = NAMES.get_or_init(|| SyntaxKind::all().map(describe).collect());
    names
        .get(kind as usize)
        .and_then(|entry| entry.as_ref())
        .map(|(name, named)| (name.as_str(), *named))
}

fn describe(kind: SyntaxKind) -> Option<(String, bool)> {
    let named = |name: &str| Some((name.to_string(), true));
    match kind {
        Whitespace | LineBreak | Newline | Indent | Dedent | Unterminated | LexError
        | Garbage | __LAST => None,
        Error => named("ERROR"),
        Missing => named("MISSING"),
        Name => named("identifier"),
        KwTrue => named("true"),
        KwFalse => named("false"),
        KwNone => named("none"),
        Ellipsis => named("ellipsis"),
        SubprocessPipe => named("pipe_operator"),
        SubprocessAnd | SubprocessOr => named("logical_operator"),
        Redirect => named("redirect_operator"),
        StreamMerge => named("stream_merge_operator"),
        AugAssign => named("augmented_operator"),
        Integer | Float | SyntaxKind::String | PathString | RegexGlob | GlobPattern
        | RegexPathGlob | GlobPath | FormattedGlob | CustomFunctionGlob | Comment | EnvVariable
        | EnvPrefix | SubprocessWord | SubprocessModifier | BraceExpansion | MacroArgument => {
            Some((to_snake_case(&format!("{kind:?}")), true))
        }
        _ if kind.is_keyword() => Some((keyword_text(kind), false)),
        _ if kind.is_token() => punctuation_text(kind).map(|text| (text.to_string(), false)),
        _ => Some((to_snake_case(&format!("{kind:?}")), true)),
    }
}

fn keyword_text(kind: SyntaxKind) -> String {
    if kind == Xontrib {
        return "xontrib load".to_string();
    }
    let debug = format!("{kind:?}");
    debug.trim_start_matches("Kw").to_ascii_lowercase()
}

fn punctuation_text(kind: SyntaxKind) -> Option<&'static str> {
    let text = match kind {
        ParenOpen => "(",
        ParenClose => ")",
        BracketOpen => "[",
        BracketClose => "]",
        BraceOpen => "{",
        BraceClose => "}",
        Comma => ",",
        Colon => ":",
        Semicolon => ";",
        Dot => ".",
        Arrow => "->",
        Equals => "=",
        ColonEquals => ":=",
        Plus => "+",
        Minus => "-",
        Star => "*",
        DoubleStar => "**",
        Slash => "/",
        DoubleSlash => "//",
        Percent => "%",
        At => "@",
        Pipe => "|",
        Amp => "&",
        Caret => "^",
        Tilde => "~",
        ShiftLeft => "<<",
        ShiftRight => ">>",
        Less => "<",
        Greater => ">",
        LessEq => "<=",
        GreaterEq => ">=",
        EqEq => "==",
        NotEq => "!=",
        AmpAmp => "&&",
        PipePipe => "||",
        Question => "?",
        DoubleQuestion => "??",
        Bang => "!",
        DollarParen => "$(",
        BangParen => "!(",
        DollarBracket => "$[",
        BangBracket => "![",
        AtDollarParen => "@$(",
        AtParen => "@(",
        DollarBrace => "${",
        Background => "&",
        _ => return None,
    };
    Some(text)
}

pub fn node_rule(kind: SyntaxKind) -> Option<&'static NodeRule> {
    NODE_RULES.iter().find(|rule| rule.kind == kind)
}

pub fn field_rule(kind: SyntaxKind, name: &str) -> Option<&'static FieldRule> {
    node_rule(kind)?.fields.iter().find(|f| f.name == name)
}

fn type_ref(ty: &Ty) -> RawTypeRef {
    match ty {
        Ty::Node(name) => RawTypeRef::named(*name),
        Ty::Token(text) => RawTypeRef::anonymous(*text),
    }
}

fn cardinality(required: bool, multiple: bool, types: &[Ty]) -> RawCardinality {
    RawCardinality {
        multiple,
        required,
        types: types.iter().map(type_ref).collect(),
    }
}

/// The `node-types.json` artifact, computed once.
///
/// Supertypes first, then every public kind in declaration order. Kinds that
/// share a name (`&` is both a bitwise and a background operator) appear
/// once.
pub fn node_types() -> &'static [RawNode] {
    static NODE_TYPES: OnceLock<Vec<RawNode>> = OnceLock::new();
    NODE_TYPES.get_or_init(build_node_types)
}

fn build_node_types() -> Vec<RawNode> {
    let mut nodes: IndexMap<(String, bool), RawNode> = IndexMap::new();

    for (name, subtypes) in SUPERTYPES {
        let mut refs: Vec<RawTypeRef> = Vec::new();
        for &kind in *subtypes {
            if let Some((sub, named)) = kind_name(kind) {
                let r = RawTypeRef {
                    type_name: sub.to_string(),
                    named,
                };
                if !refs.contains(&r) {
                    refs.push(r);
                }
            }
        }
        if *name == "expression" {
            refs.push(RawTypeRef::named("primary_expression"));
        }
        nodes.insert(
            (name.to_string(), true),
            RawNode {
                type_name: name.to_string(),
                named: true,
                root: false,
                extra: false,
                fields: IndexMap::new(),
                children: None,
                subtypes: Some(refs),
            },
        );
    }

    for kind in SyntaxKind::all() {
        if matches!(kind, Error | Missing) {
            continue;
        }
        let Some((name, named)) = kind_name(kind) else {
            continue;
        };
        let key = (name.to_string(), named);
        if nodes.contains_key(&key) {
            continue;
        }
        let mut raw = RawNode {
            type_name: name.to_string(),
            named,
            root: kind == Module,
            extra: kind == Comment,
            fields: IndexMap::new(),
            children: None,
            subtypes: None,
        };
        if let Some(rule) = node_rule(kind) {
            for f in rule.fields {
                raw.fields.insert(
                    f.name.to_string(),
                    cardinality(f.required, f.multiple, f.types),
                );
            }
            raw.children = rule
                .children
                .map(|c| cardinality(c.required, c.multiple, c.types));
        }
        nodes.insert(key, raw);
    }

    nodes.into_values().collect()
}
