//! Syntax kinds for xsh source.
//!
//! `SyntaxKind` serves dual roles: token kinds (from the default lexer and the
//! external scanner) and node kinds (from the parser). Logos derives
//! recognition of the context-free tokens; scanner-only tokens and node kinds
//! lack token/regex attributes. `XshLang` implements Rowan's `Language` trait.

use logos::Logos;
use rowan::Language;

/// All token and node kinds. Tokens first, then nodes, then `__LAST` sentinel.
/// `#[repr(u16)]` enables safe transmute in `kind_from_raw`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("(")]
    ParenOpen = 0,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token(".")]
    Dot,

    #[token("...")]
    Ellipsis,

    #[token("->")]
    Arrow,

    #[token("=")]
    Equals,

    /// Walrus `:=`.
    #[token(":=")]
    ColonEquals,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("**")]
    DoubleStar,

    #[token("/")]
    Slash,

    #[token("//")]
    DoubleSlash,

    #[token("%")]
    Percent,

    /// Decorators and matrix multiplication.
    #[token("@")]
    At,

    #[token("|")]
    Pipe,

    #[token("&")]
    Amp,

    #[token("^")]
    Caret,

    #[token("~")]
    Tilde,

    #[token("<<")]
    ShiftLeft,

    #[token(">>")]
    ShiftRight,

    #[token("<")]
    Less,

    #[token(">")]
    Greater,

    #[token("<=")]
    LessEq,

    #[token(">=")]
    GreaterEq,

    #[token("==")]
    EqEq,

    #[token("!=")]
    NotEq,

    /// Every augmented assignment operator (`+=`, `>>=`, ...).
    #[regex(r"(?:\+|-|\*\*|\*|//|/|%|@|&|\||\^|<<|>>)=")]
    AugAssign,

    /// Python-level `&&`, an alias of `and`.
    #[token("&&")]
    AmpAmp,

    /// Python-level `||`, an alias of `or`.
    #[token("||")]
    PipePipe,

    /// Help suffix `expr?`.
    #[token("?")]
    Question,

    /// Super help suffix `expr??`.
    #[token("??")]
    DoubleQuestion,

    #[token("!")]
    Bang,

    #[token("False")]
    KwFalse,

    #[token("None")]
    KwNone,

    #[token("True")]
    KwTrue,

    #[token("and")]
    KwAnd,

    #[token("as")]
    KwAs,

    #[token("assert")]
    KwAssert,

    #[token("async")]
    KwAsync,

    #[token("await")]
    KwAwait,

    #[token("break")]
    KwBreak,

    #[token("class")]
    KwClass,

    #[token("continue")]
    KwContinue,

    #[token("def")]
    KwDef,

    #[token("del")]
    KwDel,

    #[token("elif")]
    KwElif,

    #[token("else")]
    KwElse,

    #[token("except")]
    KwExcept,

    #[token("finally")]
    KwFinally,

    #[token("for")]
    KwFor,

    #[token("from")]
    KwFrom,

    #[token("global")]
    KwGlobal,

    #[token("if")]
    KwIf,

    #[token("import")]
    KwImport,

    #[token("in")]
    KwIn,

    #[token("is")]
    KwIs,

    #[token("lambda")]
    KwLambda,

    #[token("nonlocal")]
    KwNonlocal,

    #[token("not")]
    KwNot,

    #[token("or")]
    KwOr,

    #[token("pass")]
    KwPass,

    #[token("raise")]
    KwRaise,

    #[token("return")]
    KwReturn,

    #[token("try")]
    KwTry,

    #[token("while")]
    KwWhile,

    #[token("with")]
    KwWith,

    #[token("yield")]
    KwYield,

    /// Identifier. Defined after keywords so they take precedence.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Name,

    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[oO][0-7_]+")]
    #[regex(r"0[bB][01_]+")]
    #[regex(r"[0-9][0-9_]*")]
    Integer,

    /// Floats and imaginary literals.
    #[regex(r"[0-9][0-9_]*\.[0-9_]*(?:[eE][+-]?[0-9][0-9_]*)?[jJ]?")]
    #[regex(r"\.[0-9][0-9_]*(?:[eE][+-]?[0-9][0-9_]*)?[jJ]?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9][0-9_]*[jJ]?")]
    #[regex(r"[0-9][0-9_]*[jJ]")]
    Float,

    #[regex(r#"(?:[rRuUbBfF]|[rR][bBfF]|[bBfF][rR])?"(?:[^"\\\n]|\\(?:.|\n))*""#)]
    #[regex(r#"(?:[rRuUbBfF]|[rR][bBfF]|[bBfF][rR])?'(?:[^'\\\n]|\\(?:.|\n))*'"#)]
    #[regex(r#"(?:[rRuUbBfF]|[rR][bBfF]|[bBfF][rR])?"""(?:[^"\\]|\\(?:.|\n)|"[^"]|""[^"])*""""#)]
    #[regex(r#"(?:[rRuUbBfF]|[rR][bBfF]|[bBfF][rR])?'''(?:[^'\\]|\\(?:.|\n)|'[^']|''[^'])*'''"#)]
    String,

    /// `p"..."` path literal (also `pr`, `pf`, `rp`, `fp`).
    #[regex(r#"(?:[pP][rRfF]?|[rRfF][pP])"(?:[^"\\\n]|\\(?:.|\n))*""#)]
    #[regex(r#"(?:[pP][rRfF]?|[rRfF][pP])'(?:[^'\\\n]|\\(?:.|\n))*'"#)]
    PathString,

    /// `` `regex` `` or `` r`regex` ``.
    #[regex(r"r?`[^`\n]*`")]
    RegexGlob,

    /// `` g`*.py` ``.
    #[regex(r"g`[^`\n]*`")]
    GlobPattern,

    /// `` p`regex` `` or `` rp`regex` ``: regex glob yielding paths.
    #[regex(r"(?:rp|pr|p)`[^`\n]*`")]
    RegexPathGlob,

    /// `` gp`*.py` ``: glob yielding paths.
    #[regex(r"(?:gp|pg)`[^`\n]*`")]
    GlobPath,

    /// `` f`{x}.*` ``.
    #[regex(r"f`[^`\n]*`")]
    FormattedGlob,

    /// `` @name`pattern` ``: glob through a user function.
    #[regex(r"@[a-zA-Z_][a-zA-Z0-9_]*`[^`\n]*`")]
    CustomFunctionGlob,

    /// Horizontal whitespace and backslash line continuations.
    #[regex(r"[ \t\x0C]+")]
    #[regex(r"\\\r?\n")]
    Whitespace,

    #[regex(r"#[^\n]*", allow_greedy = true)]
    Comment,

    /// Newline inside brackets or on a blank line (trivia).
    LineBreak,

    // --- External scanner tokens ---
    /// Logical line end (significant).
    Newline,
    /// Zero-width block open.
    Indent,
    /// Zero-width block close.
    Dedent,
    /// `$(`
    DollarParen,
    /// `!(`
    BangParen,
    /// `$[`
    DollarBracket,
    /// `![`
    BangBracket,
    /// `@$(`
    AtDollarParen,
    /// `@(`
    AtParen,
    /// `${`
    DollarBrace,
    /// `$NAME`
    EnvVariable,
    /// `$NAME=value` in front of a command.
    EnvPrefix,
    /// Shell word, quotes included.
    SubprocessWord,
    /// `|`, `e|`, `err|`, `a|`, `all|`
    SubprocessPipe,
    /// `&&` or `and` between commands.
    SubprocessAnd,
    /// `||` or `or` between commands.
    SubprocessOr,
    /// Trailing `&`.
    Background,
    /// `>`, `>>`, `<`, `2>`, `e>`, `a>`, ...
    Redirect,
    /// `2>&1`, `e>o`, `err>out`, ...
    StreamMerge,
    /// `@json`, `@unthread`, ...
    SubprocessModifier,
    /// `{a,b}` or `{1..3}` inside a shell argument.
    BraceExpansion,
    /// Raw rest of the line after `cmd!`.
    MacroArgument,
    /// Contextual keyword starting `xontrib load ...`.
    Xontrib,
    /// Zero-width marker for a subprocess region cut off by end of input.
    Unterminated,
    /// Shell word with an unterminated quote.
    LexError,

    /// Coalesced unrecognized characters
    Garbage,
    Error,

    // --- Node kinds (non-terminals) ---
    Module,
    Block,
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
    DottedName,
    AliasedImport,
    RelativeImport,
    WildcardImport,
    IfStatement,
    ElifClause,
    ElseClause,
    WhileStatement,
    ForStatement,
    TryStatement,
    ExceptClause,
    FinallyClause,
    WithStatement,
    WithItem,
    FunctionDefinition,
    Parameters,
    DefaultParameter,
    TypedParameter,
    TypedDefaultParameter,
    ListSplatPattern,
    DictionarySplatPattern,
    ClassDefinition,
    DecoratedDefinition,
    Decorator,
    XontribStatement,
    BlockMacroStatement,
    BareSubprocess,

    ExpressionList,
    NamedExpression,
    Lambda,
    LambdaParameters,
    ConditionalExpression,
    BooleanOperator,
    NotOperator,
    ComparisonOperator,
    BinaryOperator,
    UnaryOperator,
    Await,
    Call,
    ArgumentList,
    KeywordArgument,
    ListSplat,
    DictionarySplat,
    Attribute,
    Subscript,
    Slice,
    ParenthesizedExpression,
    Tuple,
    List,
    Dictionary,
    Pair,
    Set,
    ListComprehension,
    DictionaryComprehension,
    SetComprehension,
    GeneratorExpression,
    ForInClause,
    IfClause,
    Yield,
    ConcatenatedString,
    HelpExpression,
    SuperHelpExpression,
    MacroCall,
    AtObject,

    CapturedSubprocess,
    CapturedSubprocessObject,
    UncapturedSubprocess,
    UncapturedSubprocessObject,
    TokenizedSubstitution,
    PythonEvaluation,
    EnvVariableBraced,
    SubprocessCommand,
    EnvScopedCommand,
    SubprocessMacro,
    SubprocessArgument,
    SubprocessPipeline,
    SubprocessLogical,
    SubprocessRedirect,
    BackgroundCommand,

    /// Synthetic node standing in for a required element that is absent.
    Missing,

    // Must be last - used for bounds checking in `kind_from_raw`
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | Comment | LineBreak)
    }

    #[inline]
    pub fn is_error(self) -> bool {
        matches!(self, Error | Garbage | LexError | Unterminated)
    }

    /// Kinds below `Module` are tokens.
    #[inline]
    pub fn is_token(self) -> bool {
        self < Module
    }

    #[inline]
    pub fn is_keyword(self) -> bool {
        (KwFalse..=KwYield).contains(&self) || self == Xontrib
    }

    /// All kinds, tokens first.
    pub fn all() -> impl Iterator<Item = SyntaxKind> {
        (0..__LAST as u16).map(|raw| XshLang::kind_from_raw(rowan::SyntaxKind(raw)))
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language tag for Rowan's tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum XshLang {}

impl Language for XshLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < __LAST as u16);
        // SAFETY: We've verified the value is in bounds, and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for Rowan types parameterized by our language.
pub type SyntaxNode = rowan::SyntaxNode<XshLang>;
pub type SyntaxToken = rowan::SyntaxToken<XshLang>;
pub type SyntaxElement = rowan::NodeOrToken<SyntaxNode, SyntaxToken>;

/// 128-bit bitset of token `SyntaxKind`s for O(1) membership testing.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenSet(u128);

impl TokenSet {
    /// Creates an empty token set.
    pub const EMPTY: TokenSet = TokenSet(0);

    /// Panics at compile time if any kind's discriminant >= 128.
    #[inline]
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u128;
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as u16;
            assert!(kind < 128, "SyntaxKind value exceeds TokenSet capacity");
            bits |= 1 << kind;
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn single(kind: SyntaxKind) -> Self {
        let kind = kind as u16;
        assert!(kind < 128, "SyntaxKind value exceeds TokenSet capacity");
        TokenSet(1 << kind)
    }

    #[inline]
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        if kind >= 128 {
            return false;
        }
        self.0 & (1 << kind) != 0
    }

    #[inline]
    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }

    #[inline]
    pub const fn without(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 & !other.0)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_set();
        for i in 0..128u16 {
            if self.0 & (1 << i) != 0 && i < __LAST as u16 {
                let kind: SyntaxKind = unsafe { std::mem::transmute(i) };
                list.entry(&kind);
            }
        }
        list.finish()
    }
}

/// Pre-defined token sets for the scanner and parser.
pub mod token_sets {
    use super::*;

    pub const TRIVIA: TokenSet = TokenSet::new(&[Whitespace, Comment, LineBreak]);

    /// Tokens only the external scanner can produce.
    pub const EXTERNAL: TokenSet = TokenSet::new(&[
        Newline,
        Indent,
        Dedent,
        DollarParen,
        BangParen,
        DollarBracket,
        BangBracket,
        AtDollarParen,
        AtParen,
        DollarBrace,
        EnvVariable,
        EnvPrefix,
        SubprocessWord,
        SubprocessPipe,
        SubprocessAnd,
        SubprocessOr,
        Background,
        Redirect,
        StreamMerge,
        SubprocessModifier,
        BraceExpansion,
        MacroArgument,
        Xontrib,
        Unterminated,
        LexError,
        LineBreak,
    ]);

    /// Openers that push a scanner mode.
    pub const MODE_OPENERS: TokenSet = TokenSet::new(&[
        DollarParen,
        BangParen,
        DollarBracket,
        BangBracket,
        AtDollarParen,
        AtParen,
        DollarBrace,
    ]);

    /// Tokens that start a statement on their own line.
    pub const LAYOUT: TokenSet = TokenSet::new(&[Newline, Indent, Dedent]);

    pub const LITERALS: TokenSet = TokenSet::new(&[
        Integer,
        Float,
        String,
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
    ]);

    /// FIRST set of a primary expression.
    pub const ATOM_FIRST: TokenSet = TokenSet::new(&[
        Name,
        At,
        EnvVariable,
        ParenOpen,
        BracketOpen,
        BraceOpen,
        DollarParen,
        BangParen,
        DollarBracket,
        BangBracket,
        AtDollarParen,
        DollarBrace,
    ])
    .union(LITERALS);

    /// FIRST set of an expression.
    pub const EXPR_FIRST: TokenSet = ATOM_FIRST.union(TokenSet::new(&[
        Minus, Plus, Tilde, KwNot, KwLambda, KwAwait, Star,
    ]));

    /// Tokens that begin one piece of a subprocess argument.
    pub const ARG_PIECE_FIRST: TokenSet = TokenSet::new(&[
        SubprocessWord,
        EnvVariable,
        LexError,
        DollarParen,
        BangParen,
        DollarBracket,
        BangBracket,
        AtParen,
        AtDollarParen,
        DollarBrace,
        RegexGlob,
        GlobPattern,
        RegexPathGlob,
        GlobPath,
        FormattedGlob,
        CustomFunctionGlob,
        BraceExpansion,
    ]);

    pub const SUBPROC_OPERATORS: TokenSet =
        TokenSet::new(&[SubprocessPipe, SubprocessAnd, SubprocessOr]);

    /// Ends of a logical line.
    pub const LINE_END: TokenSet = TokenSet::new(&[Newline, Semicolon]);

    pub const CLOSERS: TokenSet = TokenSet::new(&[ParenClose, BracketClose, BraceClose]);

    /// Recovery points inside bracketed expressions.
    pub const BRACKET_RECOVERY: TokenSet = CLOSERS.union(LINE_END).union(TokenSet::single(Unterminated));

    /// Recovery points at statement level.
    pub const STATEMENT_RECOVERY: TokenSet = TokenSet::new(&[Newline, Semicolon, Dedent]);

    /// Recovery points inside a subprocess region.
    pub const SUBPROC_RECOVERY: TokenSet = TokenSet::new(&[
        ParenClose,
        BracketClose,
        Newline,
        Semicolon,
        SubprocessPipe,
        SubprocessAnd,
        SubprocessOr,
        Unterminated,
    ]);

    pub const COMPARISON_OPERATORS: TokenSet = TokenSet::new(&[
        Less, Greater, LessEq, GreaterEq, EqEq, NotEq, KwIn, KwIs, KwNot,
    ]);
}
