//! The shared tag space
//!
//!     Terminals and composites draw their kind from the same enumeration. A rewrite pass asks
//!     "is this child one of {...}" without caring whether the child is a raw token or a node
//!     some earlier pass already built, which is what lets passes compose: the output of one
//!     pass is simply more vocabulary for the next.
//!
//!     Tags fall into four groups:
//!
//!         Lexical terminals   whitespace, comments, literals, identifiers, directives
//!         Symbols             every entry of the operator table (see lexing::symbols)
//!         Keywords            reserved words, some only reserved in particular lexing modes
//!         Constructs          composite kinds built by structuring, parsing and expansion

use crate::lexing::keywords::keyword_text;
use crate::lexing::symbols::symbol_text;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Tag {
    // Lexical terminals
    Newline,
    Whitespace,
    LineComment,
    BlockComment,
    Continuation,
    Identifier,
    ConstructName,
    IntLiteral,
    HexLiteral,
    FloatLiteral,
    CharLiteral,
    StringLiteral,
    WideStringLiteral,
    Directive,
    SectionBreak,
    Unknown,

    // Symbols
    Ellipsis,
    ShlAssign,
    ShrAssign,
    Scope,
    Arrow,
    FatArrow,
    Increment,
    Decrement,
    Shl,
    Shr,
    LessEq,
    GreaterEq,
    EqEq,
    NotEq,
    AndAnd,
    OrOr,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    AmpAssign,
    PipeAssign,
    CaretAssign,
    Concat,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,
    Less,
    Greater,
    Bang,
    Tilde,
    Amp,
    Pipe,
    Caret,
    Question,
    Colon,
    Semicolon,
    Comma,
    Dot,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Hash,
    At,
    Dollar,
    Backslash,

    // Base-language keywords
    Auto,
    Break,
    Case,
    Char,
    Const,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extern,
    Float,
    For,
    Goto,
    If,
    Inline,
    Int,
    Long,
    Register,
    Return,
    Short,
    Signed,
    Sizeof,
    Static,
    Struct,
    Switch,
    Typedef,
    Union,
    Unsigned,
    Void,
    Volatile,
    While,

    // Extended-dialect keywords
    Object,
    State,
    Macro,
    Expand,
    Public,
    Private,
    Protected,
    Virtual,

    // Dialect-definition keywords
    Dialect,
    Construct,
    Note,
    Map,

    // Constructs
    File,
    DialectFile,
    Preprocessor,
    Parens,
    Brackets,
    Braces,
    MacroDef,
    MacroParams,
    MacroBody,
    MacroCall,
    ExpandCall,
    Arguments,
    Argument,
    ItemExpansion,
    MemberExpansion,
    StatementExpansion,
    ExpressionExpansion,
    ObjectDef,
    BaseList,
    ObjectBody,
    VisibilityLabel,
    UserConstruct,
    StateMachine,
    StateBody,
    StateDef,
    Transition,
    InitialState,
    EnumDef,
    EnumBody,
    Enumerator,
    Record,
    RecordBody,
    Function,
    TypeSpec,
    ParamList,
    Param,
    Body,
    Block,
    Declaration,
    Initializer,
    ScopeRef,
    TemplateRef,
    PointerType,
    Statement,
    IfStatement,
    WhileStatement,
    ForStatement,
    ForHeader,
    ForClause,
    DoWhileStatement,
    SwitchStatement,
    Jump,
    Label,
    CaseLabel,
    Condition,
    Call,
    Group,
    Index,
    InitList,
    ConstructDecl,
    NoteDef,
    MapDef,
    DialectBody,
    Entry,
}

impl Tag {
    /// Whitespace, newlines, comments and continuations.
    ///
    /// Trivia is kept in the tree so the source round-trips, but every pattern matcher skips it
    /// and every AllowOnly whitelist accepts it.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Tag::Whitespace
                | Tag::Newline
                | Tag::LineComment
                | Tag::BlockComment
                | Tag::Continuation
        )
    }

    /// Horizontal whitespace only; newlines and comments are not blank for concatenation.
    pub fn is_blank(self) -> bool {
        matches!(self, Tag::Whitespace | Tag::Continuation)
    }

    pub fn is_symbol(self) -> bool {
        symbol_text(self).is_some()
    }

    pub fn is_keyword(self) -> bool {
        keyword_text(self).is_some()
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Tag::IntLiteral
                | Tag::HexLiteral
                | Tag::FloatLiteral
                | Tag::CharLiteral
                | Tag::StringLiteral
                | Tag::WideStringLiteral
        )
    }

    /// Identifier-like terminals that can name something.
    pub fn is_name(self) -> bool {
        matches!(self, Tag::Identifier | Tag::ConstructName)
    }

    /// Tags the lexer can produce. Everything else is a construct.
    pub fn is_lexical(self) -> bool {
        self <= Tag::Map
    }

    /// Base type words that may start a type specification.
    pub fn is_type_word(self) -> bool {
        matches!(
            self,
            Tag::Char
                | Tag::Double
                | Tag::Float
                | Tag::Int
                | Tag::Long
                | Tag::Short
                | Tag::Signed
                | Tag::Unsigned
                | Tag::Void
        )
    }

    /// Storage classes, qualifiers and other words that modify a declaration.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Tag::Auto
                | Tag::Const
                | Tag::Extern
                | Tag::Inline
                | Tag::Register
                | Tag::Static
                | Tag::Typedef
                | Tag::Volatile
                | Tag::Virtual
                | Tag::Public
                | Tag::Private
                | Tag::Protected
        )
    }

    pub fn is_visibility(self) -> bool {
        matches!(self, Tag::Public | Tag::Private | Tag::Protected)
    }

    /// Macro invocations that must not survive into the finished tree.
    pub fn is_call_site(self) -> bool {
        matches!(self, Tag::MacroCall | Tag::ExpandCall)
    }

    pub fn is_expansion(self) -> bool {
        matches!(
            self,
            Tag::ItemExpansion
                | Tag::MemberExpansion
                | Tag::StatementExpansion
                | Tag::ExpressionExpansion
        )
    }

    /// Human readable name used in diagnostics.
    ///
    /// Symbols and keywords render as their quoted source text; constructs use a short noun.
    pub fn describe(self) -> String {
        if let Some(text) = symbol_text(self) {
            return format!("`{}`", text);
        }
        if let Some(text) = keyword_text(self) {
            return format!("`{}`", text);
        }
        self.label().to_string()
    }

    pub fn label(self) -> &'static str {
        match self {
            Tag::Newline => "newline",
            Tag::Whitespace => "whitespace",
            Tag::LineComment | Tag::BlockComment => "comment",
            Tag::Continuation => "line continuation",
            Tag::Identifier => "identifier",
            Tag::ConstructName => "construct name",
            Tag::IntLiteral | Tag::HexLiteral => "integer literal",
            Tag::FloatLiteral => "floating literal",
            Tag::CharLiteral => "character literal",
            Tag::StringLiteral => "string literal",
            Tag::WideStringLiteral => "wide string literal",
            Tag::Directive => "preprocessor directive",
            Tag::SectionBreak => "section separator",
            Tag::Unknown => "unknown character",
            Tag::File | Tag::DialectFile => "file",
            Tag::Preprocessor => "preprocessor line",
            Tag::Parens => "parenthesized group",
            Tag::Brackets => "bracketed group",
            Tag::Braces => "braced group",
            Tag::MacroDef => "macro definition",
            Tag::MacroParams => "macro parameter list",
            Tag::MacroBody => "macro body",
            Tag::MacroCall => "macro call",
            Tag::ExpandCall => "expand call",
            Tag::Arguments => "argument list",
            Tag::Argument => "argument",
            Tag::ItemExpansion
            | Tag::MemberExpansion
            | Tag::StatementExpansion
            | Tag::ExpressionExpansion => "macro expansion",
            Tag::ObjectDef => "object definition",
            Tag::BaseList => "base list",
            Tag::ObjectBody => "object body",
            Tag::VisibilityLabel => "visibility label",
            Tag::UserConstruct => "user construct",
            Tag::StateMachine => "state machine",
            Tag::StateBody => "state machine body",
            Tag::StateDef => "state definition",
            Tag::Transition => "transition",
            Tag::InitialState => "initial state",
            Tag::EnumDef => "enum definition",
            Tag::EnumBody => "enum body",
            Tag::Enumerator => "enumerator",
            Tag::Record => "struct or union",
            Tag::RecordBody => "struct body",
            Tag::Function => "function definition",
            Tag::TypeSpec => "type specification",
            Tag::ParamList => "parameter list",
            Tag::Param => "parameter",
            Tag::Body => "function body",
            Tag::Block => "block",
            Tag::Declaration => "declaration",
            Tag::Initializer => "initializer",
            Tag::ScopeRef => "scoped name",
            Tag::TemplateRef => "template reference",
            Tag::PointerType => "pointer type",
            Tag::Statement => "statement",
            Tag::IfStatement => "if statement",
            Tag::WhileStatement => "while loop",
            Tag::ForStatement => "for loop",
            Tag::ForHeader => "for header",
            Tag::ForClause => "for clause",
            Tag::DoWhileStatement => "do-while loop",
            Tag::SwitchStatement => "switch statement",
            Tag::Jump => "jump statement",
            Tag::Label => "label",
            Tag::CaseLabel => "case label",
            Tag::Condition => "condition",
            Tag::Call => "call",
            Tag::Group => "parenthesized expression",
            Tag::Index => "index expression",
            Tag::InitList => "initializer list",
            Tag::ConstructDecl => "construct declaration",
            Tag::NoteDef => "note",
            Tag::MapDef => "map",
            Tag::DialectBody => "dialect body",
            Tag::Entry => "entry",
            _ if self.is_symbol() => "symbol",
            _ => "keyword",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivia() {
        assert!(Tag::Whitespace.is_trivia());
        assert!(Tag::BlockComment.is_trivia());
        assert!(Tag::Continuation.is_trivia());
        assert!(!Tag::Identifier.is_trivia());
        assert!(!Tag::Semicolon.is_trivia());
    }

    #[test]
    fn test_lexical_boundary() {
        assert!(Tag::Newline.is_lexical());
        assert!(Tag::Backslash.is_lexical());
        assert!(Tag::Map.is_lexical());
        assert!(!Tag::File.is_lexical());
        assert!(!Tag::Entry.is_lexical());
    }

    #[test]
    fn test_describe() {
        assert_eq!(Tag::Semicolon.describe(), "`;`");
        assert_eq!(Tag::Scope.describe(), "`::`");
        assert_eq!(Tag::While.describe(), "`while`");
        assert_eq!(Tag::Function.describe(), "function definition");
    }
}
