use {
    maplit::hashmap,
    std::{collections::HashMap, sync::OnceLock},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,

    // Literals. `String` doubles as the reserved word `string`, matching the
    // reference Pascal token set.
    Identifier,
    Integer,
    Real,
    String,

    // One or two character operators.
    PlusOp,
    PlusEqual,
    MinusOp,
    MinusEqual,
    MultOp,
    MultEqual,
    DivOp,
    DivEqual,
    Assign,
    Equal,
    Ne,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Carat,

    // Punctuation.
    Semicolon,
    Comma,
    Colon,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,

    // Block comment markers, one pair per nesting level.
    LeftComment,
    RightComment,

    // Keywords
    KwAnd,
    KwArray,
    KwAsm,
    KwBegin,
    KwBreak,
    KwCase,
    KwConst,
    KwConstructor,
    KwContinue,
    KwDestructor,
    KwDiv,
    KwDo,
    KwDownto,
    KwElse,
    KwEnd,
    KwFalse,
    KwFile,
    KwFor,
    KwFunction,
    KwGoto,
    KwIf,
    KwImplementation,
    KwIn,
    KwInline,
    KwInterface,
    KwLabel,
    KwMod,
    KwNil,
    KwNot,
    KwObject,
    KwOf,
    KwOn,
    KwOperator,
    KwOr,
    KwPacked,
    KwProcedure,
    KwProgram,
    KwRecord,
    KwRepeat,
    KwSet,
    KwShl,
    KwShr,
    KwThen,
    KwTo,
    KwTrue,
    KwType,
    KwUnit,
    KwUntil,
    KwUses,
    KwVar,
    KwWhile,
    KwWith,
    KwXor,
}

impl TokenKind {
    /// Stable display name, printed one per line by the driver.
    pub const fn name(&self) -> &'static str {
        match self {
            TokenKind::Eof => "END_OF_FILE",

            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Integer => "INTEGER",
            TokenKind::Real => "REAL",
            TokenKind::String => "STRING",

            TokenKind::PlusOp => "PLUSOP",
            TokenKind::PlusEqual => "PLUSEQUAL",
            TokenKind::MinusOp => "MINUSOP",
            TokenKind::MinusEqual => "MINUSEQUAL",
            TokenKind::MultOp => "MULTOP",
            TokenKind::MultEqual => "MULTEQUAL",
            TokenKind::DivOp => "DIVOP",
            TokenKind::DivEqual => "DIVEQUAL",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Equal => "EQUAL",
            TokenKind::Ne => "NE",
            TokenKind::Lt => "LT",
            TokenKind::LtEq => "LTEQ",
            TokenKind::Gt => "GT",
            TokenKind::GtEq => "GTEQ",
            TokenKind::Carat => "CARAT",

            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Comma => "COMMA",
            TokenKind::Colon => "COLON",
            TokenKind::LeftParen => "LPAREN",
            TokenKind::RightParen => "RPAREN",
            TokenKind::LeftBracket => "LBRACKET",
            TokenKind::RightBracket => "RBRACKET",
            TokenKind::LeftBrace => "LBRACE",
            TokenKind::RightBrace => "RBRACE",

            TokenKind::LeftComment => "LCOMMENT",
            TokenKind::RightComment => "RCOMMENT",

            TokenKind::KwAnd => "AND",
            TokenKind::KwArray => "ARRAY",
            TokenKind::KwAsm => "ASM",
            TokenKind::KwBegin => "BEGIN",
            TokenKind::KwBreak => "BREAK",
            TokenKind::KwCase => "CASE",
            TokenKind::KwConst => "CONST",
            TokenKind::KwConstructor => "CONSTRUCTOR",
            TokenKind::KwContinue => "CONTINUE",
            TokenKind::KwDestructor => "DESTRUCTOR",
            TokenKind::KwDiv => "DIV",
            TokenKind::KwDo => "DO",
            TokenKind::KwDownto => "DOWNTO",
            TokenKind::KwElse => "ELSE",
            TokenKind::KwEnd => "END",
            TokenKind::KwFalse => "FALSE",
            // The trailing underscore is the reference spelling.
            TokenKind::KwFile => "FILE_",
            TokenKind::KwFor => "FOR",
            TokenKind::KwFunction => "FUNCTION",
            TokenKind::KwGoto => "GOTO",
            TokenKind::KwIf => "IF",
            TokenKind::KwImplementation => "IMPLEMENTATION",
            TokenKind::KwIn => "IN",
            TokenKind::KwInline => "INLINE",
            TokenKind::KwInterface => "INTERFACE",
            TokenKind::KwLabel => "LABEL",
            TokenKind::KwMod => "MOD",
            TokenKind::KwNil => "NIL",
            TokenKind::KwNot => "NOT",
            TokenKind::KwObject => "OBJECT",
            TokenKind::KwOf => "OF",
            TokenKind::KwOn => "ON",
            TokenKind::KwOperator => "OPERATOR",
            TokenKind::KwOr => "OR",
            TokenKind::KwPacked => "PACKED",
            TokenKind::KwProcedure => "PROCEDURE",
            TokenKind::KwProgram => "PROGRAM",
            TokenKind::KwRecord => "RECORD",
            TokenKind::KwRepeat => "REPEAT",
            TokenKind::KwSet => "SET",
            TokenKind::KwShl => "SHL",
            TokenKind::KwShr => "SHR",
            TokenKind::KwThen => "THEN",
            TokenKind::KwTo => "TO",
            TokenKind::KwTrue => "TRUE",
            TokenKind::KwType => "TYPE",
            TokenKind::KwUnit => "UNIT",
            TokenKind::KwUntil => "UNTIL",
            TokenKind::KwUses => "USES",
            TokenKind::KwVar => "VAR",
            TokenKind::KwWhile => "WHILE",
            TokenKind::KwWith => "WITH",
            TokenKind::KwXor => "XOR",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Reserved words, uppercase spelling to token kind. Identifier lexemes are
/// uppercased before lookup, which makes keyword matching case-insensitive.
pub fn keywords() -> &'static HashMap<&'static str, TokenKind> {
    static KEYWORDS: OnceLock<HashMap<&'static str, TokenKind>> = OnceLock::new();
    KEYWORDS.get_or_init(|| {
        hashmap! {
            "AND" => TokenKind::KwAnd,
            "ARRAY" => TokenKind::KwArray,
            "ASM" => TokenKind::KwAsm,
            "BEGIN" => TokenKind::KwBegin,
            "BREAK" => TokenKind::KwBreak,
            "CASE" => TokenKind::KwCase,
            "CONST" => TokenKind::KwConst,
            "CONSTRUCTOR" => TokenKind::KwConstructor,
            "CONTINUE" => TokenKind::KwContinue,
            "DESTRUCTOR" => TokenKind::KwDestructor,
            "DIV" => TokenKind::KwDiv,
            "DO" => TokenKind::KwDo,
            "DOWNTO" => TokenKind::KwDownto,
            "ELSE" => TokenKind::KwElse,
            "END" => TokenKind::KwEnd,
            "FALSE" => TokenKind::KwFalse,
            "FILE" => TokenKind::KwFile,
            "FOR" => TokenKind::KwFor,
            "FUNCTION" => TokenKind::KwFunction,
            "GOTO" => TokenKind::KwGoto,
            "IF" => TokenKind::KwIf,
            "IMPLEMENTATION" => TokenKind::KwImplementation,
            "IN" => TokenKind::KwIn,
            "INLINE" => TokenKind::KwInline,
            "INTERFACE" => TokenKind::KwInterface,
            "LABEL" => TokenKind::KwLabel,
            "MOD" => TokenKind::KwMod,
            "NIL" => TokenKind::KwNil,
            "NOT" => TokenKind::KwNot,
            "OBJECT" => TokenKind::KwObject,
            "OF" => TokenKind::KwOf,
            "ON" => TokenKind::KwOn,
            "OPERATOR" => TokenKind::KwOperator,
            "OR" => TokenKind::KwOr,
            "PACKED" => TokenKind::KwPacked,
            "PROCEDURE" => TokenKind::KwProcedure,
            "PROGRAM" => TokenKind::KwProgram,
            "RECORD" => TokenKind::KwRecord,
            "REPEAT" => TokenKind::KwRepeat,
            "SET" => TokenKind::KwSet,
            "SHL" => TokenKind::KwShl,
            "SHR" => TokenKind::KwShr,
            "STRING" => TokenKind::String,
            "THEN" => TokenKind::KwThen,
            "TO" => TokenKind::KwTo,
            "TRUE" => TokenKind::KwTrue,
            "TYPE" => TokenKind::KwType,
            "UNIT" => TokenKind::KwUnit,
            "UNTIL" => TokenKind::KwUntil,
            "USES" => TokenKind::KwUses,
            "VAR" => TokenKind::KwVar,
            "WHILE" => TokenKind::KwWhile,
            "WITH" => TokenKind::KwWith,
            "XOR" => TokenKind::KwXor,
        }
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourcePosition {
    pub line: usize,
    pub span: std::ops::Range<usize>,
}

impl std::fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}..{}]", self.line, self.span.start, self.span.end)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub lexeme: &'src str,
    pub position: SourcePosition,
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}
