#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Number(String),   // source text, converted by the AST builder
    Word(String),     // `"name` without the quote, case preserved
    Variable(String), // `:name` without the colon, lower-cased
    Ident(String),    // lower-cased

    // Keywords
    To,
    End,
    Thing,

    // Operators
    Plus,       // +
    Minus,      // -  (binary, or unary when followed by whitespace)
    Negate,     // -  glued to its operand after whitespace: `fd -10`
    Star,       // *
    Slash,      // /
    Percent,    // %
    Caret,      // ^
    Lt,         // <
    LtEq,       // <=
    Gt,         // >
    GtEq,       // >=
    Eq,         // =
    NotEq,      // <>

    // Punctuation
    LParen,     // (
    RParen,     // )
    LBracket,   // [
    RBracket,   // ]

    Eof,
}

impl TokenKind {
    pub fn is_keyword(&self) -> bool {
        matches!(self, Self::To | Self::End | Self::Thing)
    }
}

/// Maps a lower-cased identifier to its keyword token, or returns `Ident`.
pub fn keyword_or_ident(s: String) -> TokenKind {
    match s.as_str() {
        "to"    => TokenKind::To,
        "end"   => TokenKind::End,
        "thing" => TokenKind::Thing,
        _       => TokenKind::Ident(s),
    }
}

// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }
}
