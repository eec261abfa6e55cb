use crate::syntax::ast::Arity;

/// Error codes prefixed by phase: L = lexer, P = parser, B = AST builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    // Lexer
    L001, // unexpected character
    L002, // empty word or variable name

    // Parser
    P001, // unexpected token
    P002, // missing expected token
    P003, // reserved word used as procedure name
    P004, // procedure definition outside top level
    P005, // procedure call used as a value

    // AST builder
    B001, // malformed hex colour
    B002, // unknown colour name
    B003, // malformed number literal
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::L001 => "L001",
            Self::L002 => "L002",
            Self::P001 => "P001",
            Self::P002 => "P002",
            Self::P003 => "P003",
            Self::P004 => "P004",
            Self::P005 => "P005",
            Self::B001 => "B001",
            Self::B002 => "B002",
            Self::B003 => "B003",
        }
    }
}

/// A build-time error. Raised before anything runs.
#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl Error {
    pub fn new(code: ErrorCode, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self { code, line, column, message: message.into() }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}:{}: {}", self.code.as_str(), self.line, self.column, self.message)
    }
}

impl std::error::Error for Error {}

// ─────────────────────────────────────────────────────────────────────────────

/// Everything that can abort a run once execution has started.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeErrorKind {
    #[error("division by zero")]
    DivideByZero,
    #[error("palette index {0} is outside 0..=15")]
    PaletteIndex(f32),
    #[error("colour intensity {0} is outside 0..=99")]
    ColourIntensity(f32),
    #[error("pen size {0} must be at least 1")]
    InvalidPenSize(f32),
    #[error("`{op}` expects {expected} operand(s), found {found}")]
    Arity { op: String, expected: Arity, found: usize },
    #[error("operand {index} of `{op}` must be {expected}")]
    TypeMismatch { op: String, index: usize, expected: &'static str },
    #[error("no procedure `{name}` taking {arity} argument(s)")]
    UndefinedProcedure { name: String, arity: usize },
    #[error("`stop` used outside of a procedure")]
    StopOutsideProcedure,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("[runtime] line {line}: {kind}")]
pub struct RuntimeError {
    pub line: usize,
    pub kind: RuntimeErrorKind,
}

impl RuntimeError {
    pub fn new(line: usize, kind: RuntimeErrorKind) -> Self {
        Self { line, kind }
    }
}
