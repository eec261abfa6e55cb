//! Concrete syntax tree. Mirrors the surface grammar one production per node,
//! keeping literal text and source positions; the builder reshapes it into the AST.

use crate::syntax::ast::{Opcode, Operator, Span};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyntaxTree {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `to name :a :b ... end`
    Definition { name: String, params: Vec<String>, body: Vec<Statement>, span: Span },
    /// Built-in command word followed by its arguments.
    Command { opcode: Opcode, args: Vec<Argument>, span: Span },
    /// User procedure invocation.
    Call { name: String, args: Vec<Expr>, span: Span },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Expr(Expr),
    /// `[ statement* ]`
    Block(Vec<Statement>),
    /// `[ x y ]`
    Point(Expr, Expr),
    Colour(ColourArg),
    /// `"name`
    Word(String, Span),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColourArg {
    Word(String, Span),
    Rgb(Box<[Expr; 3]>),
    Index(Expr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    NotEq,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(String, Span),
    Variable(String, Span),
    /// `thing "name`
    Thing(String, Span),
    Infix { op: InfixOp, left: Box<Expr>, right: Box<Expr>, span: Span },
    Negate { operand: Box<Expr>, span: Span },
    /// `sum a b`, or the variadic `(sum a b c)` form.
    Prefix { op: Operator, args: Vec<Expr>, span: Span },
    /// `( expr )`
    Group(Box<Expr>, Span),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Self::Number(_, s)
            | Self::Variable(_, s)
            | Self::Thing(_, s)
            | Self::Group(_, s) => *s,
            Self::Infix { span, .. }
            | Self::Negate { span, .. }
            | Self::Prefix { span, .. } => *span,
        }
    }
}
