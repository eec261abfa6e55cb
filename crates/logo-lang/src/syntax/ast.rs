//! The node model. Built once by the AST builder, immutable afterwards.
//!
//! `Display` on every node produces the canonical parenthesised-prefix form:
//! `sum 4 3.2` prints as `(sum (4) (3.2))`.

use std::fmt;
use std::rc::Rc;

use crate::types::draw::Colour;

/// Source location attached to every command for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

// ─── Statements ──────────────────────────────────────────────────────────────

/// Top-level statement sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Command>,
}

/// Bracketed statement sequence used by control flow and procedure bodies.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandBlock {
    pub statements: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub op: CommandOp,
    pub args: Vec<Operand>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOp {
    Builtin(Opcode),
    /// User procedure, resolved by (name, argument count) when executed.
    Call(String),
}

/// Closed set of built-in statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Forward,
    Back,
    Right,
    Left,
    SetXY,
    SetPos,
    SetX,
    SetY,
    SetHeading,
    PenUp,
    PenDown,
    SetPenSize,
    SetPenColor,
    SetPalette,
    Arc,
    If,
    IfElse,
    Repeat,
    Forever,
    Home,
    Make,
    Show,
    Stop,
    Bye,
    To,
}

impl Opcode {
    /// Resolves a lower-cased command word, aliases included.
    pub fn from_keyword(word: &str) -> Option<Self> {
        Some(match word {
            "forward" | "fd"                => Self::Forward,
            "back" | "bk" | "backward"      => Self::Back,
            "right" | "rt"                  => Self::Right,
            "left" | "lt"                   => Self::Left,
            "setxy"                         => Self::SetXY,
            "setpos"                        => Self::SetPos,
            "setx"                          => Self::SetX,
            "sety"                          => Self::SetY,
            "setheading" | "seth"           => Self::SetHeading,
            "penup" | "pu"                  => Self::PenUp,
            "pendown" | "pd"                => Self::PenDown,
            "setpensize" | "setpenwidth"    => Self::SetPenSize,
            "setpencolor" | "setpc"         => Self::SetPenColor,
            "setpalette"                    => Self::SetPalette,
            "arc"                           => Self::Arc,
            "if"                            => Self::If,
            "ifelse"                        => Self::IfElse,
            "repeat"                        => Self::Repeat,
            "forever"                       => Self::Forever,
            "home"                          => Self::Home,
            "make"                          => Self::Make,
            "show"                          => Self::Show,
            "stop"                          => Self::Stop,
            "bye"                           => Self::Bye,
            "to"                            => Self::To,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Forward     => "forward",
            Self::Back        => "back",
            Self::Right       => "right",
            Self::Left        => "left",
            Self::SetXY       => "setxy",
            Self::SetPos      => "setpos",
            Self::SetX        => "setx",
            Self::SetY        => "sety",
            Self::SetHeading  => "setheading",
            Self::PenUp       => "penup",
            Self::PenDown     => "pendown",
            Self::SetPenSize  => "setpensize",
            Self::SetPenColor => "setpencolor",
            Self::SetPalette  => "setpalette",
            Self::Arc         => "arc",
            Self::If          => "if",
            Self::IfElse      => "ifelse",
            Self::Repeat      => "repeat",
            Self::Forever     => "forever",
            Self::Home        => "home",
            Self::Make        => "make",
            Self::Show        => "show",
            Self::Stop        => "stop",
            Self::Bye         => "bye",
            Self::To          => "to",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Expr(Expression),
    Block(CommandBlock),
    Point(PointExpr),
    Colour(ColourSpec),
    /// Quoted variable name, as in `make "size 10`.
    Name(String),
    Definition(Rc<ProcedureDef>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureDef {
    pub name: String,
    pub params: Vec<String>,
    pub body: CommandBlock,
}

// ─── Expressions ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(f32),
    /// Resolved against the top scope frame when evaluated; unbound reads as 0.
    Variable(String),
    Apply { op: Operator, operands: Vec<Expression> },
}

impl Expression {
    pub fn apply(op: Operator, operands: Vec<Expression>) -> Self {
        Self::Apply { op, operands }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointExpr {
    pub x: Expression,
    pub y: Expression,
}

/// Colour operand. Index and RGB forms resolve at run time since palette slots are mutable.
#[derive(Debug, Clone, PartialEq)]
pub enum ColourSpec {
    Palette(Expression),
    Rgb([Expression; 3]),
    Literal(Colour),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Sum,
    Difference,
    Minus,
    Product,
    Quotient,
    Power,
    Remainder,
    Modulo,
    Abs,
    Int,
    Round,
    Sqrt,
    Exp,
    Ln,
    Log10,
    Sin,
    Cos,
    Tan,
    RadSin,
    RadCos,
    RadTan,
    ArcTan,
    RadArcTan,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,
    And,
    Or,
    Xor,
    Not,
    True,
    False,
}

/// Number of operands an operator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    OneOrTwo,
    Any,
}

impl Arity {
    pub fn accepts(self, n: usize) -> bool {
        match self {
            Self::Exactly(k) => n == k,
            Self::OneOrTwo   => n == 1 || n == 2,
            Self::Any        => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(k) => write!(f, "{k}"),
            Self::OneOrTwo   => write!(f, "1 or 2"),
            Self::Any        => write!(f, "any number of"),
        }
    }
}

impl Operator {
    /// Resolves a lower-cased prefix operator name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sum"                             => Self::Sum,
            "difference"                      => Self::Difference,
            "minus"                           => Self::Minus,
            "product"                         => Self::Product,
            "quotient"                        => Self::Quotient,
            "power"                           => Self::Power,
            "remainder"                       => Self::Remainder,
            "modulo"                          => Self::Modulo,
            "abs"                             => Self::Abs,
            "int"                             => Self::Int,
            "round"                           => Self::Round,
            "sqrt"                            => Self::Sqrt,
            "exp"                             => Self::Exp,
            "ln"                              => Self::Ln,
            "log10"                           => Self::Log10,
            "sin"                             => Self::Sin,
            "cos"                             => Self::Cos,
            "tan"                             => Self::Tan,
            "radsin"                          => Self::RadSin,
            "radcos"                          => Self::RadCos,
            "radtan"                          => Self::RadTan,
            "arctan"                          => Self::ArcTan,
            "radarctan"                       => Self::RadArcTan,
            "less?" | "lessp"                 => Self::Less,
            "greater?" | "greaterp"           => Self::Greater,
            "lessequal?" | "lessequalp"       => Self::LessEqual,
            "greaterequal?" | "greaterequalp" => Self::GreaterEqual,
            "equal?" | "equalp"               => Self::Equal,
            "notequal?" | "notequalp"         => Self::NotEqual,
            "and"                             => Self::And,
            "or"                              => Self::Or,
            "xor"                             => Self::Xor,
            "not"                             => Self::Not,
            "true"                            => Self::True,
            "false"                           => Self::False,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sum          => "sum",
            Self::Difference   => "difference",
            Self::Minus        => "minus",
            Self::Product      => "product",
            Self::Quotient     => "quotient",
            Self::Power        => "power",
            Self::Remainder    => "remainder",
            Self::Modulo       => "modulo",
            Self::Abs          => "abs",
            Self::Int          => "int",
            Self::Round        => "round",
            Self::Sqrt         => "sqrt",
            Self::Exp          => "exp",
            Self::Ln           => "ln",
            Self::Log10        => "log10",
            Self::Sin          => "sin",
            Self::Cos          => "cos",
            Self::Tan          => "tan",
            Self::RadSin       => "radsin",
            Self::RadCos       => "radcos",
            Self::RadTan       => "radtan",
            Self::ArcTan       => "arctan",
            Self::RadArcTan    => "radarctan",
            Self::Less         => "less?",
            Self::Greater      => "greater?",
            Self::LessEqual    => "lessEqual?",
            Self::GreaterEqual => "greaterEqual?",
            Self::Equal        => "equal?",
            Self::NotEqual     => "notEqual?",
            Self::And          => "and",
            Self::Or           => "or",
            Self::Xor          => "xor",
            Self::Not          => "not",
            Self::True         => "true",
            Self::False        => "false",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Self::Sum | Self::Product | Self::And | Self::Or | Self::Xor => Arity::Any,
            Self::Quotient | Self::ArcTan | Self::RadArcTan => Arity::OneOrTwo,
            Self::True | Self::False => Arity::Exactly(0),
            Self::Difference | Self::Power | Self::Remainder | Self::Modulo
            | Self::Less | Self::Greater | Self::LessEqual | Self::GreaterEqual
            | Self::Equal | Self::NotEqual => Arity::Exactly(2),
            Self::Minus | Self::Abs | Self::Int | Self::Round | Self::Sqrt | Self::Exp
            | Self::Ln | Self::Log10 | Self::Sin | Self::Cos | Self::Tan
            | Self::RadSin | Self::RadCos | Self::RadTan | Self::Not => Arity::Exactly(1),
        }
    }
}

// ─── Display ─────────────────────────────────────────────────────────────────

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Variable(name) => write!(f, ":{name}"),
            Self::Apply { op, operands } if operands.is_empty() => f.write_str(op.name()),
            Self::Apply { op, operands } => {
                write!(f, "({}", op.name())?;
                for operand in operands {
                    write!(f, " ({operand})")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for PointExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}]", self.x, self.y)
    }
}

impl fmt::Display for ColourSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Palette(index) => write!(f, "(palette ({index}))"),
            Self::Rgb([r, g, b]) => write!(f, "[{r} {g} {b}]"),
            Self::Literal(c) => write!(f, "{}", c.to_hex()),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expr(e) => write!(f, "{e}"),
            Self::Block(b) => write!(f, "{b}"),
            Self::Point(p) => write!(f, "{p}"),
            Self::Colour(c) => write!(f, "{c}"),
            Self::Name(n) => write!(f, "\"{n}"),
            Self::Definition(d) => write!(f, "{d}"),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // A definition prints as its own `to ... end` form.
        if let [Operand::Definition(def)] = self.args.as_slice() {
            return write!(f, "{def}");
        }
        let keyword = match &self.op {
            CommandOp::Builtin(op) => op.name(),
            CommandOp::Call(name) => name.as_str(),
        };
        if self.args.is_empty() {
            return f.write_str(keyword);
        }
        write!(f, "({keyword}")?;
        for arg in &self.args {
            write!(f, " ({arg})")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for CommandBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        write_lines(f, &self.statements)?;
        f.write_str("]")
    }
}

impl fmt::Display for ProcedureDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "to {}", self.name)?;
        for p in &self.params {
            write!(f, " :{p}")?;
        }
        f.write_str("\n")?;
        for stmt in &self.body.statements {
            writeln!(f, "{stmt}")?;
        }
        f.write_str("end")
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_lines(f, &self.statements)
    }
}

fn write_lines(f: &mut fmt::Formatter<'_>, statements: &[Command]) -> fmt::Result {
    for (i, stmt) in statements.iter().enumerate() {
        if i > 0 { f.write_str("\n")?; }
        write!(f, "{stmt}")?;
    }
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f32) -> Expression { Expression::Number(n) }

    #[test]
    fn nested_expression_display() {
        let e = Expression::apply(
            Operator::Sum,
            vec![Expression::apply(Operator::Product, vec![num(2.0), num(3.0)]), num(4.0)],
        );
        assert_eq!(e.to_string(), "(sum ((product (2) (3))) (4))");
    }

    #[test]
    fn nullary_operator_prints_bare_name() {
        assert_eq!(Expression::apply(Operator::True, vec![]).to_string(), "true");
    }

    #[test]
    fn variable_display() {
        assert_eq!(Expression::Variable("size".into()).to_string(), ":size");
    }

    #[test]
    fn comparison_names_are_camel_case() {
        assert_eq!(Operator::LessEqual.name(), "lessEqual?");
        assert_eq!(Operator::from_name("lessequal?"), Some(Operator::LessEqual));
        assert_eq!(Operator::from_name("greaterp"), Some(Operator::Greater));
    }

    #[test]
    fn opcode_aliases() {
        assert_eq!(Opcode::from_keyword("fd"), Some(Opcode::Forward));
        assert_eq!(Opcode::from_keyword("backward"), Some(Opcode::Back));
        assert_eq!(Opcode::from_keyword("seth"), Some(Opcode::SetHeading));
        assert_eq!(Opcode::from_keyword("setpc"), Some(Opcode::SetPenColor));
        assert_eq!(Opcode::from_keyword("star"), None);
    }

    #[test]
    fn arity_acceptance() {
        assert!(Operator::Sum.arity().accepts(9));
        assert!(Operator::Quotient.arity().accepts(1));
        assert!(!Operator::Quotient.arity().accepts(3));
        assert!(!Operator::Difference.arity().accepts(1));
        assert_eq!(Operator::ArcTan.arity().to_string(), "1 or 2");
    }

    #[test]
    fn command_display() {
        let cmd = Command {
            op: CommandOp::Builtin(Opcode::Repeat),
            args: vec![
                Operand::Expr(num(4.0)),
                Operand::Block(CommandBlock {
                    statements: vec![Command {
                        op: CommandOp::Builtin(Opcode::Forward),
                        args: vec![Operand::Expr(num(10.0))],
                        span: Span::default(),
                    }],
                }),
            ],
            span: Span::default(),
        };
        assert_eq!(cmd.to_string(), "(repeat (4) ([(forward (10))]))");
    }

    #[test]
    fn definition_display() {
        let def = ProcedureDef {
            name: "square".into(),
            params: vec!["size".into()],
            body: CommandBlock {
                statements: vec![Command {
                    op: CommandOp::Builtin(Opcode::Forward),
                    args: vec![Operand::Expr(Expression::Variable("size".into()))],
                    span: Span::default(),
                }],
            },
        };
        assert_eq!(def.to_string(), "to square :size\n(forward (:size))\nend");
    }
}
