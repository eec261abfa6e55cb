//! CST → AST. One rule per syntax production.
//!
//! Besides reshaping, the builder converts number literal text to `f32` and
//! validates colour words, so malformed literals never reach the interpreter.

use std::rc::Rc;

use crate::error::{Error, ErrorCode};
use crate::syntax::ast::{
    ColourSpec, Command, CommandBlock, CommandOp, Expression, Opcode, Operand, Operator,
    PointExpr, ProcedureDef, Program, Span,
};
use crate::syntax::cst::{self, Argument, ColourArg, InfixOp, Statement, SyntaxTree};
use crate::types::draw::Colour;
use crate::types::palette::named_colour;

pub fn build(tree: SyntaxTree) -> Result<Program, Vec<Error>> {
    let mut builder = AstBuilder::default();
    let statements = builder.statements(tree.statements);
    builder.finish(Program { statements })
}

pub fn build_expression(expr: cst::Expr) -> Result<Expression, Vec<Error>> {
    let mut builder = AstBuilder::default();
    let expression = builder.expression(expr);
    builder.finish(expression)
}

/// Resolves a colour word: `#rrggbb` or a name from the colour table.
pub fn colour_word(word: &str, span: Span) -> Result<Colour, Error> {
    if word.starts_with('#') {
        Colour::from_hex(word).ok_or_else(|| Error::new(ErrorCode::B001, span.line, span.column,
            format!("`{word}` is not a #rrggbb colour")))
    } else {
        named_colour(word).ok_or_else(|| Error::new(ErrorCode::B002, span.line, span.column,
            format!("unknown colour name `{word}`")))
    }
}

fn infix_operator(op: InfixOp) -> Operator {
    match op {
        InfixOp::Add   => Operator::Sum,
        InfixOp::Sub   => Operator::Difference,
        InfixOp::Mul   => Operator::Product,
        InfixOp::Div   => Operator::Quotient,
        InfixOp::Rem   => Operator::Remainder,
        InfixOp::Pow   => Operator::Power,
        InfixOp::Lt    => Operator::Less,
        InfixOp::Gt    => Operator::Greater,
        InfixOp::LtEq  => Operator::LessEqual,
        InfixOp::GtEq  => Operator::GreaterEqual,
        InfixOp::Eq    => Operator::Equal,
        InfixOp::NotEq => Operator::NotEqual,
    }
}

/// Collects every error in the tree; failed nodes are replaced with placeholders.
#[derive(Default)]
struct AstBuilder {
    errors: Vec<Error>,
}

impl AstBuilder {
    fn finish<T>(self, value: T) -> Result<T, Vec<Error>> {
        if self.errors.is_empty() { Ok(value) } else { Err(self.errors) }
    }

    fn statements(&mut self, stmts: Vec<Statement>) -> Vec<Command> {
        stmts.into_iter().map(|s| self.statement(s)).collect()
    }

    fn block(&mut self, stmts: Vec<Statement>) -> CommandBlock {
        CommandBlock { statements: self.statements(stmts) }
    }

    fn statement(&mut self, stmt: Statement) -> Command {
        match stmt {
            Statement::Definition { name, params, body, span } => {
                let def = ProcedureDef { name, params, body: self.block(body) };
                Command {
                    op: CommandOp::Builtin(Opcode::To),
                    args: vec![Operand::Definition(Rc::new(def))],
                    span,
                }
            }
            Statement::Command { opcode, args, span } => Command {
                op: CommandOp::Builtin(opcode),
                args: args.into_iter().map(|a| self.argument(a)).collect(),
                span,
            },
            Statement::Call { name, args, span } => Command {
                op: CommandOp::Call(name),
                args: args.into_iter().map(|a| Operand::Expr(self.expression(a))).collect(),
                span,
            },
        }
    }

    fn argument(&mut self, arg: Argument) -> Operand {
        match arg {
            Argument::Expr(e) => Operand::Expr(self.expression(e)),
            Argument::Block(stmts) => Operand::Block(self.block(stmts)),
            Argument::Point(x, y) => Operand::Point(PointExpr {
                x: self.expression(x),
                y: self.expression(y),
            }),
            Argument::Colour(c) => Operand::Colour(self.colour(c)),
            Argument::Word(name, _) => Operand::Name(name.to_ascii_lowercase()),
        }
    }

    fn colour(&mut self, arg: ColourArg) -> ColourSpec {
        match arg {
            ColourArg::Word(word, span) => match colour_word(&word, span) {
                Ok(c) => ColourSpec::Literal(c),
                Err(e) => {
                    self.errors.push(e);
                    ColourSpec::Literal(Colour::rgb(0, 0, 0))
                }
            },
            ColourArg::Rgb(rgb) => {
                let [r, g, b] = *rgb;
                ColourSpec::Rgb([self.expression(r), self.expression(g), self.expression(b)])
            }
            ColourArg::Index(e) => ColourSpec::Palette(self.expression(e)),
        }
    }

    fn expression(&mut self, expr: cst::Expr) -> Expression {
        match expr {
            cst::Expr::Number(text, span) => Expression::Number(self.number(&text, span)),
            cst::Expr::Variable(name, _) | cst::Expr::Thing(name, _) => Expression::Variable(name),
            cst::Expr::Infix { op, left, right, .. } => {
                let left = self.expression(*left);
                let right = self.expression(*right);
                Expression::apply(infix_operator(op), vec![left, right])
            }
            cst::Expr::Negate { operand, .. } => {
                Expression::apply(Operator::Minus, vec![self.expression(*operand)])
            }
            cst::Expr::Prefix { op, args, .. } => {
                let operands = args.into_iter().map(|a| self.expression(a)).collect();
                Expression::apply(op, operands)
            }
            cst::Expr::Group(inner, _) => self.expression(*inner),
        }
    }

    fn number(&mut self, text: &str, span: Span) -> f32 {
        match text.parse::<f32>() {
            Ok(n) => n,
            Err(_) => {
                self.errors.push(Error::new(ErrorCode::B003, span.line, span.column,
                    format!("malformed number `{text}`")));
                0.0
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
