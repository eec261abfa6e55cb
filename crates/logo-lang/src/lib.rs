pub mod syntax;
pub mod types;
pub mod runtime;
pub mod error;

pub use error::{Error, ErrorCode, RuntimeError, RuntimeErrorKind};
pub use runtime::context::ExecutionContext;
pub use runtime::interpreter::{Flow, Interpreter};
pub use syntax::ast::{
    ColourSpec, Command, CommandBlock, CommandOp, Expression, Opcode, Operand, Operator,
    PointExpr, ProcedureDef, Program, Span,
};
pub use syntax::token::{Token, TokenKind};
pub use types::draw::{Arc, Colour, Line, Point, Primitive};

use syntax::{builder, cst::SyntaxTree, lexer::Lexer, parser::Parser};

// ─── Public API ───────────────────────────────────────────────────────────────

/// Lex and parse source text into its concrete syntax tree.
pub fn parse(source: &str) -> Result<SyntaxTree, Vec<Error>> {
    let tokens = Lexer::new(source).tokenize()?;
    Parser::new(tokens).parse()
}

/// Parse and build a program. Every build-time error is reported at once.
pub fn compile(source: &str) -> Result<Program, Vec<Error>> {
    let program = builder::build(parse(source)?)?;
    log::debug!("compiled {} top-level statements", program.statements.len());
    Ok(program)
}

/// Compile a single standalone expression such as `2 * 3 + 4`.
pub fn compile_expression(source: &str) -> Result<Expression, Vec<Error>> {
    let tokens = Lexer::new(source).tokenize()?;
    let expr = Parser::new(tokens).parse_expression()?;
    builder::build_expression(expr)
}

/// Run a program in a fresh context. The returned context holds the recorded
/// canvas and `show` transcript.
///
/// Recursion depth is bounded only by the host stack; very deep Logo recursion
/// can overflow it.
pub fn execute(program: &Program) -> Result<ExecutionContext, RuntimeError> {
    let mut interp = Interpreter::new();
    interp.run(program)?;
    let ctx = interp.into_context();
    log::debug!("run finished with {} primitives", ctx.canvas().len());
    Ok(ctx)
}
