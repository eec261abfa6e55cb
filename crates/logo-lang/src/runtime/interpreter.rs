//! Tree-walking interpreter. Executes a `Program` against an `ExecutionContext`.
//!
//! `stop` travels as a `Flow::Stopped` value returned from statement execution
//! and is absorbed at the nearest procedure call. `bye` sets the context's exit
//! flag, which every block checks before its next statement.

use std::rc::Rc;

use log::{debug, info, trace};

use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::runtime::context::ExecutionContext;
use crate::runtime::ops;
use crate::runtime::value::{as_bool, format_number, repeat_count};
use crate::syntax::ast::{
    Arity, ColourSpec, Command, CommandBlock, CommandOp, Expression, Opcode, Operand, PointExpr,
    ProcedureDef, Program,
};
use crate::types::draw::{Colour, Point};
use crate::types::palette::intensity_to_channel;

/// Outcome of executing a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stopped,
}

pub struct Interpreter {
    ctx: ExecutionContext,
    /// Line of the command being executed, attached to runtime errors.
    line: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_context(ExecutionContext::new())
    }

    pub fn with_context(ctx: ExecutionContext) -> Self {
        Self { ctx, line: 0 }
    }

    pub fn context(&self) -> &ExecutionContext { &self.ctx }

    pub fn into_context(self) -> ExecutionContext { self.ctx }

    fn err(&self, kind: RuntimeErrorKind) -> RuntimeError {
        RuntimeError::new(self.line, kind)
    }

    // ─── Entry points ─────────────────────────────────────────────────────────

    /// Runs a whole program. Top-level definitions are registered first so they
    /// can be called before their textual position.
    pub fn run(&mut self, program: &Program) -> Result<(), RuntimeError> {
        for cmd in &program.statements {
            if let [Operand::Definition(def)] = cmd.args.as_slice() {
                self.ctx.define(def.clone());
            }
        }

        match self.exec_statements(&program.statements)? {
            Flow::Continue => Ok(()),
            Flow::Stopped => Err(self.err(RuntimeErrorKind::StopOutsideProcedure)),
        }
    }

    pub fn exec_block(&mut self, block: &CommandBlock) -> Result<Flow, RuntimeError> {
        self.exec_statements(&block.statements)
    }

    fn exec_statements(&mut self, statements: &[Command]) -> Result<Flow, RuntimeError> {
        for cmd in statements {
            if self.ctx.is_exiting() { break; }
            if self.exec_command(cmd)? == Flow::Stopped {
                return Ok(Flow::Stopped);
            }
        }
        Ok(Flow::Continue)
    }

    // ─── Expressions ──────────────────────────────────────────────────────────

    pub fn evaluate(&mut self, expr: &Expression) -> Result<f32, RuntimeError> {
        match expr {
            Expression::Number(n) => Ok(*n),
            Expression::Variable(name) => Ok(self.ctx.variable(name)),
            Expression::Apply { op, operands } => {
                let mut values = Vec::with_capacity(operands.len());
                for operand in operands {
                    values.push(self.evaluate(operand)?);
                }
                ops::apply(*op, &values).map_err(|kind| self.err(kind))
            }
        }
    }

    pub fn evaluate_point(&mut self, point: &PointExpr) -> Result<Point, RuntimeError> {
        let x = self.evaluate(&point.x)?;
        let y = self.evaluate(&point.y)?;
        Ok(Point::new(x, y))
    }

    pub fn resolve_colour(&mut self, spec: &ColourSpec) -> Result<Colour, RuntimeError> {
        match spec {
            ColourSpec::Literal(c) => Ok(*c),
            ColourSpec::Palette(index) => {
                let index = self.evaluate(index)?;
                self.ctx.palette_colour(index).map_err(|kind| self.err(kind))
            }
            ColourSpec::Rgb([r, g, b]) => {
                let r = self.channel(r)?;
                let g = self.channel(g)?;
                let b = self.channel(b)?;
                Ok(Colour::rgb(r, g, b))
            }
        }
    }

    fn channel(&mut self, expr: &Expression) -> Result<u8, RuntimeError> {
        let v = self.evaluate(expr)?;
        intensity_to_channel(v).ok_or_else(|| self.err(RuntimeErrorKind::ColourIntensity(v)))
    }

    // ─── Statements ───────────────────────────────────────────────────────────

    pub fn exec_command(&mut self, cmd: &Command) -> Result<Flow, RuntimeError> {
        self.line = cmd.span.line;
        match &cmd.op {
            CommandOp::Builtin(op) => self.exec_builtin(*op, cmd),
            CommandOp::Call(name) => {
                self.call_procedure(name, &cmd.args)?;
                Ok(Flow::Continue)
            }
        }
    }

    fn exec_builtin(&mut self, op: Opcode, cmd: &Command) -> Result<Flow, RuntimeError> {
        trace!("line {}: {}", self.line, op.name());
        let args = Args { op, operands: &cmd.args, line: self.line };
        let expected = match op {
            Opcode::Forward | Opcode::Back | Opcode::Right | Opcode::Left | Opcode::SetX
            | Opcode::SetY | Opcode::SetHeading | Opcode::SetPenSize | Opcode::SetPenColor
            | Opcode::SetPos | Opcode::Forever | Opcode::Show | Opcode::To => 1,
            Opcode::SetXY | Opcode::SetPalette | Opcode::Arc | Opcode::If | Opcode::Repeat
            | Opcode::Make => 2,
            Opcode::IfElse => 3,
            Opcode::PenUp | Opcode::PenDown | Opcode::Home | Opcode::Stop | Opcode::Bye => 0,
        };
        args.count(expected)?;

        match op {
            Opcode::Forward | Opcode::Back => {
                let distance = self.evaluate(args.expr(0)?)?;
                let signed = if op == Opcode::Back { -distance } else { distance };
                let target = self.ctx.position().along(self.ctx.heading(), signed);
                self.ctx.move_to(target);
            }
            Opcode::Right | Opcode::Left => {
                let degrees = self.evaluate(args.expr(0)?)?;
                let radians = degrees.to_radians();
                self.ctx.turn(if op == Opcode::Right { -radians } else { radians });
            }
            Opcode::SetXY => {
                let x = self.evaluate(args.expr(0)?)?;
                let y = self.evaluate(args.expr(1)?)?;
                self.jump_to(Point::new(x, y));
            }
            Opcode::SetPos => {
                let target = self.evaluate_point(args.point(0)?)?;
                self.jump_to(target);
            }
            Opcode::SetX => {
                let x = self.evaluate(args.expr(0)?)?;
                self.jump_to(Point::new(x, self.ctx.position().y));
            }
            Opcode::SetY => {
                let y = self.evaluate(args.expr(0)?)?;
                self.jump_to(Point::new(self.ctx.position().x, y));
            }
            Opcode::SetHeading => {
                // compass bearing: 0 is up, clockwise
                let degrees = self.evaluate(args.expr(0)?)?;
                self.ctx.set_heading(std::f32::consts::FRAC_PI_2 - degrees.to_radians());
            }
            Opcode::PenUp => self.ctx.set_pen_down(false),
            Opcode::PenDown => self.ctx.set_pen_down(true),
            Opcode::SetPenSize => {
                let width = self.evaluate(args.expr(0)?)?;
                self.ctx.set_pen_width(width).map_err(|k| self.err(k))?;
            }
            Opcode::SetPenColor => {
                let colour = self.resolve_colour(args.colour(0)?)?;
                self.ctx.set_pen_colour(colour);
            }
            Opcode::SetPalette => {
                let index = self.evaluate(args.expr(0)?)?;
                let colour = self.resolve_colour(args.colour(1)?)?;
                self.ctx.set_palette_colour(index, colour).map_err(|k| self.err(k))?;
            }
            Opcode::Arc => {
                let degrees = self.evaluate(args.expr(0)?)?;
                let radius = self.evaluate(args.expr(1)?)?;
                self.ctx.draw_arc(degrees.to_radians(), radius);
            }
            Opcode::If => {
                let cond = self.evaluate(args.expr(0)?)?;
                if as_bool(cond) {
                    return self.exec_block(args.block(1)?);
                }
            }
            Opcode::IfElse => {
                let cond = self.evaluate(args.expr(0)?)?;
                let branch = if as_bool(cond) { args.block(1) } else { args.block(2) };
                return self.exec_block(branch?);
            }
            Opcode::Repeat => {
                let count = repeat_count(self.evaluate(args.expr(0)?)?);
                let body = args.block(1)?;
                for _ in 0..count {
                    if self.ctx.is_exiting() {
                        break;
                    }
                    if self.exec_block(body)? == Flow::Stopped {
                        return Ok(Flow::Stopped);
                    }
                }
            }
            Opcode::Forever => {
                let body = args.block(0)?;
                while !self.ctx.is_exiting() {
                    if self.exec_block(body)? == Flow::Stopped {
                        return Ok(Flow::Stopped);
                    }
                }
            }
            Opcode::Home => self.ctx.home(),
            Opcode::Make => {
                let name = args.name(0)?;
                let value = self.evaluate(args.expr(1)?)?;
                self.ctx.set_variable(name, value);
            }
            Opcode::Show => {
                let value = self.evaluate(args.expr(0)?)?;
                let text = format_number(value);
                info!("show: {text}");
                self.ctx.print(text);
            }
            Opcode::Stop => return Ok(Flow::Stopped),
            Opcode::Bye => {
                debug!("bye at line {}", self.line);
                self.ctx.request_exit();
            }
            Opcode::To => {
                let def = args.definition(0)?;
                self.ctx.define(def);
            }
        }
        Ok(Flow::Continue)
    }

    /// Absolute positioning draws only when the position actually changes.
    fn jump_to(&mut self, target: Point) {
        if target != self.ctx.position() {
            self.ctx.move_to(target);
        }
    }

    // ─── Procedures ───────────────────────────────────────────────────────────

    fn call_procedure(&mut self, name: &str, args: &[Operand]) -> Result<(), RuntimeError> {
        let def = self.ctx.procedure(name, args.len()).ok_or_else(|| {
            self.err(RuntimeErrorKind::UndefinedProcedure { name: name.to_string(), arity: args.len() })
        })?;

        // Arguments see the caller's bindings.
        let mut values = Vec::with_capacity(args.len());
        for (i, arg) in args.iter().enumerate() {
            let expr = expr_operand(name, arg, i).map_err(|k| self.err(k))?;
            values.push(self.evaluate(expr)?);
        }

        trace!("call {name} {values:?}");
        self.ctx.enter_scope();
        let result = self.run_body(&def, values);
        self.ctx.exit_scope();
        result.map(|_| ())
    }

    fn run_body(&mut self, def: &ProcedureDef, values: Vec<f32>) -> Result<Flow, RuntimeError> {
        for (param, value) in def.params.iter().zip(values) {
            self.ctx.set_variable(param, value);
        }
        // a `stop` inside the body ends here
        self.exec_block(&def.body).map(|_| Flow::Continue)
    }
}

// ─── Operand access ──────────────────────────────────────────────────────────

/// Typed view over a built-in command's operands.
struct Args<'c> {
    op: Opcode,
    operands: &'c [Operand],
    line: usize,
}

impl<'c> Args<'c> {
    fn err(&self, kind: RuntimeErrorKind) -> RuntimeError {
        RuntimeError::new(self.line, kind)
    }

    fn count(&self, expected: usize) -> Result<(), RuntimeError> {
        if self.operands.len() == expected {
            return Ok(());
        }
        Err(self.err(RuntimeErrorKind::Arity {
            op: self.op.name().to_string(),
            expected: Arity::Exactly(expected),
            found: self.operands.len(),
        }))
    }

    fn mismatch(&self, index: usize, expected: &'static str) -> RuntimeError {
        self.err(RuntimeErrorKind::TypeMismatch { op: self.op.name().to_string(), index, expected })
    }

    fn expr(&self, i: usize) -> Result<&'c Expression, RuntimeError> {
        expr_operand(self.op.name(), &self.operands[i], i).map_err(|k| self.err(k))
    }

    fn block(&self, i: usize) -> Result<&'c CommandBlock, RuntimeError> {
        match &self.operands[i] {
            Operand::Block(b) => Ok(b),
            _ => Err(self.mismatch(i, "a block")),
        }
    }

    fn point(&self, i: usize) -> Result<&'c PointExpr, RuntimeError> {
        match &self.operands[i] {
            Operand::Point(p) => Ok(p),
            _ => Err(self.mismatch(i, "a point")),
        }
    }

    fn colour(&self, i: usize) -> Result<&'c ColourSpec, RuntimeError> {
        match &self.operands[i] {
            Operand::Colour(c) => Ok(c),
            _ => Err(self.mismatch(i, "a colour")),
        }
    }

    fn name(&self, i: usize) -> Result<&'c str, RuntimeError> {
        match &self.operands[i] {
            Operand::Name(n) => Ok(n),
            _ => Err(self.mismatch(i, "a quoted name")),
        }
    }

    fn definition(&self, i: usize) -> Result<Rc<ProcedureDef>, RuntimeError> {
        match &self.operands[i] {
            Operand::Definition(d) => Ok(d.clone()),
            _ => Err(self.mismatch(i, "a procedure definition")),
        }
    }
}

fn expr_operand<'c>(op: &str, operand: &'c Operand, index: usize) -> Result<&'c Expression, RuntimeErrorKind> {
    match operand {
        Operand::Expr(e) => Ok(e),
        _ => Err(RuntimeErrorKind::TypeMismatch { op: op.to_string(), index, expected: "an expression" }),
    }
}
