//! Mutable state of one program run.

use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, TAU};
use std::rc::Rc;

use crate::error::RuntimeErrorKind;
use crate::syntax::ast::ProcedureDef;
use crate::types::draw::{Arc, Colour, Line, Point, Primitive};
use crate::types::palette::Palette;

pub const START_HEADING: f32 = FRAC_PI_2;
pub const START_COLOUR: Colour = Colour::rgb(255, 0, 0);

/// Wraps any angle into `[0, 2π)`.
pub fn normalize_heading(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

type Frame = HashMap<String, f32>;

#[derive(Debug, Clone)]
pub struct ExecutionContext {
    position: Point,
    heading: f32,
    pen_down: bool,
    pen_width: u32,
    pen_colour: Colour,
    exiting: bool,
    /// Never empty. Each frame is a full copy of the one below it.
    scopes: Vec<Frame>,
    procedures: HashMap<(String, usize), Rc<ProcedureDef>>,
    palette: Palette,
    canvas: Vec<Primitive>,
    transcript: Vec<String>,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self {
            position: Point::ORIGIN,
            heading: START_HEADING,
            pen_down: true,
            pen_width: 1,
            pen_colour: START_COLOUR,
            exiting: false,
            scopes: vec![Frame::new()],
            procedures: HashMap::new(),
            palette: Palette::default(),
            canvas: Vec::new(),
            transcript: Vec::new(),
        }
    }
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Turtle ──────────────────────────────────────────────────────────────

    pub fn position(&self) -> Point { self.position }
    pub fn heading(&self) -> f32 { self.heading }
    pub fn is_pen_down(&self) -> bool { self.pen_down }
    pub fn pen_width(&self) -> u32 { self.pen_width }
    pub fn pen_colour(&self) -> Colour { self.pen_colour }

    pub fn set_heading(&mut self, radians: f32) {
        self.heading = normalize_heading(radians);
    }

    /// Positive angles turn counter-clockwise.
    pub fn turn(&mut self, radians: f32) {
        self.set_heading(self.heading + radians);
    }

    pub fn set_pen_down(&mut self, down: bool) { self.pen_down = down; }
    pub fn set_pen_colour(&mut self, colour: Colour) { self.pen_colour = colour; }

    pub fn set_pen_width(&mut self, width: f32) -> Result<(), RuntimeErrorKind> {
        let truncated = width.trunc();
        if truncated.is_nan() || truncated < 1.0 {
            return Err(RuntimeErrorKind::InvalidPenSize(width));
        }
        self.pen_width = truncated as u32;
        Ok(())
    }

    /// Moves to `target`, recording a line when the pen is down.
    pub fn move_to(&mut self, target: Point) {
        if self.pen_down {
            self.canvas.push(Primitive::Line(Line {
                from: self.position,
                to: target,
                colour: self.pen_colour,
                width: self.pen_width,
            }));
        }
        self.position = target;
    }

    /// Records an arc around the turtle when the pen is down. The turtle stays put.
    pub fn draw_arc(&mut self, sweep: f32, radius: f32) {
        if !self.pen_down { return; }
        self.canvas.push(Primitive::Arc(Arc {
            center: self.position,
            start_angle: self.heading,
            radius,
            sweep,
            colour: self.pen_colour,
            width: self.pen_width,
        }));
    }

    /// Canonical pose: origin, facing up, pen down, width 1. Colour is kept.
    pub fn home(&mut self) {
        self.position = Point::ORIGIN;
        self.heading = START_HEADING;
        self.pen_down = true;
        self.pen_width = 1;
    }

    pub fn is_exiting(&self) -> bool { self.exiting }
    pub fn request_exit(&mut self) { self.exiting = true; }

    // ─── Scopes ──────────────────────────────────────────────────────────────

    /// Unbound names read as 0.
    pub fn variable(&self, name: &str) -> f32 {
        self.top().get(name).copied().unwrap_or(0.0)
    }

    pub fn set_variable(&mut self, name: &str, value: f32) {
        self.top_mut().insert(name.to_string(), value);
    }

    pub fn enter_scope(&mut self) {
        let copy = self.top().clone();
        self.scopes.push(copy);
    }

    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 { self.scopes.pop(); }
    }

    pub fn scope_depth(&self) -> usize { self.scopes.len() }

    fn top(&self) -> &Frame {
        &self.scopes[self.scopes.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Frame {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    // ─── Procedures ──────────────────────────────────────────────────────────

    pub fn define(&mut self, def: Rc<ProcedureDef>) {
        let key = (def.name.to_ascii_lowercase(), def.params.len());
        self.procedures.insert(key, def);
    }

    pub fn procedure(&self, name: &str, arity: usize) -> Option<Rc<ProcedureDef>> {
        self.procedures.get(&(name.to_ascii_lowercase(), arity)).cloned()
    }

    // ─── Palette ─────────────────────────────────────────────────────────────

    pub fn palette(&self) -> &Palette { &self.palette }

    pub fn palette_colour(&self, index: f32) -> Result<Colour, RuntimeErrorKind> {
        let slot = palette_slot(index)?;
        self.palette.get(slot).ok_or(RuntimeErrorKind::PaletteIndex(index.trunc()))
    }

    pub fn set_palette_colour(&mut self, index: f32, colour: Colour) -> Result<(), RuntimeErrorKind> {
        let slot = palette_slot(index)?;
        if self.palette.set(slot, colour) { Ok(()) } else { Err(RuntimeErrorKind::PaletteIndex(index.trunc())) }
    }

    // ─── Output ──────────────────────────────────────────────────────────────

    pub fn canvas(&self) -> &[Primitive] { &self.canvas }

    pub fn into_canvas(self) -> Vec<Primitive> { self.canvas }

    pub fn print(&mut self, line: String) {
        self.transcript.push(line);
    }

    pub fn transcript(&self) -> &[String] { &self.transcript }
}

/// Truncates a palette index. NaN and infinities have no slot.
fn palette_slot(index: f32) -> Result<i64, RuntimeErrorKind> {
    let slot = index.trunc();
    if slot.is_finite() { Ok(slot as i64) } else { Err(RuntimeErrorKind::PaletteIndex(slot)) }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ast::CommandBlock;
    use std::f32::consts::PI;

    fn def(name: &str, params: &[&str]) -> Rc<ProcedureDef> {
        Rc::new(ProcedureDef {
            name: name.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
            body: CommandBlock::default(),
        })
    }

    #[test]
    fn starting_pose() {
        let ctx = ExecutionContext::new();
        assert_eq!(ctx.position(), Point::ORIGIN);
        assert_eq!(ctx.heading(), FRAC_PI_2);
        assert!(ctx.is_pen_down());
        assert_eq!(ctx.pen_width(), 1);
        assert_eq!(ctx.pen_colour(), Colour::rgb(255, 0, 0));
        assert_eq!(ctx.scope_depth(), 1);
    }

    #[test]
    fn heading_stays_in_range() {
        let mut ctx = ExecutionContext::new();
        ctx.turn(-PI);
        assert!((ctx.heading() - 1.5 * PI).abs() < 1e-5);
        ctx.turn(10.0 * TAU);
        assert!((0.0..TAU).contains(&ctx.heading()));
        assert_eq!(normalize_heading(-1e-9), 0.0);
    }

    #[test]
    fn pen_up_moves_without_drawing() {
        let mut ctx = ExecutionContext::new();
        ctx.set_pen_down(false);
        ctx.move_to(Point::new(3.0, 4.0));
        assert!(ctx.canvas().is_empty());
        assert_eq!(ctx.position(), Point::new(3.0, 4.0));
    }

    #[test]
    fn pen_width_is_truncated_and_validated() {
        let mut ctx = ExecutionContext::new();
        ctx.set_pen_width(3.9).unwrap();
        assert_eq!(ctx.pen_width(), 3);
        assert_eq!(ctx.set_pen_width(0.5), Err(RuntimeErrorKind::InvalidPenSize(0.5)));
        assert_eq!(ctx.pen_width(), 3);
    }

    #[test]
    fn home_keeps_colour() {
        let mut ctx = ExecutionContext::new();
        ctx.set_pen_colour(Colour::rgb(1, 2, 3));
        ctx.move_to(Point::new(5.0, 5.0));
        ctx.turn(1.0);
        ctx.set_pen_down(false);
        ctx.home();
        assert_eq!(ctx.position(), Point::ORIGIN);
        assert_eq!(ctx.heading(), START_HEADING);
        assert!(ctx.is_pen_down());
        assert_eq!(ctx.pen_colour(), Colour::rgb(1, 2, 3));
    }

    #[test]
    fn scopes_copy_on_enter() {
        let mut ctx = ExecutionContext::new();
        ctx.set_variable("x", 1.0);
        ctx.enter_scope();
        assert_eq!(ctx.variable("x"), 1.0);
        ctx.set_variable("x", 2.0);
        ctx.set_variable("y", 3.0);
        ctx.exit_scope();
        assert_eq!(ctx.variable("x"), 1.0);
        assert_eq!(ctx.variable("y"), 0.0);
    }

    #[test]
    fn outermost_scope_is_never_popped() {
        let mut ctx = ExecutionContext::new();
        ctx.exit_scope();
        assert_eq!(ctx.scope_depth(), 1);
    }

    #[test]
    fn procedures_keyed_by_name_and_arity() {
        let mut ctx = ExecutionContext::new();
        ctx.define(def("Spiral", &["a"]));
        ctx.define(def("spiral", &["a", "b"]));
        assert_eq!(ctx.procedure("SPIRAL", 1).map(|d| d.params.len()), Some(1));
        assert_eq!(ctx.procedure("spiral", 2).map(|d| d.params.len()), Some(2));
        assert!(ctx.procedure("spiral", 0).is_none());
    }

    #[test]
    fn palette_index_is_truncated_and_range_checked() {
        let mut ctx = ExecutionContext::new();
        ctx.set_palette_colour(1.7, Colour::rgb(9, 9, 9)).unwrap();
        assert_eq!(ctx.palette_colour(1.0), Ok(Colour::rgb(9, 9, 9)));
        assert_eq!(ctx.palette_colour(16.0), Err(RuntimeErrorKind::PaletteIndex(16.0)));
        assert_eq!(
            ctx.set_palette_colour(-2.5, Colour::rgb(0, 0, 0)),
            Err(RuntimeErrorKind::PaletteIndex(-2.0))
        );
    }

    #[test]
    fn non_finite_palette_index_is_rejected() {
        let mut ctx = ExecutionContext::new();
        assert!(matches!(ctx.palette_colour(f32::NAN), Err(RuntimeErrorKind::PaletteIndex(i)) if i.is_nan()));
        assert_eq!(
            ctx.palette_colour(f32::INFINITY),
            Err(RuntimeErrorKind::PaletteIndex(f32::INFINITY))
        );
        assert!(ctx.set_palette_colour(f32::NAN, Colour::rgb(1, 2, 3)).is_err());
        assert_eq!(ctx.palette(), ExecutionContext::new().palette());
    }
}
