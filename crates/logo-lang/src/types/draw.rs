//! Drawing primitives recorded on the canvas during a run.
//!
//! Coordinates are document space: x grows to the right, y grows downward.
//! A heading of π/2 points up the page.

use std::f32::consts::{PI, TAU};
use std::fmt;

/// Angular step used to tessellate arcs, for both bounds and path output.
pub const ARC_STEP: f32 = PI / 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn min(self, other: Point) -> Point {
        Point::new(self.x.min(other.x), self.y.min(other.y))
    }

    pub fn max(self, other: Point) -> Point {
        Point::new(self.x.max(other.x), self.y.max(other.y))
    }

    pub fn offset(self, by: Point) -> Point {
        Point::new(self.x + by.x, self.y + by.y)
    }

    /// The point `distance` away along `heading`.
    pub fn along(self, heading: f32, distance: f32) -> Point {
        Point::new(self.x + heading.cos() * distance, self.y - heading.sin() * distance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb`. Anything else, including 3- or 8-digit forms, is rejected.
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

// ─── Primitives ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub from: Point,
    pub to: Point,
    pub colour: Colour,
    pub width: u32,
}

/// Arc around `center`, starting at `start_angle` and sweeping clockwise by
/// `sweep` radians (negative sweeps run counter-clockwise).
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub center: Point,
    pub start_angle: f32,
    pub radius: f32,
    pub sweep: f32,
    pub colour: Colour,
    pub width: u32,
}

impl Arc {
    /// Samples the arc every [`ARC_STEP`], always including the exact end point.
    ///
    /// Sweeps beyond one revolution only retrace the circle, so they are
    /// sampled as a single full turn. A NaN sweep counts as a full turn too.
    pub fn points(&self) -> Vec<Point> {
        let total = self.sweep.abs().min(TAU);
        let direction = if self.sweep < 0.0 { 1.0 } else { -1.0 };
        // Tolerance keeps whole-degree sweeps from losing their last sample to rounding.
        let steps = (total / ARC_STEP + 1e-3).floor() as usize;

        let mut points: Vec<Point> = (0..=steps)
            .map(|i| self.point_at(self.start_angle + direction * i as f32 * ARC_STEP))
            .collect();
        if total - steps as f32 * ARC_STEP > 1e-6 {
            points.push(self.point_at(self.start_angle + direction * total));
        }
        points
    }

    fn point_at(&self, angle: f32) -> Point {
        self.center.along(angle, self.radius)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line(Line),
    Arc(Arc),
}

impl Primitive {
    /// Minimum and maximum corner enclosing the primitive.
    pub fn bounds(&self) -> (Point, Point) {
        match self {
            Self::Line(l) => (l.from.min(l.to), l.from.max(l.to)),
            Self::Arc(a) => {
                let points = a.points();
                let first = points[0];
                points.iter().fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p)))
            }
        }
    }

    pub fn translate(&mut self, by: Point) {
        match self {
            Self::Line(l) => {
                l.from = l.from.offset(by);
                l.to = l.to.offset(by);
            }
            Self::Arc(a) => a.center = a.center.offset(by),
        }
    }

    pub fn colour(&self) -> Colour {
        match self {
            Self::Line(l) => l.colour,
            Self::Arc(a) => a.colour,
        }
    }

    pub fn width(&self) -> u32 {
        match self {
            Self::Line(l) => l.width,
            Self::Arc(a) => a.width,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
