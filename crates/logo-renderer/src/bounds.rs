//! Bounding box of a recorded canvas.

use logo_lang::{Point, Primitive};

/// Minimum and maximum corner enclosing a drawing.
///
/// The default box is the degenerate one at the origin, so folding a canvas
/// always keeps (0,0) inside the result.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn of(primitives: &[Primitive]) -> Self {
        primitives.iter().fold(Self::default(), |acc, p| acc.include(p.bounds()))
    }

    pub fn include(self, (lo, hi): (Point, Point)) -> Self {
        Self { min: self.min.min(lo), max: self.max.max(hi) }
    }

    /// Translation that moves `min` onto the origin.
    pub fn offset(&self) -> Point {
        Point::new(-self.min.x, -self.min.y)
    }

    pub fn width(&self) -> u32 {
        (self.max.x - self.min.x).trunc() as u32
    }

    pub fn height(&self) -> u32 {
        (self.max.y - self.min.y).trunc() as u32
    }
}

/// Shifts every primitive so the drawing's minimum corner lands on the origin.
/// Returns the bounds before the shift.
pub fn normalize(primitives: &mut [Primitive]) -> Bounds {
    let bounds = Bounds::of(primitives);
    let offset = bounds.offset();
    for p in primitives.iter_mut() {
        p.translate(offset);
    }
    bounds
}
