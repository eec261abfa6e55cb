//! Turns a recorded canvas into an SVG document.

mod bounds;
mod svg;

pub use bounds::{normalize, Bounds};
pub use svg::{Document, SVG_NS};

use log::debug;
use logo_lang::Primitive;

/// Normalizes the canvas into the positive quadrant and lays it out as a document.
pub fn layout(mut canvas: Vec<Primitive>) -> Document {
    let bounds = normalize(&mut canvas);
    debug!(
        "canvas bounds ({}, {}) to ({}, {}), {} primitives",
        bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y, canvas.len()
    );
    Document { width: bounds.width(), height: bounds.height(), primitives: canvas }
}

/// Renders a canvas to SVG text.
pub fn render(canvas: Vec<Primitive>) -> String {
    layout(canvas).to_string()
}
