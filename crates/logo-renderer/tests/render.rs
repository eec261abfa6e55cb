//! Rendering tests: canvas → SVG text, and source → SVG end to end.

use logo_lang::{compile, execute, Arc, Colour, Line, Point, Primitive};
use logo_renderer::{layout, render, Bounds};
use pretty_assertions::assert_eq;
use std::f32::consts::FRAC_PI_2;

// ─── Helpers ─────────────────────────────────────────────────────────────────

const RED: Colour = Colour::rgb(255, 0, 0);

fn line(from: (f32, f32), to: (f32, f32)) -> Primitive {
    Primitive::Line(Line {
        from: Point::new(from.0, from.1),
        to: Point::new(to.0, to.1),
        colour: RED,
        width: 1,
    })
}

fn svg(src: &str) -> String {
    let prog = compile(src).unwrap_or_else(|errs| panic!("compile failed: {errs:#?}"));
    let ctx = execute(&prog).unwrap_or_else(|e| panic!("run failed: {e}"));
    render(ctx.into_canvas())
}

// ─── Documents ───────────────────────────────────────────────────────────────

#[test]
fn empty_canvas() {
    assert_eq!(
        render(vec![]),
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"0\" height=\"0\">\n</svg>"
    );
}

#[test]
fn positive_drawing_is_not_shifted() {
    assert_eq!(
        render(vec![line((5.0, 5.0), (10.0, 12.0))]),
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"10\" height=\"12\">\n\
         <line x1=\"5\" y1=\"5\" x2=\"10\" y2=\"12\" style=\"stroke:rgb(255,0,0); stroke-width:1\"/>\n\
         </svg>"
    );
}

#[test]
fn negative_drawing_is_moved_to_origin() {
    let doc = layout(vec![line((-10.0, -20.0), (-5.0, -5.0))]);
    assert_eq!(Bounds::of(&doc.primitives).min, Point::ORIGIN);
    assert_eq!(
        doc.to_string(),
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"10\" height=\"20\">\n\
         <line x1=\"0\" y1=\"0\" x2=\"5\" y2=\"15\" style=\"stroke:rgb(255,0,0); stroke-width:1\"/>\n\
         </svg>"
    );
}

#[test]
fn one_element_per_primitive_in_order() {
    let arc = Primitive::Arc(Arc {
        center: Point::new(0.0, 0.0),
        start_angle: FRAC_PI_2,
        radius: 5.0,
        sweep: FRAC_PI_2,
        colour: Colour::rgb(0, 0, 255),
        width: 3,
    });
    let text = render(vec![line((0.0, 0.0), (1.0, 1.0)), arc, line((2.0, 2.0), (3.0, 3.0))]);
    let elements: Vec<&str> = text.lines().skip(1).filter(|l| *l != "</svg>").collect();
    assert_eq!(elements.len(), 3);
    assert!(elements[0].starts_with("<line "));
    assert!(elements[1].starts_with("<path fill=\"none\" style=\"stroke:rgb(0,0,255); stroke-width:3\" d=\"M "));
    assert!(elements[2].starts_with("<line "));
}

#[test]
fn arc_extent_counts_towards_size() {
    // A full circle of radius 10 around the origin spans 20×20.
    let arc = Primitive::Arc(Arc {
        center: Point::ORIGIN,
        start_angle: 0.0,
        radius: 10.0,
        sweep: std::f32::consts::TAU,
        colour: RED,
        width: 1,
    });
    let doc = layout(vec![arc]);
    assert!((19..=20).contains(&doc.width), "width {}", doc.width);
    assert!((19..=20).contains(&doc.height), "height {}", doc.height);
}

// ─── End to end ──────────────────────────────────────────────────────────────

#[test]
fn program_to_svg() {
    assert_eq!(
        svg("setxy 10 0 setpensize 2 setpc \"blue setxy 10 10"),
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"10\" height=\"10\">\n\
         <line x1=\"0\" y1=\"0\" x2=\"10\" y2=\"0\" style=\"stroke:rgb(255,0,0); stroke-width:1\"/>\n\
         <line x1=\"10\" y1=\"0\" x2=\"10\" y2=\"10\" style=\"stroke:rgb(0,0,255); stroke-width:2\"/>\n\
         </svg>"
    );
}

#[test]
fn negative_program_to_svg() {
    assert_eq!(
        svg("pu setxy -10 -10 pd setxy -20 -20"),
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"20\" height=\"20\">\n\
         <line x1=\"10\" y1=\"10\" x2=\"0\" y2=\"0\" style=\"stroke:rgb(255,0,0); stroke-width:1\"/>\n\
         </svg>"
    );
}

#[test]
fn huge_arc_renders_one_turn() {
    let text = svg("arc power 10 30 10");
    assert!(text.starts_with("<svg "));
    let path = text.lines().find(|l| l.starts_with("<path ")).expect("arc path");
    // One full turn: the start point plus 360 one-degree segments.
    assert_eq!(path.matches(" L ").count(), 360);
}
