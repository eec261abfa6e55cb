//! SVG serialisation of a normalized canvas.

use std::fmt;

use logo_lang::{Point, Primitive};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// A drawing ready to be written out. Coordinates are already translated into
/// the positive quadrant.
#[derive(Debug, Clone)]
pub struct Document {
    pub width: u32,
    pub height: u32,
    pub primitives: Vec<Primitive>,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, r#"<svg xmlns="{SVG_NS}" width="{}" height="{}">"#, self.width, self.height)?;
        for p in &self.primitives {
            write_primitive(f, p)?;
            f.write_str("\n")?;
        }
        f.write_str("</svg>")
    }
}

fn write_primitive(f: &mut fmt::Formatter<'_>, p: &Primitive) -> fmt::Result {
    let c = p.colour();
    let style = format!("stroke:rgb({},{},{}); stroke-width:{}", c.r, c.g, c.b, p.width());
    match p {
        Primitive::Line(l) => write!(
            f,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" style="{style}"/>"#,
            l.from.x, l.from.y, l.to.x, l.to.y,
        ),
        Primitive::Arc(a) => {
            write!(f, r#"<path fill="none" style="{style}" d=""#)?;
            write_path(f, &a.points())?;
            f.write_str(r#""/>"#)
        }
    }
}

fn write_path(f: &mut fmt::Formatter<'_>, points: &[Point]) -> fmt::Result {
    for (i, p) in points.iter().enumerate() {
        let cmd = if i == 0 { "M" } else { " L" };
        write!(f, "{cmd} {} {}", p.x, p.y)?;
    }
    Ok(())
}
