//! The 16-slot palette and the fixed colour-name table.

use crate::types::draw::Colour;

pub const PALETTE_SIZE: usize = 16;

/// Upper bound of an RGB component in `[r g b]` colour lists.
pub const MAX_INTENSITY: f32 = 99.0;

const DEFAULT_PALETTE: [Colour; PALETTE_SIZE] = [
    Colour::rgb(0, 0, 0),       // black
    Colour::rgb(0, 0, 255),     // blue
    Colour::rgb(0, 255, 0),     // green
    Colour::rgb(0, 255, 255),   // cyan
    Colour::rgb(255, 0, 0),     // red
    Colour::rgb(255, 0, 255),   // magenta
    Colour::rgb(255, 255, 0),   // yellow
    Colour::rgb(255, 255, 255), // white
    Colour::rgb(165, 42, 42),   // brown
    Colour::rgb(210, 180, 140), // tan
    Colour::rgb(0, 128, 0),     // green
    Colour::rgb(127, 255, 212), // aqua
    Colour::rgb(250, 128, 114), // salmon
    Colour::rgb(128, 0, 128),   // purple
    Colour::rgb(255, 165, 0),   // orange
    Colour::rgb(128, 128, 128), // gray
];

const NAMED_COLOURS: [(&str, Colour); 16] = [
    ("black",   Colour::rgb(0, 0, 0)),
    ("silver",  Colour::rgb(192, 192, 192)),
    ("gray",    Colour::rgb(128, 128, 128)),
    ("white",   Colour::rgb(255, 255, 255)),
    ("maroon",  Colour::rgb(128, 0, 0)),
    ("red",     Colour::rgb(255, 0, 0)),
    ("purple",  Colour::rgb(128, 0, 128)),
    ("fuchsia", Colour::rgb(255, 0, 255)),
    ("green",   Colour::rgb(0, 128, 0)),
    ("lime",    Colour::rgb(0, 255, 0)),
    ("olive",   Colour::rgb(128, 128, 0)),
    ("yellow",  Colour::rgb(255, 255, 0)),
    ("navy",    Colour::rgb(0, 0, 128)),
    ("blue",    Colour::rgb(0, 0, 255)),
    ("teal",    Colour::rgb(0, 128, 128)),
    ("aqua",    Colour::rgb(0, 255, 255)),
];

/// Case-insensitive lookup in the colour-name table.
pub fn named_colour(name: &str) -> Option<Colour> {
    let name = name.to_ascii_lowercase();
    NAMED_COLOURS.iter().find(|(n, _)| *n == name).map(|(_, c)| *c)
}

/// Scales a 0..=99 intensity to a 0..=255 channel, truncating.
pub fn intensity_to_channel(value: f32) -> Option<u8> {
    if !(0.0..=MAX_INTENSITY).contains(&value) {
        return None;
    }
    Some((value * 255.0 / MAX_INTENSITY) as u8)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    slots: [Colour; PALETTE_SIZE],
}

impl Default for Palette {
    fn default() -> Self {
        Self { slots: DEFAULT_PALETTE }
    }
}

impl Palette {
    pub fn get(&self, index: i64) -> Option<Colour> {
        usize::try_from(index).ok().and_then(|i| self.slots.get(i)).copied()
    }

    /// Returns false, leaving the palette untouched, when `index` is out of range.
    pub fn set(&mut self, index: i64, colour: Colour) -> bool {
        match usize::try_from(index).ok().and_then(|i| self.slots.get_mut(i)) {
            Some(slot) => { *slot = colour; true }
            None => false,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
