pub mod draw;
pub mod palette;
