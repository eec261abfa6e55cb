//! Every value is an `f32`. Booleans are encoded numerically.

/// A number is false iff its magnitude is below 1.
pub fn as_bool(v: f32) -> bool {
    v.abs() >= 1.0
}

pub fn as_float(b: bool) -> f32 {
    if b { 1.0 } else { 0.0 }
}

/// Iteration count for `repeat`: truncated, saturating, and zero for
/// negative or NaN input.
pub fn repeat_count(v: f32) -> u64 {
    v.max(0.0) as u64
}

/// Text written by `show`.
pub fn format_number(v: f32) -> String {
    v.to_string()
}
