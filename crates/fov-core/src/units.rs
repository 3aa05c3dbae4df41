//! Conversions between the persisted integer units and the floating-point
//! values used everywhere else.
//!
//! Angles are stored as thousandths of a degree, scale factors as thousandths
//! of a unit. Nothing outside this module should see the integer forms.

use crate::constants::{RADIANS_PER_MILLIDEGREE, SCALE_PER_THOUSANDTH};

/// Thousandths of a degree → radians.
pub fn millidegrees_to_radians(value: i64) -> f64 {
    value as f64 * RADIANS_PER_MILLIDEGREE
}

/// Thousandths of a degree → degrees.
pub fn millidegrees_to_degrees(value: i64) -> f64 {
    value as f64 / 1_000.0
}

/// Radians → thousandths of a degree, sign dropped.
///
/// Runtimes report `angle_down` (and `angle_left`) as negative half-angles;
/// the store only keeps magnitudes.
pub fn radians_to_millidegrees(radians: f64) -> i64 {
    (radians.abs() / RADIANS_PER_MILLIDEGREE).round() as i64
}

/// Thousandths of a unit → scale factor.
pub fn thousandths_to_scale(value: i64) -> f64 {
    value as f64 * SCALE_PER_THOUSANDTH
}

/// Scale factor → thousandths of a unit.
pub fn scale_to_thousandths(scale: f64) -> i64 {
    (scale / SCALE_PER_THOUSANDTH).round() as i64
}
