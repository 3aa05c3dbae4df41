//! FOV correction math.
//!
//! Two transforms share one model: a pair of baseline half-angles and a pair
//! of scale factors (up, down).
//!
//! - Angle variant: the runtime's per-frame half-angles are multiplied by the
//!   scale factors directly.
//! - Rectangle-height variant: image height is proportional to the tangent of
//!   the half-angles bounding the vertical field, so each half of the
//!   recommended height is rescaled by `tan(a·s) / tan(a)` using the cached
//!   baseline angle `a`.

use serde::Serialize;

use crate::constants::{EPSILON, MAX_SCALED_HALF_ANGLE};
use crate::units::{millidegrees_to_radians, thousandths_to_scale};
use crate::xr::Fovf;

/// User-configured multipliers for the upward and downward half-angles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FovScale {
    pub up: f64,
    pub down: f64,
}

impl FovScale {
    pub const NEUTRAL: FovScale = FovScale { up: 1.0, down: 1.0 };

    pub fn new(up: f64, down: f64) -> Self {
        Self { up, down }
    }

    /// From the persisted thousandths-of-a-unit form.
    pub fn from_thousandths(up: i64, down: i64) -> Self {
        Self {
            up: thousandths_to_scale(up),
            down: thousandths_to_scale(down),
        }
    }

    pub fn is_neutral(&self) -> bool {
        (self.up - 1.0).abs() < EPSILON && (self.down - 1.0).abs() < EPSILON
    }
}

impl Default for FovScale {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Upward and downward half-angle magnitudes, radians.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct AnglePair {
    pub up: f64,
    pub down: f64,
}

impl AnglePair {
    pub fn new(up: f64, down: f64) -> Self {
        Self { up, down }
    }

    /// From the persisted thousandths-of-a-degree form.
    pub fn from_millidegrees(up: i64, down: i64) -> Self {
        Self {
            up: millidegrees_to_radians(up),
            down: millidegrees_to_radians(down),
        }
    }
}

/// `tan(angle · scale) / tan(angle)`, the factor one half of the image
/// height grows by.
///
/// A baseline tangent that is zero or not finite gives 1.0 (no correction).
/// The scaled angle is clamped to [`MAX_SCALED_HALF_ANGLE`] (or the baseline
/// itself, if that is wider) so the ratio stays bounded as it approaches π/2.
/// A zero scale collapses the half to 0.0; a ratio below zero is floored there.
pub fn tangent_ratio(angle: f64, scale: f64) -> f64 {
    let base = angle.tan();
    if base.abs() < EPSILON || !base.is_finite() {
        return 1.0;
    }
    let limit = MAX_SCALED_HALF_ANGLE.max(angle.abs());
    let scaled = (angle * scale).clamp(-limit, limit);
    let ratio = scaled.tan() / base;
    if ratio.is_finite() { ratio.max(0.0) } else { 1.0 }
}

/// Rescale a recommended image-rectangle height for the given baseline.
///
/// `new_h = h/2 · ratio(up) + h/2 · ratio(down)`, rounded to the nearest pixel.
pub fn corrected_rect_height(height: u32, baseline: AnglePair, scale: FovScale) -> u32 {
    let half = f64::from(height) / 2.0;
    let corrected =
        half * tangent_ratio(baseline.up, scale.up) + half * tangent_ratio(baseline.down, scale.down);
    // `as` saturates; the ratios are already finite
    corrected.round() as u32
}

/// Rescale the per-frame upward and downward half-angles in place.
/// Left and right are untouched.
pub fn scale_fov(fov: &mut Fovf, scale: FovScale) {
    fov.angle_up = (f64::from(fov.angle_up) * scale.up) as f32;
    fov.angle_down = (f64::from(fov.angle_down) * scale.down) as f32;
}
