/// Angle used for `angle_up` / `angle_down` when nothing has been persisted yet.
/// Thousandths of a degree (45°).
pub const DEFAULT_ANGLE_MILLIDEGREES: i64 = 45_000;

/// Scale used for `fov_up` / `fov_down` when nothing has been persisted yet.
/// Thousandths of a unit (1.000, neutral).
pub const NEUTRAL_SCALE_THOUSANDTHS: i64 = 1_000;

/// Radians per thousandth of a degree: π / 180000
pub const RADIANS_PER_MILLIDEGREE: f64 = std::f64::consts::PI / 180_000.0;

/// Scale units per stored thousandth.
pub const SCALE_PER_THOUSANDTH: f64 = 1.0 / 1_000.0;

/// Largest scaled half-angle the rectangle-height correction will use: 89°.
/// Beyond this `tan` grows without bound as it nears the right angle.
pub const MAX_SCALED_HALF_ANGLE: f64 = 89_000.0 * RADIANS_PER_MILLIDEGREE;

/// Numerical epsilon for near-zero comparisons
pub const EPSILON: f64 = 1e-10;

/// Number of views in a primary stereo configuration.
pub const STEREO_VIEW_COUNT: usize = 2;

/// Namespace all layer settings live under.
pub const SETTINGS_NAMESPACE: &str = "CustomizedFOV";

/// Name the layer reports itself as in diagnostics.
pub const LAYER_NAME: &str = "XR_APILAYER_customized_fov";
