//! Field-of-view correction layer core.
//!
//! Sits between an XR application and the runtime below it, forwarding every
//! call and rescaling the vertical field of view of a primary stereo view
//! configuration: the per-frame up/down half-angles from `xrLocateViews` and
//! the recommended image-rectangle heights from
//! `xrEnumerateViewConfigurationViews`.
//!
//! No I/O here. Persistence is behind [`SettingsStore`], the runtime behind
//! [`XrRuntime`].

pub mod capture;
pub mod constants;
pub mod correction;
pub mod layer;
pub mod runtime;
pub mod settings;
pub mod state;
pub mod units;
pub mod xr;

pub use capture::{CaptureLatch, CaptureState, CapturedAngles};
pub use constants::{
    DEFAULT_ANGLE_MILLIDEGREES, LAYER_NAME, NEUTRAL_SCALE_THOUSANDTHS, SETTINGS_NAMESPACE,
};
pub use correction::{AnglePair, FovScale, corrected_rect_height, scale_fov, tangent_ratio};
pub use layer::{FovLayer, LayerHooks, NoHooks};
pub use runtime::{Hook, ProcAddr, XrRuntime};
pub use settings::{MemorySettings, Setting, SettingsError, SettingsStore};
pub use state::{BaselineFov, FovState};
pub use units::{
    millidegrees_to_degrees, millidegrees_to_radians, radians_to_millidegrees,
    scale_to_thousandths, thousandths_to_scale,
};
