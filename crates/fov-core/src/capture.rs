//! One-shot capture of the runtime's baseline half-angles.
//!
//! `Uncaptured → Captured`, no way back. The first eligible located view
//! supplies the angles, which are persisted and then re-read so the cache
//! reflects the store whether or not the write went through.

use crate::settings::{Setting, SettingsStore};
use crate::state::FovState;
use crate::units::radians_to_millidegrees;
use crate::xr::Fovf;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CaptureState {
    #[default]
    Uncaptured,
    Captured,
}

/// Angles written by a capture, thousandths of a degree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapturedAngles {
    pub angle_up: i64,
    pub angle_down: i64,
}

#[derive(Debug, Default)]
pub struct CaptureLatch {
    state: CaptureState,
}

impl CaptureLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_captured(&self) -> bool {
        self.state == CaptureState::Captured
    }

    /// Persist `fov`'s up/down magnitudes and refresh `cache` from the store.
    ///
    /// Returns `None` without touching anything once the latch is set. Write
    /// failures are logged and do not keep the latch open.
    pub fn capture<S: SettingsStore + ?Sized>(
        &mut self,
        fov: &Fovf,
        store: &mut S,
        cache: &mut FovState,
    ) -> Option<CapturedAngles> {
        if self.is_captured() {
            return None;
        }

        let angles = CapturedAngles {
            angle_up: radians_to_millidegrees(f64::from(fov.angle_up)),
            angle_down: radians_to_millidegrees(f64::from(fov.angle_down)),
        };
        tracing::info!("system angle_up: {}", angles.angle_up);
        tracing::info!("system angle_down: {}", angles.angle_down);

        for (setting, value) in [
            (Setting::AngleUp, angles.angle_up),
            (Setting::AngleDown, angles.angle_down),
        ] {
            if let Err(e) = store.set(setting, value) {
                tracing::warn!("failed to persist {setting}: {e}");
            }
        }

        tracing::info!("written angle_up: {}", store.get_or_default(Setting::AngleUp));
        tracing::info!("written angle_down: {}", store.get_or_default(Setting::AngleDown));

        cache.load_baseline(&*store);
        self.state = CaptureState::Captured;
        Some(angles)
    }
}
