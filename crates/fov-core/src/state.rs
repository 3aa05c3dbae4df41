use serde::Serialize;

use crate::constants::STEREO_VIEW_COUNT;
use crate::correction::{AnglePair, FovScale, corrected_rect_height, scale_fov};
use crate::settings::{Setting, SettingsStore};
use crate::xr::{Eye, Fovf};

/// Per-eye baseline half-angles.
///
/// The capture path only ever reads eye 0 and fills both slots with it, so
/// the two entries are always equal in practice. The array stays per-eye so
/// that per-eye capture remains a local change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct BaselineFov {
    eyes: [AnglePair; STEREO_VIEW_COUNT],
}

impl BaselineFov {
    /// Same pair for both eyes.
    pub fn symmetric(pair: AnglePair) -> Self {
        Self { eyes: [pair; STEREO_VIEW_COUNT] }
    }

    pub fn eye(&self, eye: Eye) -> AnglePair {
        self.eyes[eye.index()]
    }

    /// `None` for view indices beyond a stereo pair.
    pub fn view(&self, index: usize) -> Option<AnglePair> {
        Eye::from_index(index).map(|eye| self.eye(eye))
    }
}

/// Everything the per-frame path needs: baseline angles and scale factors.
///
/// Starts zeroed (baseline) and neutral (scale). Zero baselines make the
/// rectangle-height correction a no-op until something is loaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct FovState {
    baseline: BaselineFov,
    scale: FovScale,
}

impl FovState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(baseline: BaselineFov, scale: FovScale) -> Self {
        Self { baseline, scale }
    }

    pub fn baseline(&self) -> &BaselineFov {
        &self.baseline
    }

    pub fn scale(&self) -> FovScale {
        self.scale
    }

    /// Read `fov_up` / `fov_down`, absent meaning 1.000.
    pub fn load_scale<S: SettingsStore + ?Sized>(&mut self, store: &S) {
        self.scale = FovScale::from_thousandths(
            store.get_or_default(Setting::FovUp),
            store.get_or_default(Setting::FovDown),
        );
    }

    /// Read `angle_up` / `angle_down` into both eyes, absent meaning 45°.
    pub fn load_baseline<S: SettingsStore + ?Sized>(&mut self, store: &S) {
        self.baseline = BaselineFov::symmetric(AnglePair::from_millidegrees(
            store.get_or_default(Setting::AngleUp),
            store.get_or_default(Setting::AngleDown),
        ));
    }

    /// Corrected recommended height for view `index`; untouched past the stereo pair.
    pub fn rect_height(&self, index: usize, height: u32) -> u32 {
        match self.baseline.view(index) {
            Some(baseline) => corrected_rect_height(height, baseline, self.scale),
            None => height,
        }
    }

    pub fn correct_fov(&self, fov: &mut Fovf) {
        scale_fov(fov, self.scale);
    }
}
