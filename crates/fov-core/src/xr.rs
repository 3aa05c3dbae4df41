//! Safe mirrors of the OpenXR records the layer touches.
//!
//! Enumerations are newtypes over the wire integer with registry constants,
//! so values the layer does not know about pass through untouched. Handles are
//! opaque `u64`s owned by the runtime.

use std::fmt;

use serde::Serialize;

/// `XrResult`. Non-negative codes are successes, negative codes are errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct XrResult(i32);

impl XrResult {
    pub const SUCCESS: Self = Self(0);
    pub const TIMEOUT_EXPIRED: Self = Self(1);
    pub const SESSION_LOSS_PENDING: Self = Self(3);
    pub const ERROR_VALIDATION_FAILURE: Self = Self(-1);
    pub const ERROR_RUNTIME_FAILURE: Self = Self(-2);
    pub const ERROR_FUNCTION_UNSUPPORTED: Self = Self(-7);
    pub const ERROR_SIZE_INSUFFICIENT: Self = Self(-11);
    pub const ERROR_HANDLE_INVALID: Self = Self(-12);
    pub const ERROR_SYSTEM_INVALID: Self = Self(-18);
    pub const ERROR_FORM_FACTOR_UNAVAILABLE: Self = Self(-35);
    pub const ERROR_VIEW_CONFIGURATION_TYPE_UNSUPPORTED: Self = Self(-41);

    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn into_raw(self) -> i32 {
        self.0
    }

    /// `XR_SUCCEEDED`
    pub const fn is_success(self) -> bool {
        self.0 >= 0
    }

    /// `XR_FAILED`
    pub const fn is_failure(self) -> bool {
        self.0 < 0
    }

    fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::SUCCESS => "XR_SUCCESS",
            Self::TIMEOUT_EXPIRED => "XR_TIMEOUT_EXPIRED",
            Self::SESSION_LOSS_PENDING => "XR_SESSION_LOSS_PENDING",
            Self::ERROR_VALIDATION_FAILURE => "XR_ERROR_VALIDATION_FAILURE",
            Self::ERROR_RUNTIME_FAILURE => "XR_ERROR_RUNTIME_FAILURE",
            Self::ERROR_FUNCTION_UNSUPPORTED => "XR_ERROR_FUNCTION_UNSUPPORTED",
            Self::ERROR_SIZE_INSUFFICIENT => "XR_ERROR_SIZE_INSUFFICIENT",
            Self::ERROR_HANDLE_INVALID => "XR_ERROR_HANDLE_INVALID",
            Self::ERROR_SYSTEM_INVALID => "XR_ERROR_SYSTEM_INVALID",
            Self::ERROR_FORM_FACTOR_UNAVAILABLE => "XR_ERROR_FORM_FACTOR_UNAVAILABLE",
            Self::ERROR_VIEW_CONFIGURATION_TYPE_UNSUPPORTED => {
                "XR_ERROR_VIEW_CONFIGURATION_TYPE_UNSUPPORTED"
            }
            _ => return None,
        })
    }
}

impl fmt::Display for XrResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "XR_UNKNOWN_RESULT({})", self.0),
        }
    }
}

/// `XrStructureType`, the tag every input/output record carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StructureType(i32);

impl StructureType {
    pub const UNKNOWN: Self = Self(0);
    pub const INSTANCE_CREATE_INFO: Self = Self(3);
    pub const SYSTEM_GET_INFO: Self = Self(4);
    pub const SYSTEM_PROPERTIES: Self = Self(5);
    pub const VIEW_LOCATE_INFO: Self = Self(6);
    pub const VIEW: Self = Self(7);
    pub const SESSION_CREATE_INFO: Self = Self(8);
    pub const VIEW_STATE: Self = Self(11);
    pub const INSTANCE_PROPERTIES: Self = Self(32);
    pub const VIEW_CONFIGURATION_VIEW: Self = Self(41);

    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn into_raw(self) -> i32 {
        self.0
    }
}

/// `XrFormFactor`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FormFactor(i32);

impl FormFactor {
    pub const HEAD_MOUNTED_DISPLAY: Self = Self(1);
    pub const HANDHELD_DISPLAY: Self = Self(2);

    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn into_raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for FormFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::HEAD_MOUNTED_DISPLAY => f.write_str("XR_FORM_FACTOR_HEAD_MOUNTED_DISPLAY"),
            Self::HANDHELD_DISPLAY => f.write_str("XR_FORM_FACTOR_HANDHELD_DISPLAY"),
            Self(raw) => write!(f, "XR_UNKNOWN_FORM_FACTOR({raw})"),
        }
    }
}

/// `XrViewConfigurationType`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ViewConfigurationType(i32);

impl ViewConfigurationType {
    pub const PRIMARY_MONO: Self = Self(1);
    pub const PRIMARY_STEREO: Self = Self(2);

    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn into_raw(self) -> i32 {
        self.0
    }
}

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $name(u64);

        impl $name {
            pub const NULL: Self = Self(0);

            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn into_raw(self) -> u64 {
                self.0
            }

            pub const fn is_null(self) -> bool {
                self.0 == 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:#x}", self.0)
            }
        }
    };
}

handle!(
    /// `XrInstance`
    Instance
);
handle!(
    /// `XrSession`
    Session
);
handle!(
    /// `XrSpace`
    Space
);
handle!(
    /// `XrSystemId`. `NULL` is `XR_NULL_SYSTEM_ID`.
    SystemId
);

/// `XrVersion`: major in the top 16 bits, minor in the next 16, patch in the low 32.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u64);

impl Version {
    pub const fn new(major: u16, minor: u16, patch: u32) -> Self {
        Self(((major as u64) << 48) | ((minor as u64) << 32) | patch as u64)
    }

    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn into_raw(self) -> u64 {
        self.0
    }

    pub const fn major(self) -> u16 {
        (self.0 >> 48) as u16
    }

    pub const fn minor(self) -> u16 {
        (self.0 >> 32) as u16
    }

    pub const fn patch(self) -> u32 {
        self.0 as u32
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major(), self.minor(), self.patch())
    }
}

/// Index into every per-eye array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Eye {
    Left = 0,
    Right = 1,
}

impl Eye {
    pub const BOTH: [Eye; 2] = [Eye::Left, Eye::Right];

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Eye::Left),
            1 => Some(Eye::Right),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApplicationInfo {
    pub application_name: String,
    pub application_version: u32,
    pub engine_name: String,
    pub engine_version: u32,
    pub api_version: Version,
}

/// `XrInstanceCreateInfo`
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceCreateInfo {
    pub ty: StructureType,
    pub create_flags: u64,
    pub application_info: ApplicationInfo,
    pub enabled_api_layer_names: Vec<String>,
    pub enabled_extension_names: Vec<String>,
}

impl InstanceCreateInfo {
    pub fn new(application_info: ApplicationInfo) -> Self {
        Self {
            ty: StructureType::INSTANCE_CREATE_INFO,
            create_flags: 0,
            application_info,
            enabled_api_layer_names: Vec::new(),
            enabled_extension_names: Vec::new(),
        }
    }
}

/// `XrInstanceProperties`
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceProperties {
    pub ty: StructureType,
    pub runtime_version: Version,
    pub runtime_name: String,
}

impl Default for InstanceProperties {
    fn default() -> Self {
        Self {
            ty: StructureType::INSTANCE_PROPERTIES,
            runtime_version: Version::default(),
            runtime_name: String::new(),
        }
    }
}

/// `XrSystemGetInfo`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemGetInfo {
    pub ty: StructureType,
    pub form_factor: FormFactor,
}

impl SystemGetInfo {
    pub fn new(form_factor: FormFactor) -> Self {
        Self {
            ty: StructureType::SYSTEM_GET_INFO,
            form_factor,
        }
    }
}

/// `XrSystemProperties`, graphics and tracking properties left out.
#[derive(Clone, Debug, PartialEq)]
pub struct SystemProperties {
    pub ty: StructureType,
    pub system_id: SystemId,
    pub vendor_id: u32,
    pub system_name: String,
}

impl Default for SystemProperties {
    fn default() -> Self {
        Self {
            ty: StructureType::SYSTEM_PROPERTIES,
            system_id: SystemId::NULL,
            vendor_id: 0,
            system_name: String::new(),
        }
    }
}

/// `XrSessionCreateInfo`. The graphics binding chain is opaque to the layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionCreateInfo {
    pub ty: StructureType,
    pub create_flags: u64,
    pub system_id: SystemId,
}

impl SessionCreateInfo {
    pub fn new(system_id: SystemId) -> Self {
        Self {
            ty: StructureType::SESSION_CREATE_INFO,
            create_flags: 0,
            system_id,
        }
    }
}

/// `XrViewConfigurationView`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewConfigurationView {
    pub ty: StructureType,
    pub recommended_image_rect_width: u32,
    pub max_image_rect_width: u32,
    pub recommended_image_rect_height: u32,
    pub max_image_rect_height: u32,
    pub recommended_swapchain_sample_count: u32,
    pub max_swapchain_sample_count: u32,
}

impl Default for ViewConfigurationView {
    fn default() -> Self {
        Self {
            ty: StructureType::VIEW_CONFIGURATION_VIEW,
            recommended_image_rect_width: 0,
            max_image_rect_width: 0,
            recommended_image_rect_height: 0,
            max_image_rect_height: 0,
            recommended_swapchain_sample_count: 0,
            max_swapchain_sample_count: 0,
        }
    }
}

/// `XrFovf`: four half-angles in radians. Left and down are normally negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Fovf {
    pub angle_left: f32,
    pub angle_right: f32,
    pub angle_up: f32,
    pub angle_down: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quaternionf {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quaternionf {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

/// `XrPosef`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Posef {
    pub orientation: Quaternionf,
    pub position: Vector3f,
}

/// `XrView`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    pub ty: StructureType,
    pub pose: Posef,
    pub fov: Fovf,
}

impl Default for View {
    fn default() -> Self {
        Self {
            ty: StructureType::VIEW,
            pose: Posef::default(),
            fov: Fovf::default(),
        }
    }
}

/// `XrViewLocateInfo`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewLocateInfo {
    pub ty: StructureType,
    pub view_configuration_type: ViewConfigurationType,
    pub display_time: i64,
    pub space: Space,
}

impl ViewLocateInfo {
    pub fn new(view_configuration_type: ViewConfigurationType, display_time: i64, space: Space) -> Self {
        Self {
            ty: StructureType::VIEW_LOCATE_INFO,
            view_configuration_type,
            display_time,
            space,
        }
    }
}

/// `XrViewStateFlags`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ViewStateFlags(u64);

impl ViewStateFlags {
    pub const ORIENTATION_VALID: Self = Self(0x1);
    pub const POSITION_VALID: Self = Self(0x2);
    pub const ORIENTATION_TRACKED: Self = Self(0x4);
    pub const POSITION_TRACKED: Self = Self(0x8);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn into_raw(self) -> u64 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for ViewStateFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// `XrViewState`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewState {
    pub ty: StructureType,
    pub view_state_flags: ViewStateFlags,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            ty: StructureType::VIEW_STATE,
            view_state_flags: ViewStateFlags::empty(),
        }
    }
}
