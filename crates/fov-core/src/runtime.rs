//! The seam between the layer and whatever sits below it in the call chain.
//!
//! `XrRuntime` is implemented by the real runtime binding (outside this
//! crate), by test doubles, and by [`FovLayer`](crate::layer::FovLayer)
//! itself, so layers stack as decorators.
//!
//! Output parameters follow the OpenXR two-call idiom: the capacity is the
//! length of the slice handed in, the required or written count comes back
//! through `&mut u32`.

use crate::xr::{
    Instance, InstanceCreateInfo, InstanceProperties, Session, SessionCreateInfo, SystemGetInfo,
    SystemId, SystemProperties, View, ViewConfigurationType, ViewConfigurationView,
    ViewLocateInfo, ViewState, XrResult,
};

/// Entry points the layer installs itself in front of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hook {
    GetInstanceProcAddr,
    CreateInstance,
    GetSystem,
    CreateSession,
    EnumerateViewConfigurationViews,
    LocateViews,
}

impl Hook {
    pub const ALL: [Hook; 6] = [
        Hook::GetInstanceProcAddr,
        Hook::CreateInstance,
        Hook::GetSystem,
        Hook::CreateSession,
        Hook::EnumerateViewConfigurationViews,
        Hook::LocateViews,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Hook::GetInstanceProcAddr => "xrGetInstanceProcAddr",
            Hook::CreateInstance => "xrCreateInstance",
            Hook::GetSystem => "xrGetSystem",
            Hook::CreateSession => "xrCreateSession",
            Hook::EnumerateViewConfigurationViews => "xrEnumerateViewConfigurationViews",
            Hook::LocateViews => "xrLocateViews",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|hook| hook.name() == name)
    }
}

/// A resolved function: either the next implementation's address or one of
/// the layer's hooks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcAddr {
    Runtime(u64),
    Layer(Hook),
}

pub trait XrRuntime {
    fn get_instance_proc_addr(
        &mut self,
        instance: Instance,
        name: &str,
        function: &mut Option<ProcAddr>,
    ) -> XrResult;

    fn create_instance(&mut self, create_info: &InstanceCreateInfo, instance: &mut Instance)
    -> XrResult;

    fn destroy_instance(&mut self, instance: Instance) -> XrResult;

    fn get_instance_properties(
        &mut self,
        instance: Instance,
        properties: &mut InstanceProperties,
    ) -> XrResult;

    fn get_system(
        &mut self,
        instance: Instance,
        get_info: &SystemGetInfo,
        system_id: &mut SystemId,
    ) -> XrResult;

    fn get_system_properties(
        &mut self,
        instance: Instance,
        system_id: SystemId,
        properties: &mut SystemProperties,
    ) -> XrResult;

    fn create_session(
        &mut self,
        instance: Instance,
        create_info: &SessionCreateInfo,
        session: &mut Session,
    ) -> XrResult;

    fn destroy_session(&mut self, session: Session) -> XrResult;

    fn enumerate_view_configuration_views(
        &mut self,
        instance: Instance,
        system_id: SystemId,
        view_configuration_type: ViewConfigurationType,
        view_count_output: &mut u32,
        views: &mut [ViewConfigurationView],
    ) -> XrResult;

    fn locate_views(
        &mut self,
        session: Session,
        locate_info: &ViewLocateInfo,
        view_state: &mut ViewState,
        view_count_output: &mut u32,
        views: &mut [View],
    ) -> XrResult;
}
