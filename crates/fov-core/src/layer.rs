//! The interception dispatcher.
//!
//! `FovLayer` wraps the next implementation in the call chain and forwards
//! every call to it. Five calls get extra handling around the forward:
//!
//! ```text
//!   xrCreateInstance                   validate → forward → diagnostics, load settings
//!   xrGetSystem                        validate → forward → remember HMD system
//!   xrCreateSession                    validate → forward → mark session handled
//!   xrEnumerateViewConfigurationViews  forward → rescale recommended heights (stereo)
//!   xrLocateViews                      forward → capture once, rescale up/down angles (stereo)
//! ```
//!
//! Post-processing only ever runs after the forward returns a success. A
//! forwarded failure is handed back verbatim.

use crate::capture::{CaptureLatch, CaptureState};
use crate::constants::LAYER_NAME;
use crate::runtime::{Hook, ProcAddr, XrRuntime};
use crate::settings::{Setting, SettingsStore};
use crate::state::FovState;
use crate::xr::{
    FormFactor, Instance, InstanceCreateInfo, InstanceProperties, Session, SessionCreateInfo,
    StructureType, SystemGetInfo, SystemId, SystemProperties, View, ViewConfigurationType,
    ViewConfigurationView, ViewLocateInfo, ViewState, XrResult,
};

/// Per-application policy consulted at instance and session creation.
pub trait LayerHooks {
    /// Disable the layer for this instance. Everything is forwarded untouched.
    fn bypass(&self, _create_info: &InstanceCreateInfo) -> bool {
        false
    }

    /// Whether a session on the selected system should be treated as handled.
    fn handles_session(&self, _create_info: &SessionCreateInfo) -> bool {
        true
    }
}

/// Never bypass, handle every session.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl LayerHooks for NoHooks {}

pub struct FovLayer<R, S> {
    next: R,
    settings: S,
    hooks: Box<dyn LayerHooks>,
    fov: FovState,
    latch: CaptureLatch,
    bypass: bool,
    instance: Instance,
    system_id: SystemId,
    handled_sessions: Vec<Session>,
}

impl<R: XrRuntime, S: SettingsStore> FovLayer<R, S> {
    pub fn new(next: R, settings: S) -> Self {
        Self {
            next,
            settings,
            hooks: Box::new(NoHooks),
            fov: FovState::new(),
            latch: CaptureLatch::new(),
            bypass: false,
            instance: Instance::NULL,
            system_id: SystemId::NULL,
            handled_sessions: Vec::new(),
        }
    }

    pub fn with_hooks(mut self, hooks: impl LayerHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    pub fn next(&self) -> &R {
        &self.next
    }

    pub fn next_mut(&mut self) -> &mut R {
        &mut self.next
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    pub fn fov_state(&self) -> &FovState {
        &self.fov
    }

    pub fn capture_state(&self) -> CaptureState {
        self.latch.state()
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypass
    }

    pub fn instance(&self) -> Instance {
        self.instance
    }

    /// The HMD system most recently returned by `xrGetSystem`.
    pub fn system_id(&self) -> SystemId {
        self.system_id
    }

    pub fn is_session_handled(&self, session: Session) -> bool {
        self.handled_sessions.contains(&session)
    }

    pub fn into_parts(self) -> (R, S) {
        (self.next, self.settings)
    }

    fn is_system_handled(&self, system_id: SystemId) -> bool {
        system_id == self.system_id
    }

    fn log_instance_diagnostics(&mut self, create_info: &InstanceCreateInfo, instance: Instance) {
        for name in &create_info.enabled_api_layer_names {
            tracing::debug!(api_layer_name = %name, "xrCreateInstance");
        }
        for name in &create_info.enabled_extension_names {
            tracing::debug!(extension_name = %name, "xrCreateInstance");
        }

        let mut properties = InstanceProperties::default();
        let result = self.next.get_instance_properties(instance, &mut properties);
        if result.is_failure() {
            tracing::warn!("xrGetInstanceProperties failed: {result}");
            return;
        }
        let runtime_name = format!("{} {}", properties.runtime_name, properties.runtime_version);
        tracing::debug!(runtime_name = %runtime_name, "xrCreateInstance");
        tracing::info!("Using OpenXR runtime: {runtime_name}");
    }

    fn load_settings(&mut self) {
        self.fov.load_baseline(&self.settings);
        self.fov.load_scale(&self.settings);

        let scale = self.fov.scale();
        tracing::info!("angle_up: {}", self.settings.get_or_default(Setting::AngleUp));
        tracing::info!("angle_down: {}", self.settings.get_or_default(Setting::AngleDown));
        tracing::info!("fov_up: {}", scale.up);
        tracing::info!("fov_down: {}", scale.down);
    }
}

impl<R: XrRuntime, S: SettingsStore> XrRuntime for FovLayer<R, S> {
    fn get_instance_proc_addr(
        &mut self,
        instance: Instance,
        name: &str,
        function: &mut Option<ProcAddr>,
    ) -> XrResult {
        tracing::debug!(%instance, name = %name, bypass = self.bypass, "xrGetInstanceProcAddr");

        let result = self.next.get_instance_proc_addr(instance, name, function);
        if !self.bypass
            && result.is_success()
            && let Some(hook) = Hook::from_name(name)
        {
            *function = Some(ProcAddr::Layer(hook));
        }

        tracing::debug!(function = ?function, "xrGetInstanceProcAddr");
        result
    }

    fn create_instance(
        &mut self,
        create_info: &InstanceCreateInfo,
        instance: &mut Instance,
    ) -> XrResult {
        if create_info.ty != StructureType::INSTANCE_CREATE_INFO {
            return XrResult::ERROR_VALIDATION_FAILURE;
        }

        // Forward first: the remaining bindings hang off the created instance.
        let result = self.next.create_instance(create_info, instance);
        if result.is_failure() {
            tracing::warn!("xrCreateInstance failed downstream: {result}");
            return result;
        }
        self.instance = *instance;

        let app = &create_info.application_info;
        tracing::debug!(
            api_version = %app.api_version,
            application_name = %app.application_name,
            application_version = app.application_version,
            engine_name = %app.engine_name,
            engine_version = app.engine_version,
            create_flags = create_info.create_flags,
            "xrCreateInstance"
        );
        tracing::info!("Application: {}", app.application_name);

        self.bypass = self.hooks.bypass(create_info);
        if self.bypass {
            tracing::info!("{LAYER_NAME} layer will be bypassed");
            return result;
        }

        self.log_instance_diagnostics(create_info, *instance);
        self.load_settings();

        result
    }

    fn destroy_instance(&mut self, instance: Instance) -> XrResult {
        self.next.destroy_instance(instance)
    }

    fn get_instance_properties(
        &mut self,
        instance: Instance,
        properties: &mut InstanceProperties,
    ) -> XrResult {
        self.next.get_instance_properties(instance, properties)
    }

    fn get_system(
        &mut self,
        instance: Instance,
        get_info: &SystemGetInfo,
        system_id: &mut SystemId,
    ) -> XrResult {
        if self.bypass {
            return self.next.get_system(instance, get_info, system_id);
        }
        if get_info.ty != StructureType::SYSTEM_GET_INFO {
            return XrResult::ERROR_VALIDATION_FAILURE;
        }

        tracing::debug!(%instance, form_factor = %get_info.form_factor, "xrGetSystem");

        let result = self.next.get_system(instance, get_info, system_id);
        if result.is_success() && get_info.form_factor == FormFactor::HEAD_MOUNTED_DISPLAY {
            if *system_id != self.system_id {
                let mut properties = SystemProperties::default();
                let props_result =
                    self.next
                        .get_system_properties(instance, *system_id, &mut properties);
                if props_result.is_success() {
                    tracing::debug!(system_name = %properties.system_name, "xrGetSystem");
                    tracing::info!("Using OpenXR system: {}", properties.system_name);
                } else {
                    tracing::warn!("xrGetSystemProperties failed: {props_result}");
                }
            }

            // Remember the system to use.
            self.system_id = *system_id;
        }

        tracing::debug!(system_id = %system_id, "xrGetSystem");
        result
    }

    fn get_system_properties(
        &mut self,
        instance: Instance,
        system_id: SystemId,
        properties: &mut SystemProperties,
    ) -> XrResult {
        self.next.get_system_properties(instance, system_id, properties)
    }

    fn create_session(
        &mut self,
        instance: Instance,
        create_info: &SessionCreateInfo,
        session: &mut Session,
    ) -> XrResult {
        if self.bypass {
            return self.next.create_session(instance, create_info, session);
        }
        if create_info.ty != StructureType::SESSION_CREATE_INFO {
            return XrResult::ERROR_VALIDATION_FAILURE;
        }

        tracing::debug!(
            %instance,
            system_id = %create_info.system_id,
            create_flags = create_info.create_flags,
            "xrCreateSession"
        );

        let result = self.next.create_session(instance, create_info, session);
        if result.is_success() {
            if self.is_system_handled(create_info.system_id)
                && self.hooks.handles_session(create_info)
            {
                tracing::debug!(session = %session, "session handled");
                self.handled_sessions.push(*session);
            }

            tracing::debug!(session = %session, "xrCreateSession");
        }

        result
    }

    fn destroy_session(&mut self, session: Session) -> XrResult {
        let result = self.next.destroy_session(session);
        if result.is_success() {
            self.handled_sessions.retain(|handled| *handled != session);
        }
        result
    }

    fn enumerate_view_configuration_views(
        &mut self,
        instance: Instance,
        system_id: SystemId,
        view_configuration_type: ViewConfigurationType,
        view_count_output: &mut u32,
        views: &mut [ViewConfigurationView],
    ) -> XrResult {
        tracing::debug!("xrEnumerateViewConfigurationViews");

        let result = self.next.enumerate_view_configuration_views(
            instance,
            system_id,
            view_configuration_type,
            view_count_output,
            views,
        );
        if self.bypass
            || result.is_failure()
            || views.is_empty()
            || view_configuration_type != ViewConfigurationType::PRIMARY_STEREO
        {
            return result;
        }

        let count = (*view_count_output as usize).min(views.len());
        for (index, view) in views[..count].iter_mut().enumerate() {
            let height = view.recommended_image_rect_height;
            view.recommended_image_rect_height = self.fov.rect_height(index, height);
            tracing::trace!(
                view = index,
                from = height,
                to = view.recommended_image_rect_height,
                "recommended height"
            );
        }

        result
    }

    fn locate_views(
        &mut self,
        session: Session,
        locate_info: &ViewLocateInfo,
        view_state: &mut ViewState,
        view_count_output: &mut u32,
        views: &mut [View],
    ) -> XrResult {
        let result =
            self.next
                .locate_views(session, locate_info, view_state, view_count_output, views);
        if self.bypass
            || result.is_failure()
            || views.is_empty()
            || locate_info.view_configuration_type != ViewConfigurationType::PRIMARY_STEREO
        {
            return result;
        }

        let count = (*view_count_output as usize).min(views.len());
        for view in &mut views[..count] {
            if !self.latch.is_captured() {
                self.latch
                    .capture(&view.fov, &mut self.settings, &mut self.fov);
            }
            self.fov.correct_fov(&mut view.fov);
        }

        result
    }
}
