//! Dispatcher tests: a scripted runtime below `FovLayer`, settings in memory,
//! driven through the same call sequence an application makes.

use approx::assert_relative_eq;
use fov_core::xr::{
    ApplicationInfo, Fovf, FormFactor, Instance, InstanceCreateInfo, InstanceProperties, Posef,
    Session, SessionCreateInfo, Space, StructureType, SystemGetInfo, SystemId, SystemProperties,
    Vector3f, Version, View, ViewConfigurationType, ViewConfigurationView, ViewLocateInfo,
    ViewState, ViewStateFlags, XrResult,
};
use fov_core::{
    CaptureState, FovLayer, FovScale, Hook, LayerHooks, MemorySettings, ProcAddr, Setting,
    SettingsStore, XrRuntime,
};
use proptest::prelude::*;

const HMD_SYSTEM: u64 = 0x42;

/// Stands in for the real runtime. Reports fixed geometry and counts calls.
struct FakeRuntime {
    calls: Vec<&'static str>,
    fail_create_instance: Option<XrResult>,
    fail_locate: Option<XrResult>,
    system_id: u64,
    fov: [Fovf; 2],
    rect: (u32, u32),
    next_session: u64,
}

impl FakeRuntime {
    fn new() -> Self {
        Self {
            calls: Vec::new(),
            fail_create_instance: None,
            fail_locate: None,
            system_id: HMD_SYSTEM,
            fov: [eye_fov(0.3927, -0.3491), eye_fov(0.3927, -0.3491)],
            rect: (1_832, 1_920),
            next_session: 0x5000,
        }
    }

    fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

impl XrRuntime for FakeRuntime {
    fn get_instance_proc_addr(
        &mut self,
        _instance: Instance,
        name: &str,
        function: &mut Option<ProcAddr>,
    ) -> XrResult {
        self.calls.push("xrGetInstanceProcAddr");
        if name.starts_with("xr") {
            *function = Some(ProcAddr::Runtime(0x1000 + name.len() as u64));
            XrResult::SUCCESS
        } else {
            *function = None;
            XrResult::ERROR_FUNCTION_UNSUPPORTED
        }
    }

    fn create_instance(
        &mut self,
        _create_info: &InstanceCreateInfo,
        instance: &mut Instance,
    ) -> XrResult {
        self.calls.push("xrCreateInstance");
        if let Some(result) = self.fail_create_instance {
            return result;
        }
        *instance = Instance::from_raw(0xA1);
        XrResult::SUCCESS
    }

    fn destroy_instance(&mut self, _instance: Instance) -> XrResult {
        self.calls.push("xrDestroyInstance");
        XrResult::SUCCESS
    }

    fn get_instance_properties(
        &mut self,
        _instance: Instance,
        properties: &mut InstanceProperties,
    ) -> XrResult {
        self.calls.push("xrGetInstanceProperties");
        properties.runtime_name = "FakeXR".to_string();
        properties.runtime_version = Version::new(1, 0, 27);
        XrResult::SUCCESS
    }

    fn get_system(
        &mut self,
        _instance: Instance,
        get_info: &SystemGetInfo,
        system_id: &mut SystemId,
    ) -> XrResult {
        self.calls.push("xrGetSystem");
        if get_info.form_factor != FormFactor::HEAD_MOUNTED_DISPLAY {
            return XrResult::ERROR_FORM_FACTOR_UNAVAILABLE;
        }
        *system_id = SystemId::from_raw(self.system_id);
        XrResult::SUCCESS
    }

    fn get_system_properties(
        &mut self,
        _instance: Instance,
        system_id: SystemId,
        properties: &mut SystemProperties,
    ) -> XrResult {
        self.calls.push("xrGetSystemProperties");
        properties.system_id = system_id;
        properties.system_name = "Fake HMD".to_string();
        XrResult::SUCCESS
    }

    fn create_session(
        &mut self,
        _instance: Instance,
        _create_info: &SessionCreateInfo,
        session: &mut Session,
    ) -> XrResult {
        self.calls.push("xrCreateSession");
        self.next_session += 1;
        *session = Session::from_raw(self.next_session);
        XrResult::SUCCESS
    }

    fn destroy_session(&mut self, _session: Session) -> XrResult {
        self.calls.push("xrDestroySession");
        XrResult::SUCCESS
    }

    fn enumerate_view_configuration_views(
        &mut self,
        _instance: Instance,
        _system_id: SystemId,
        view_configuration_type: ViewConfigurationType,
        view_count_output: &mut u32,
        views: &mut [ViewConfigurationView],
    ) -> XrResult {
        self.calls.push("xrEnumerateViewConfigurationViews");
        let count = if view_configuration_type == ViewConfigurationType::PRIMARY_STEREO {
            2
        } else {
            1
        };
        *view_count_output = count as u32;
        if views.is_empty() {
            return XrResult::SUCCESS;
        }
        if views.len() < count {
            return XrResult::ERROR_SIZE_INSUFFICIENT;
        }
        for view in &mut views[..count] {
            view.recommended_image_rect_width = self.rect.0;
            view.recommended_image_rect_height = self.rect.1;
            view.max_image_rect_width = 4_096;
            view.max_image_rect_height = 4_096;
            view.recommended_swapchain_sample_count = 1;
            view.max_swapchain_sample_count = 4;
        }
        XrResult::SUCCESS
    }

    fn locate_views(
        &mut self,
        _session: Session,
        _locate_info: &ViewLocateInfo,
        view_state: &mut ViewState,
        view_count_output: &mut u32,
        views: &mut [View],
    ) -> XrResult {
        self.calls.push("xrLocateViews");
        if let Some(result) = self.fail_locate {
            return result;
        }
        *view_count_output = 2;
        if views.is_empty() {
            return XrResult::SUCCESS;
        }
        if views.len() < 2 {
            return XrResult::ERROR_SIZE_INSUFFICIENT;
        }
        view_state.view_state_flags =
            ViewStateFlags::ORIENTATION_VALID | ViewStateFlags::POSITION_VALID;
        for (i, view) in views[..2].iter_mut().enumerate() {
            view.fov = self.fov[i];
            view.pose = eye_pose(i);
        }
        XrResult::SUCCESS
    }
}

fn eye_fov(up: f32, down: f32) -> Fovf {
    Fovf {
        angle_left: -0.87,
        angle_right: 0.78,
        angle_up: up,
        angle_down: down,
    }
}

fn eye_pose(i: usize) -> Posef {
    Posef {
        position: Vector3f {
            x: if i == 0 { -0.032 } else { 0.032 },
            y: 1.6,
            z: 0.0,
        },
        ..Posef::default()
    }
}

fn app_info(name: &str) -> ApplicationInfo {
    ApplicationInfo {
        application_name: name.to_string(),
        application_version: 1,
        engine_name: "TestEngine".to_string(),
        engine_version: 3,
        api_version: Version::new(1, 0, 0),
    }
}

type TestLayer = FovLayer<FakeRuntime, MemorySettings>;

fn layer_with(settings: MemorySettings) -> TestLayer {
    FovLayer::new(FakeRuntime::new(), settings)
}

fn create_instance(layer: &mut TestLayer) -> Instance {
    let mut instance = Instance::NULL;
    let result = layer.create_instance(&InstanceCreateInfo::new(app_info("hello_xr")), &mut instance);
    assert_eq!(result, XrResult::SUCCESS);
    instance
}

fn locate(layer: &mut TestLayer, ty: ViewConfigurationType, capacity: usize) -> (XrResult, u32, Vec<View>) {
    let mut views = vec![View::default(); capacity];
    let mut state = ViewState::default();
    let mut count = 0;
    let info = ViewLocateInfo::new(ty, 1_000, Space::from_raw(9));
    let result = layer.locate_views(Session::from_raw(0x5001), &info, &mut state, &mut count, &mut views);
    (result, count, views)
}

fn enumerate(
    layer: &mut TestLayer,
    ty: ViewConfigurationType,
    capacity: usize,
) -> (XrResult, u32, Vec<ViewConfigurationView>) {
    let mut views = vec![ViewConfigurationView::default(); capacity];
    let mut count = 0;
    let result = layer.enumerate_view_configuration_views(
        Instance::from_raw(0xA1),
        SystemId::from_raw(HMD_SYSTEM),
        ty,
        &mut count,
        &mut views,
    );
    (result, count, views)
}

// -- Create Instance --

#[test]
fn create_instance_rejects_wrong_tag_without_forwarding() {
    let mut layer = layer_with(MemorySettings::new());
    let mut info = InstanceCreateInfo::new(app_info("app"));
    info.ty = StructureType::SESSION_CREATE_INFO;
    let mut instance = Instance::NULL;

    let result = layer.create_instance(&info, &mut instance);
    assert_eq!(result, XrResult::ERROR_VALIDATION_FAILURE);
    assert!(layer.next().calls.is_empty());
    assert!(instance.is_null());
}

#[test]
fn create_instance_propagates_downstream_failure() {
    let mut runtime = FakeRuntime::new();
    runtime.fail_create_instance = Some(XrResult::ERROR_RUNTIME_FAILURE);
    let settings = MemorySettings::new().with(Setting::FovUp, 1_500);
    let mut layer = FovLayer::new(runtime, settings);

    let mut instance = Instance::NULL;
    let result = layer.create_instance(&InstanceCreateInfo::new(app_info("app")), &mut instance);
    assert_eq!(result, XrResult::ERROR_RUNTIME_FAILURE);
    assert_eq!(layer.fov_state().scale(), FovScale::NEUTRAL);
    assert_eq!(layer.next().count("xrGetInstanceProperties"), 0);
}

#[test]
fn create_instance_loads_settings_and_queries_runtime() {
    let settings = MemorySettings::new()
        .with(Setting::FovUp, 1_200)
        .with(Setting::FovDown, 900)
        .with(Setting::AngleUp, 40_000)
        .with(Setting::AngleDown, 42_000);
    let mut layer = layer_with(settings);
    let instance = create_instance(&mut layer);

    assert_eq!(instance, Instance::from_raw(0xA1));
    assert_eq!(layer.instance(), instance);
    assert_eq!(layer.next().count("xrGetInstanceProperties"), 1);
    assert_relative_eq!(layer.fov_state().scale().up, 1.2, epsilon = 1e-12);
    assert_relative_eq!(layer.fov_state().scale().down, 0.9, epsilon = 1e-12);
    let left = layer.fov_state().baseline().eye(fov_core::xr::Eye::Left);
    assert_relative_eq!(left.up, 40.0f64.to_radians(), epsilon = 1e-12);
    assert_relative_eq!(left.down, 42.0f64.to_radians(), epsilon = 1e-12);
}

#[test]
fn missing_settings_fall_back_to_defaults() {
    let mut layer = layer_with(MemorySettings::new());
    create_instance(&mut layer);

    assert_eq!(layer.fov_state().scale(), FovScale::NEUTRAL);
    for eye in fov_core::xr::Eye::BOTH {
        let pair = layer.fov_state().baseline().eye(eye);
        assert_relative_eq!(pair.up, std::f64::consts::FRAC_PI_4, epsilon = 1e-12);
        assert_relative_eq!(pair.down, std::f64::consts::FRAC_PI_4, epsilon = 1e-12);
    }
}

// -- Bypass --

struct BypassAll;

impl LayerHooks for BypassAll {
    fn bypass(&self, _create_info: &InstanceCreateInfo) -> bool {
        true
    }
}

#[test]
fn bypassed_layer_forwards_everything_untouched() {
    let settings = MemorySettings::new().with(Setting::FovUp, 1_500);
    let mut layer = layer_with(settings).with_hooks(BypassAll);
    create_instance(&mut layer);

    assert!(layer.is_bypassed());
    assert_eq!(layer.next().count("xrGetInstanceProperties"), 0);
    assert_eq!(layer.fov_state().scale(), FovScale::NEUTRAL);

    let mut function = None;
    let result = layer.get_instance_proc_addr(Instance::from_raw(0xA1), "xrLocateViews", &mut function);
    assert_eq!(result, XrResult::SUCCESS);
    assert!(matches!(function, Some(ProcAddr::Runtime(_))));

    let (result, _, views) = locate(&mut layer, ViewConfigurationType::PRIMARY_STEREO, 2);
    assert_eq!(result, XrResult::SUCCESS);
    assert_eq!(views[0].fov, eye_fov(0.3927, -0.3491));
    assert_eq!(layer.capture_state(), CaptureState::Uncaptured);
    assert_eq!(layer.settings().get(Setting::AngleUp), None);
}

// -- Get Instance Proc Addr --

#[test]
fn proc_addr_substitutes_layer_hooks() {
    let mut layer = layer_with(MemorySettings::new());
    let instance = create_instance(&mut layer);

    for hook in Hook::ALL {
        let mut function = None;
        let result = layer.get_instance_proc_addr(instance, hook.name(), &mut function);
        assert_eq!(result, XrResult::SUCCESS);
        assert_eq!(function, Some(ProcAddr::Layer(hook)));
    }

    let mut function = None;
    let result = layer.get_instance_proc_addr(instance, "xrEndFrame", &mut function);
    assert_eq!(result, XrResult::SUCCESS);
    assert!(matches!(function, Some(ProcAddr::Runtime(_))));
}

#[test]
fn proc_addr_failure_is_not_replaced() {
    let mut layer = layer_with(MemorySettings::new());
    let mut function = None;
    let result = layer.get_instance_proc_addr(Instance::from_raw(0xA1), "bogus", &mut function);
    assert_eq!(result, XrResult::ERROR_FUNCTION_UNSUPPORTED);
    assert_eq!(function, None);
}

// -- Get System / Create Session --

#[test]
fn get_system_rejects_wrong_tag() {
    let mut layer = layer_with(MemorySettings::new());
    let instance = create_instance(&mut layer);
    let mut info = SystemGetInfo::new(FormFactor::HEAD_MOUNTED_DISPLAY);
    info.ty = StructureType::INSTANCE_CREATE_INFO;
    let mut system = SystemId::NULL;

    assert_eq!(
        layer.get_system(instance, &info, &mut system),
        XrResult::ERROR_VALIDATION_FAILURE
    );
    assert_eq!(layer.next().count("xrGetSystem"), 0);
}

#[test]
fn get_system_remembers_hmd_and_queries_name_once() {
    let mut layer = layer_with(MemorySettings::new());
    let instance = create_instance(&mut layer);
    let info = SystemGetInfo::new(FormFactor::HEAD_MOUNTED_DISPLAY);

    for _ in 0..3 {
        let mut system = SystemId::NULL;
        assert_eq!(layer.get_system(instance, &info, &mut system), XrResult::SUCCESS);
        assert_eq!(system, SystemId::from_raw(HMD_SYSTEM));
    }
    assert_eq!(layer.system_id(), SystemId::from_raw(HMD_SYSTEM));
    assert_eq!(layer.next().count("xrGetSystemProperties"), 1);

    // A different system is announced again
    layer.next_mut().system_id = 0x43;
    let mut system = SystemId::NULL;
    layer.get_system(instance, &info, &mut system);
    assert_eq!(layer.next().count("xrGetSystemProperties"), 2);
    assert_eq!(layer.system_id(), SystemId::from_raw(0x43));
}

#[test]
fn get_system_failure_passes_through() {
    let mut layer = layer_with(MemorySettings::new());
    let instance = create_instance(&mut layer);
    let mut system = SystemId::NULL;
    let result = layer.get_system(
        instance,
        &SystemGetInfo::new(FormFactor::HANDHELD_DISPLAY),
        &mut system,
    );
    assert_eq!(result, XrResult::ERROR_FORM_FACTOR_UNAVAILABLE);
    assert!(layer.system_id().is_null());
}

#[test]
fn session_on_selected_system_is_handled() {
    let mut layer = layer_with(MemorySettings::new());
    let instance = create_instance(&mut layer);
    let mut system = SystemId::NULL;
    layer.get_system(
        instance,
        &SystemGetInfo::new(FormFactor::HEAD_MOUNTED_DISPLAY),
        &mut system,
    );

    let mut session = Session::NULL;
    let result = layer.create_session(instance, &SessionCreateInfo::new(system), &mut session);
    assert_eq!(result, XrResult::SUCCESS);
    assert!(layer.is_session_handled(session));

    let mut other = Session::NULL;
    layer.create_session(
        instance,
        &SessionCreateInfo::new(SystemId::from_raw(0x99)),
        &mut other,
    );
    assert!(!layer.is_session_handled(other));

    assert_eq!(layer.destroy_session(session), XrResult::SUCCESS);
    assert!(!layer.is_session_handled(session));
}

#[test]
fn create_session_rejects_wrong_tag() {
    let mut layer = layer_with(MemorySettings::new());
    let instance = create_instance(&mut layer);
    let mut info = SessionCreateInfo::new(SystemId::from_raw(HMD_SYSTEM));
    info.ty = StructureType::UNKNOWN;
    let mut session = Session::NULL;

    assert_eq!(
        layer.create_session(instance, &info, &mut session),
        XrResult::ERROR_VALIDATION_FAILURE
    );
    assert_eq!(layer.next().count("xrCreateSession"), 0);
}

// -- Enumerate View Configuration Views --

#[test]
fn enumerate_size_query_is_untouched() {
    let mut layer = layer_with(MemorySettings::new().with(Setting::FovUp, 1_300));
    create_instance(&mut layer);

    let (result, count, views) = enumerate(&mut layer, ViewConfigurationType::PRIMARY_STEREO, 0);
    assert_eq!(result, XrResult::SUCCESS);
    assert_eq!(count, 2);
    assert!(views.is_empty());
}

#[test]
fn enumerate_neutral_scale_keeps_height() {
    let mut layer = layer_with(MemorySettings::new());
    create_instance(&mut layer);

    let (_, _, views) = enumerate(&mut layer, ViewConfigurationType::PRIMARY_STEREO, 2);
    for view in &views {
        assert_eq!(view.recommended_image_rect_height, 1_920);
        assert_eq!(view.recommended_image_rect_width, 1_832);
    }
}

#[test]
fn enumerate_rescales_height_only() {
    let settings = MemorySettings::new()
        .with(Setting::FovUp, 1_100)
        .with(Setting::FovDown, 1_100);
    let mut layer = layer_with(settings);
    create_instance(&mut layer);

    let (result, count, views) = enumerate(&mut layer, ViewConfigurationType::PRIMARY_STEREO, 2);
    assert_eq!(result, XrResult::SUCCESS);
    assert_eq!(count, 2);

    // Default 45° baseline: 960 · tan(49.5°) / tan(45°) · 2
    let expected = (1_920.0 * 49.5f64.to_radians().tan()).round() as u32;
    for view in &views {
        assert_eq!(view.recommended_image_rect_height, expected);
        assert_eq!(view.recommended_image_rect_width, 1_832);
        assert_eq!(view.max_image_rect_height, 4_096);
        assert_eq!(view.recommended_swapchain_sample_count, 1);
    }
}

#[test]
fn enumerate_mono_is_untouched() {
    let mut layer = layer_with(MemorySettings::new().with(Setting::FovUp, 1_300));
    create_instance(&mut layer);

    let (_, count, views) = enumerate(&mut layer, ViewConfigurationType::PRIMARY_MONO, 1);
    assert_eq!(count, 1);
    assert_eq!(views[0].recommended_image_rect_height, 1_920);
}

#[test]
fn enumerate_insufficient_capacity_passes_through() {
    let mut layer = layer_with(MemorySettings::new().with(Setting::FovUp, 1_300));
    create_instance(&mut layer);

    let (result, _, views) = enumerate(&mut layer, ViewConfigurationType::PRIMARY_STEREO, 1);
    assert_eq!(result, XrResult::ERROR_SIZE_INSUFFICIENT);
    assert_eq!(views[0], ViewConfigurationView::default());
}

// -- Locate Views --

#[test]
fn locate_neutral_scale_leaves_angles() {
    let mut layer = layer_with(
        MemorySettings::new()
            .with(Setting::FovUp, 1_000)
            .with(Setting::FovDown, 1_000),
    );
    create_instance(&mut layer);

    let (result, count, views) = locate(&mut layer, ViewConfigurationType::PRIMARY_STEREO, 2);
    assert_eq!(result, XrResult::SUCCESS);
    assert_eq!(count, 2);
    assert_relative_eq!(views[0].fov.angle_up, 0.3927, epsilon = 1e-6);
    assert_relative_eq!(views[1].fov.angle_up, 0.3927, epsilon = 1e-6);
}

#[test]
fn locate_scales_angle_up() {
    let mut layer = layer_with(MemorySettings::new().with(Setting::FovUp, 1_200));
    create_instance(&mut layer);

    let (_, _, views) = locate(&mut layer, ViewConfigurationType::PRIMARY_STEREO, 2);
    for view in &views {
        assert_relative_eq!(view.fov.angle_up, 0.47124, epsilon = 1e-5);
        assert_relative_eq!(view.fov.angle_down, -0.3491, epsilon = 1e-6);
    }
}

#[test]
fn locate_leaves_pose_and_horizontal_angles() {
    let mut layer = layer_with(
        MemorySettings::new()
            .with(Setting::FovUp, 1_200)
            .with(Setting::FovDown, 800),
    );
    create_instance(&mut layer);

    let (_, _, views) = locate(&mut layer, ViewConfigurationType::PRIMARY_STEREO, 2);
    for (i, view) in views.iter().enumerate() {
        assert_eq!(view.pose, eye_pose(i));
        assert_eq!(view.fov.angle_left, -0.87);
        assert_eq!(view.fov.angle_right, 0.78);
        assert_eq!(view.ty, StructureType::VIEW);
    }
}

#[test]
fn first_locate_captures_and_persists_baseline() {
    let mut layer = layer_with(MemorySettings::new());
    create_instance(&mut layer);
    assert_eq!(layer.capture_state(), CaptureState::Uncaptured);

    locate(&mut layer, ViewConfigurationType::PRIMARY_STEREO, 2);
    assert_eq!(layer.capture_state(), CaptureState::Captured);
    assert_eq!(layer.settings().get(Setting::AngleUp), Some(22_500));
    assert_eq!(layer.settings().get(Setting::AngleDown), Some(20_002));

    // Runtime changes its report; the store and the cache stay put
    let before = *layer.fov_state();
    layer.next_mut().fov = [eye_fov(0.61, -0.58), eye_fov(0.61, -0.58)];
    let (_, _, views) = locate(&mut layer, ViewConfigurationType::PRIMARY_STEREO, 2);
    assert_relative_eq!(views[0].fov.angle_up, 0.61, epsilon = 1e-6);
    assert_eq!(layer.settings().get(Setting::AngleUp), Some(22_500));
    assert_eq!(layer.settings().get(Setting::AngleDown), Some(20_002));
    assert_eq!(*layer.fov_state(), before);
}

#[test]
fn captured_baseline_drives_rect_height_across_frames() {
    let mut layer = layer_with(MemorySettings::new().with(Setting::FovUp, 1_250));
    create_instance(&mut layer);

    locate(&mut layer, ViewConfigurationType::PRIMARY_STEREO, 2);
    let (_, _, first) = enumerate(&mut layer, ViewConfigurationType::PRIMARY_STEREO, 2);

    layer.next_mut().fov = [eye_fov(0.7, -0.7), eye_fov(0.7, -0.7)];
    locate(&mut layer, ViewConfigurationType::PRIMARY_STEREO, 2);
    let (_, _, second) = enumerate(&mut layer, ViewConfigurationType::PRIMARY_STEREO, 2);

    assert_eq!(first, second);
    // 960 · tan(22.5° · 1.25) / tan(22.5°) + 960
    let up = 22.5f64.to_radians();
    let expected = (960.0 * (up * 1.25).tan() / up.tan() + 960.0).round() as u32;
    assert_eq!(first[0].recommended_image_rect_height, expected);
}

#[test]
fn capture_uses_left_eye_for_both_eyes() {
    // Per-eye capture is not done: eye 0's angles stand in for both eyes.
    let mut runtime = FakeRuntime::new();
    runtime.fov = [eye_fov(0.40, -0.35), eye_fov(0.50, -0.45)];
    let mut layer = FovLayer::new(runtime, MemorySettings::new());
    create_instance(&mut layer);

    locate(&mut layer, ViewConfigurationType::PRIMARY_STEREO, 2);

    let baseline = layer.fov_state().baseline();
    assert_eq!(
        baseline.eye(fov_core::xr::Eye::Left),
        baseline.eye(fov_core::xr::Eye::Right)
    );
    assert_relative_eq!(baseline.eye(fov_core::xr::Eye::Right).up, 0.40, epsilon = 1e-4);
}

#[test]
fn locate_zero_capacity_does_not_capture() {
    let mut layer = layer_with(MemorySettings::new().with(Setting::FovUp, 1_200));
    create_instance(&mut layer);

    let (result, count, views) = locate(&mut layer, ViewConfigurationType::PRIMARY_STEREO, 0);
    assert_eq!(result, XrResult::SUCCESS);
    assert_eq!(count, 2);
    assert!(views.is_empty());
    assert_eq!(layer.capture_state(), CaptureState::Uncaptured);
    assert_eq!(layer.settings().get(Setting::AngleUp), None);
}

#[test]
fn locate_mono_does_not_capture() {
    let mut layer = layer_with(MemorySettings::new().with(Setting::FovUp, 1_200));
    create_instance(&mut layer);

    let (_, _, views) = locate(&mut layer, ViewConfigurationType::PRIMARY_MONO, 2);
    assert_eq!(views[0].fov, eye_fov(0.3927, -0.3491));
    assert_eq!(layer.capture_state(), CaptureState::Uncaptured);
}

#[test]
fn locate_failure_is_verbatim_and_does_not_capture() {
    let mut runtime = FakeRuntime::new();
    runtime.fail_locate = Some(XrResult::SESSION_LOSS_PENDING);
    let mut layer = FovLayer::new(runtime, MemorySettings::new());
    create_instance(&mut layer);

    // A success code other than XR_SUCCESS with nothing written
    let (result, _, views) = locate(&mut layer, ViewConfigurationType::PRIMARY_STEREO, 2);
    assert_eq!(result, XrResult::SESSION_LOSS_PENDING);
    assert_eq!(views[0].fov, Fovf::default());

    layer.next_mut().fail_locate = Some(XrResult::ERROR_HANDLE_INVALID);
    let (result, _, _) = locate(&mut layer, ViewConfigurationType::PRIMARY_STEREO, 2);
    assert_eq!(result, XrResult::ERROR_HANDLE_INVALID);
    assert_eq!(layer.settings().get(Setting::AngleDown), None);
}

#[test]
fn unwritable_store_still_corrects_frames() {
    let settings = MemorySettings::new().with(Setting::FovDown, 500).read_only();
    let mut layer = layer_with(settings);
    create_instance(&mut layer);

    let (result, _, views) = locate(&mut layer, ViewConfigurationType::PRIMARY_STEREO, 2);
    assert_eq!(result, XrResult::SUCCESS);
    assert_eq!(layer.capture_state(), CaptureState::Captured);
    assert_relative_eq!(views[0].fov.angle_down, -0.3491 * 0.5, epsilon = 1e-6);
    assert_eq!(layer.settings().get(Setting::AngleUp), None);
}

#[test]
fn layers_stack() {
    let inner = layer_with(MemorySettings::new().with(Setting::FovUp, 1_200));
    let mut outer = FovLayer::new(inner, MemorySettings::new().with(Setting::FovUp, 1_100));

    let mut instance = Instance::NULL;
    outer.create_instance(&InstanceCreateInfo::new(app_info("stacked")), &mut instance);

    let mut views = vec![View::default(); 2];
    let mut count = 0;
    let info = ViewLocateInfo::new(ViewConfigurationType::PRIMARY_STEREO, 0, Space::NULL);
    outer.locate_views(Session::from_raw(1), &info, &mut ViewState::default(), &mut count, &mut views);

    assert_relative_eq!(views[0].fov.angle_up, 0.3927 * 1.2 * 1.1, epsilon = 1e-5);
}

#[test]
fn pass_through_calls_reach_runtime() {
    let mut layer = layer_with(MemorySettings::new());
    let instance = create_instance(&mut layer);

    let mut properties = InstanceProperties::default();
    assert_eq!(layer.get_instance_properties(instance, &mut properties), XrResult::SUCCESS);
    assert_eq!(properties.runtime_name, "FakeXR");

    let mut system = SystemProperties::default();
    layer.get_system_properties(instance, SystemId::from_raw(HMD_SYSTEM), &mut system);
    assert_eq!(system.system_name, "Fake HMD");

    assert_eq!(layer.destroy_instance(instance), XrResult::SUCCESS);
    assert_eq!(layer.next().count("xrDestroyInstance"), 1);
}

proptest! {
    #[test]
    fn prop_store_keeps_first_capture(
        frames in proptest::collection::vec((0.1f32..1.2, -1.2f32..-0.1), 1..8)
    ) {
        let mut layer = layer_with(MemorySettings::new());
        create_instance(&mut layer);

        let (first_up, first_down) = frames[0];
        for (up, down) in frames {
            layer.next_mut().fov = [eye_fov(up, down), eye_fov(up, down)];
            locate(&mut layer, ViewConfigurationType::PRIMARY_STEREO, 2);
        }

        prop_assert_eq!(
            layer.settings().get(Setting::AngleUp),
            Some(fov_core::radians_to_millidegrees(f64::from(first_up)))
        );
        prop_assert_eq!(
            layer.settings().get(Setting::AngleDown),
            Some(fov_core::radians_to_millidegrees(f64::from(first_down)))
        );
    }

    #[test]
    fn prop_neutral_layer_is_transparent(up in 0.1f32..1.2, down in -1.2f32..-0.1, height in 1u32..8_192) {
        let mut layer = layer_with(MemorySettings::new());
        create_instance(&mut layer);
        layer.next_mut().fov = [eye_fov(up, down), eye_fov(up, down)];
        layer.next_mut().rect = (1_000, height);

        let (_, _, views) = locate(&mut layer, ViewConfigurationType::PRIMARY_STEREO, 2);
        prop_assert_eq!(views[0].fov, eye_fov(up, down));
        let (_, _, configs) = enumerate(&mut layer, ViewConfigurationType::PRIMARY_STEREO, 2);
        prop_assert_eq!(configs[1].recommended_image_rect_height, height);
    }
}
