//! Pipeline construction tests against a mock device
//!
//! The mock hands out fake handles and records every create and destroy
//! call, so these tests run without a GPU.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use ash::vk;
use ash::vk::Handle;
use tempfile::TempDir;

use super::device::PipelineDevice;
use super::graphics_pipeline::{Pipeline, PipelineError};
use super::pipeline_config::{default_pipeline_config, PipelineConfig};

const SPIRV_MAGIC: u32 = 0x0723_0203;

// ============================================================================
// Mock Device
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    CreateModule(u64),
    RejectModule,
    DestroyModule(u64),
    CreatePipeline(u64),
    DestroyPipeline(u64),
}

/// Fields copied out of the create info while its pointers are valid
#[derive(Debug, Clone, Copy)]
struct RecordedPipeline {
    stage_count: u32,
    stages: [vk::ShaderStageFlags; 2],
    vertex_binding_count: u32,
    vertex_attribute_count: u32,
    topology: vk::PrimitiveTopology,
    viewport_count: u32,
    scissor_count: u32,
    viewport_width: f32,
    viewport_height: f32,
    polygon_mode: vk::PolygonMode,
    color_attachment_count: u32,
    has_multisample: bool,
    has_depth_stencil: bool,
    has_dynamic_state: bool,
    layout: vk::PipelineLayout,
    render_pass: vk::RenderPass,
    subpass: u32,
    base_pipeline_index: i32,
    base_pipeline_handle: vk::Pipeline,
}

#[derive(Default)]
struct MockState {
    next_handle: u64,
    calls: Vec<Call>,
    fail_pipeline: bool,
    /// Reject the n-th shader module creation, counting from 1
    reject_module: Option<usize>,
    module_attempts: usize,
    recorded: Option<RecordedPipeline>,
}

impl MockState {
    fn allocate(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

#[derive(Clone, Default)]
struct MockDevice {
    state: Rc<RefCell<MockState>>,
}

impl MockDevice {
    fn rejecting_module(attempt: usize) -> Self {
        let device = Self::default();
        device.state.borrow_mut().reject_module = Some(attempt);
        device
    }

    fn failing_pipeline() -> Self {
        let device = Self::default();
        device.state.borrow_mut().fail_pipeline = true;
        device
    }

    fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    fn create_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::CreateModule(_) | Call::CreatePipeline(_)))
            .count()
    }

    fn live_modules(&self) -> i64 {
        self.calls()
            .iter()
            .map(|call| match call {
                Call::CreateModule(_) => 1,
                Call::DestroyModule(_) => -1,
                _ => 0,
            })
            .sum()
    }

    fn live_pipelines(&self) -> i64 {
        self.calls()
            .iter()
            .map(|call| match call {
                Call::CreatePipeline(_) => 1,
                Call::DestroyPipeline(_) => -1,
                _ => 0,
            })
            .sum()
    }

    fn recorded(&self) -> Option<RecordedPipeline> {
        self.state.borrow().recorded
    }
}

impl PipelineDevice for MockDevice {
    fn create_shader_module(&self, code: &[u32]) -> Result<vk::ShaderModule, vk::Result> {
        assert_eq!(code.first(), Some(&SPIRV_MAGIC), "device received non-SPIR-V code");

        let mut state = self.state.borrow_mut();
        state.module_attempts += 1;
        if state.reject_module == Some(state.module_attempts) {
            state.calls.push(Call::RejectModule);
            return Err(vk::Result::ERROR_INVALID_SHADER_NV);
        }
        let raw = state.allocate();
        state.calls.push(Call::CreateModule(raw));
        Ok(vk::ShaderModule::from_raw(raw))
    }

    fn destroy_shader_module(&self, module: vk::ShaderModule) {
        self.state
            .borrow_mut()
            .calls
            .push(Call::DestroyModule(module.as_raw()));
    }

    fn create_graphics_pipeline(
        &self,
        create_info: &vk::GraphicsPipelineCreateInfo,
    ) -> Result<vk::Pipeline, vk::Result> {
        let recorded = unsafe { record(create_info) };
        let mut state = self.state.borrow_mut();
        state.recorded = Some(recorded);

        if state.fail_pipeline {
            return Err(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY);
        }
        let raw = state.allocate();
        state.calls.push(Call::CreatePipeline(raw));
        Ok(vk::Pipeline::from_raw(raw))
    }

    fn destroy_pipeline(&self, pipeline: vk::Pipeline) {
        self.state
            .borrow_mut()
            .calls
            .push(Call::DestroyPipeline(pipeline.as_raw()));
    }
}

unsafe fn record(info: &vk::GraphicsPipelineCreateInfo) -> RecordedPipeline {
    let stages = std::slice::from_raw_parts(info.p_stages, info.stage_count as usize);
    let vertex_input = &*info.p_vertex_input_state;
    let input_assembly = &*info.p_input_assembly_state;
    let viewport_state = &*info.p_viewport_state;
    let viewport = &*viewport_state.p_viewports;
    let rasterization = &*info.p_rasterization_state;
    let color_blend = &*info.p_color_blend_state;

    RecordedPipeline {
        stage_count: info.stage_count,
        stages: [stages[0].stage, stages[1].stage],
        vertex_binding_count: vertex_input.vertex_binding_description_count,
        vertex_attribute_count: vertex_input.vertex_attribute_description_count,
        topology: input_assembly.topology,
        viewport_count: viewport_state.viewport_count,
        scissor_count: viewport_state.scissor_count,
        viewport_width: viewport.width,
        viewport_height: viewport.height,
        polygon_mode: rasterization.polygon_mode,
        color_attachment_count: color_blend.attachment_count,
        has_multisample: !info.p_multisample_state.is_null(),
        has_depth_stencil: !info.p_depth_stencil_state.is_null(),
        has_dynamic_state: !info.p_dynamic_state.is_null(),
        layout: info.layout,
        render_pass: info.render_pass,
        subpass: info.subpass,
        base_pipeline_index: info.base_pipeline_index,
        base_pipeline_handle: info.base_pipeline_handle,
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn spirv_bytes(first_word: u32) -> Vec<u8> {
    [first_word, 0x0001_0000, 0, 1, 0]
        .iter()
        .flat_map(|word| word.to_ne_bytes())
        .collect()
}

struct ShaderFiles {
    dir: TempDir,
}

impl ShaderFiles {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn write(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    fn valid_pair(&self) -> (PathBuf, PathBuf) {
        (
            self.write("shader.vert.spv", &spirv_bytes(SPIRV_MAGIC)),
            self.write("shader.frag.spv", &spirv_bytes(SPIRV_MAGIC)),
        )
    }

    fn missing(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn complete_config() -> PipelineConfig {
    default_pipeline_config(800, 600)
        .with_layout(vk::PipelineLayout::from_raw(0x100))
        .with_render_pass(vk::RenderPass::from_raw(0x200), 0)
}

fn assert_shader_load(err: PipelineError, expected: &Path) {
    match err {
        PipelineError::ShaderLoad { path, source } => {
            assert_eq!(path, expected);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected ShaderLoad, got {other:?}"),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_missing_vertex_shader() {
    let files = ShaderFiles::new();
    let (_, frag) = files.valid_pair();
    let vert = files.missing("nonexistent.vert.spv");
    let device = MockDevice::default();

    let err = Pipeline::new(device.clone(), &vert, &frag, &complete_config())
        .err()
        .unwrap();

    assert_shader_load(err, &vert);
    assert!(device.calls().is_empty());
}

#[test]
fn test_missing_fragment_shader() {
    let files = ShaderFiles::new();
    let (vert, _) = files.valid_pair();
    let frag = files.missing("nonexistent.frag.spv");
    let device = MockDevice::default();

    let err = Pipeline::new(device.clone(), &vert, &frag, &complete_config())
        .err()
        .unwrap();

    assert_shader_load(err, &frag);
    assert!(device.calls().is_empty());
}

#[test]
fn test_malformed_vertex_shader() {
    let files = ShaderFiles::new();
    let (_, frag) = files.valid_pair();
    let vert = files.write("garbage.vert.spv", &spirv_bytes(0xDEAD_BEEF));
    let device = MockDevice::default();

    let err = Pipeline::new(device.clone(), &vert, &frag, &complete_config())
        .err()
        .unwrap();

    assert!(
        matches!(&err, PipelineError::InvalidShader { path, .. } if path == &vert),
        "unexpected error: {err:?}"
    );
    assert!(device.calls().is_empty());
}

#[test]
fn test_truncated_shader_never_reaches_device() {
    let files = ShaderFiles::new();
    let (_, frag) = files.valid_pair();
    let mut bytes = spirv_bytes(SPIRV_MAGIC);
    bytes.truncate(bytes.len() - 1);
    let vert = files.write("truncated.vert.spv", &bytes);
    let device = MockDevice::default();

    let err = Pipeline::new(device.clone(), &vert, &frag, &complete_config())
        .err()
        .unwrap();

    assert!(matches!(err, PipelineError::InvalidShader { .. }));
    assert_eq!(device.create_calls(), 0);
}

#[test]
fn test_empty_shader_rejected() {
    let files = ShaderFiles::new();
    let (vert, _) = files.valid_pair();
    let frag = files.write("empty.frag.spv", &[]);
    let device = MockDevice::default();

    let err = Pipeline::new(device.clone(), &vert, &frag, &complete_config())
        .err()
        .unwrap();

    assert!(matches!(err, PipelineError::InvalidShader { .. }));
    assert_eq!(device.live_modules(), 0);
}

#[test]
fn test_invalid_fragment_releases_vertex_module() {
    let files = ShaderFiles::new();
    let (vert, _) = files.valid_pair();
    let frag = files.write("garbage.frag.spv", &spirv_bytes(0));
    let device = MockDevice::default();

    let err = Pipeline::new(device.clone(), &vert, &frag, &complete_config())
        .err()
        .unwrap();

    assert!(matches!(&err, PipelineError::InvalidShader { path, .. } if path == &frag));
    assert_eq!(
        device.calls(),
        vec![Call::CreateModule(1), Call::DestroyModule(1)]
    );
}

#[test]
fn test_device_rejects_vertex_module() {
    let files = ShaderFiles::new();
    let (vert, frag) = files.valid_pair();
    let device = MockDevice::rejecting_module(1);

    let err = Pipeline::new(device.clone(), &vert, &frag, &complete_config())
        .err()
        .unwrap();

    assert!(
        matches!(
            &err,
            PipelineError::ShaderCompile { path, result: vk::Result::ERROR_INVALID_SHADER_NV }
                if path == &vert
        ),
        "unexpected error: {err:?}"
    );
    assert_eq!(device.calls(), vec![Call::RejectModule]);
}

#[test]
fn test_device_rejects_fragment_module_releases_vertex() {
    let files = ShaderFiles::new();
    let (vert, frag) = files.valid_pair();
    let device = MockDevice::rejecting_module(2);

    let err = Pipeline::new(device.clone(), &vert, &frag, &complete_config())
        .err()
        .unwrap();

    assert!(matches!(
        &err,
        PipelineError::ShaderCompile { path, result: vk::Result::ERROR_INVALID_SHADER_NV }
            if path == &frag
    ));
    assert_eq!(
        device.calls(),
        vec![Call::CreateModule(1), Call::RejectModule, Call::DestroyModule(1)]
    );
    assert_eq!(device.live_modules(), 0);
}

#[test]
fn test_pipeline_failure_releases_both_modules() {
    let files = ShaderFiles::new();
    let (vert, frag) = files.valid_pair();
    let device = MockDevice::failing_pipeline();

    let err = Pipeline::new(device.clone(), &vert, &frag, &complete_config())
        .err()
        .unwrap();

    assert!(matches!(
        err,
        PipelineError::PipelineCreation(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY)
    ));
    assert_eq!(device.live_modules(), 0);
    assert_eq!(device.live_pipelines(), 0);
    assert_eq!(device.calls().len(), 4);
}

#[test]
fn test_successful_pipeline_lifecycle() {
    let files = ShaderFiles::new();
    let (vert, frag) = files.valid_pair();
    let device = MockDevice::default();

    let pipeline = Pipeline::new(device.clone(), &vert, &frag, &complete_config()).unwrap();

    assert_ne!(pipeline.handle(), vk::Pipeline::null());
    assert_ne!(pipeline.vertex_module(), vk::ShaderModule::null());
    assert_ne!(pipeline.fragment_module(), vk::ShaderModule::null());
    assert_ne!(pipeline.vertex_module(), pipeline.fragment_module());
    assert_eq!(device.live_modules(), 2);
    assert_eq!(device.live_pipelines(), 1);

    let pipeline_raw = pipeline.handle().as_raw();
    let vert_raw = pipeline.vertex_module().as_raw();
    let frag_raw = pipeline.fragment_module().as_raw();
    drop(pipeline);

    assert_eq!(device.live_modules(), 0);
    assert_eq!(device.live_pipelines(), 0);
    assert_eq!(
        device.calls()[3..],
        [
            Call::DestroyPipeline(pipeline_raw),
            Call::DestroyModule(frag_raw),
            Call::DestroyModule(vert_raw),
        ]
    );
}

#[test]
fn test_pipeline_description() {
    let files = ShaderFiles::new();
    let (vert, frag) = files.valid_pair();
    let device = MockDevice::default();
    let config = complete_config();

    let _pipeline = Pipeline::new(device.clone(), &vert, &frag, &config).unwrap();
    let recorded = device.recorded().unwrap();

    assert_eq!(recorded.stage_count, 2);
    assert_eq!(
        recorded.stages,
        [vk::ShaderStageFlags::VERTEX, vk::ShaderStageFlags::FRAGMENT]
    );
    assert_eq!(recorded.vertex_binding_count, 0);
    assert_eq!(recorded.vertex_attribute_count, 0);
    assert_eq!(recorded.topology, vk::PrimitiveTopology::TRIANGLE_LIST);
    assert_eq!(recorded.viewport_count, 1);
    assert_eq!(recorded.scissor_count, 1);
    assert_eq!(recorded.viewport_width, 800.0);
    assert_eq!(recorded.viewport_height, 600.0);
    assert_eq!(recorded.polygon_mode, vk::PolygonMode::FILL);
    assert_eq!(recorded.color_attachment_count, 1);
    assert!(!recorded.has_multisample);
    assert!(!recorded.has_depth_stencil);
    assert!(!recorded.has_dynamic_state);
    assert_eq!(recorded.layout, vk::PipelineLayout::from_raw(0x100));
    assert_eq!(recorded.render_pass, vk::RenderPass::from_raw(0x200));
    assert_eq!(recorded.subpass, 0);
    assert_eq!(recorded.base_pipeline_index, -1);
    assert_eq!(recorded.base_pipeline_handle, vk::Pipeline::null());
}

#[test]
fn test_incomplete_config_rejected_before_io() {
    let files = ShaderFiles::new();
    let vert = files.missing("never.vert.spv");
    let frag = files.missing("never.frag.spv");
    let device = MockDevice::default();

    let no_layout = default_pipeline_config(800, 600)
        .with_render_pass(vk::RenderPass::from_raw(0x200), 0);
    let err = Pipeline::new(device.clone(), &vert, &frag, &no_layout)
        .err()
        .unwrap();
    assert!(matches!(err, PipelineError::IncompleteConfig("pipeline layout")));

    let no_render_pass =
        default_pipeline_config(800, 600).with_layout(vk::PipelineLayout::from_raw(0x100));
    let err = Pipeline::new(device.clone(), &vert, &frag, &no_render_pass)
        .err()
        .unwrap();
    assert!(matches!(err, PipelineError::IncompleteConfig("render pass")));

    assert!(device.calls().is_empty());
}

#[test]
fn test_error_messages_name_the_shader() {
    let files = ShaderFiles::new();
    let (_, frag) = files.valid_pair();
    let vert = files.missing("nonexistent.vert.spv");

    let err = Pipeline::new(MockDevice::default(), &vert, &frag, &complete_config())
        .err()
        .unwrap();

    let message = err.to_string();
    assert!(message.starts_with("failed to open shader"));
    assert!(message.contains("nonexistent.vert.spv"));
}
