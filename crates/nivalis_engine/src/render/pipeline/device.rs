//! Device operations used by pipeline construction
//!
//! [`PipelineDevice`] is the only surface of the graphics device the
//! pipeline touches. `ash::Device` implements it directly; tests supply a
//! mock that tracks which handles are alive.

use ash::vk;

/// Native calls needed to create and destroy a pipeline and its shaders
pub trait PipelineDevice {
    /// Create a shader module from SPIR-V words
    fn create_shader_module(&self, code: &[u32]) -> Result<vk::ShaderModule, vk::Result>;

    /// Destroy a shader module created by this device
    fn destroy_shader_module(&self, module: vk::ShaderModule);

    /// Create one graphics pipeline without a pipeline cache
    ///
    /// Pointers inside `create_info` are only valid for the duration of the
    /// call.
    fn create_graphics_pipeline(
        &self,
        create_info: &vk::GraphicsPipelineCreateInfo,
    ) -> Result<vk::Pipeline, vk::Result>;

    /// Destroy a pipeline created by this device
    fn destroy_pipeline(&self, pipeline: vk::Pipeline);
}

impl PipelineDevice for ash::Device {
    fn create_shader_module(&self, code: &[u32]) -> Result<vk::ShaderModule, vk::Result> {
        let create_info = vk::ShaderModuleCreateInfo::builder().code(code);
        unsafe { ash::Device::create_shader_module(self, &create_info, None) }
    }

    fn destroy_shader_module(&self, module: vk::ShaderModule) {
        unsafe { ash::Device::destroy_shader_module(self, module, None) }
    }

    fn create_graphics_pipeline(
        &self,
        create_info: &vk::GraphicsPipelineCreateInfo,
    ) -> Result<vk::Pipeline, vk::Result> {
        let pipelines = unsafe {
            self.create_graphics_pipelines(
                vk::PipelineCache::null(),
                std::slice::from_ref(create_info),
                None,
            )
            .map_err(|(_, err)| err)?
        };
        pipelines.into_iter().next().ok_or(vk::Result::ERROR_UNKNOWN)
    }

    fn destroy_pipeline(&self, pipeline: vk::Pipeline) {
        unsafe { ash::Device::destroy_pipeline(self, pipeline, None) }
    }
}
