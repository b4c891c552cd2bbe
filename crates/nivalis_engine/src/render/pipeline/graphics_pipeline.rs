//! Graphics pipeline construction
//!
//! A [`Pipeline`] owns its two shader modules and the pipeline object. They
//! are created together and destroyed together; if any step fails the
//! handles created so far are released before the error is returned.

use ash::vk;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::device::PipelineDevice;
use super::pipeline_config::PipelineConfig;
use super::shader::{read_shader_file, spirv_words, ENTRY_POINT};

/// Pipeline construction errors
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The config is missing an externally owned handle
    #[error("pipeline config is incomplete: {0} was never supplied")]
    IncompleteConfig(&'static str),

    /// A shader binary could not be read
    #[error("failed to open shader: {}", path.display())]
    ShaderLoad {
        /// Shader file that failed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// A shader binary is not SPIR-V and was never handed to the device
    #[error("invalid SPIR-V in {}", path.display())]
    InvalidShader {
        /// Shader file that failed
        path: PathBuf,
        /// What the SPIR-V reader rejected
        #[source]
        source: std::io::Error,
    },

    /// The device rejected a shader module
    #[error("failed to create shader module from {}: {result:?}", path.display())]
    ShaderCompile {
        /// Shader file that failed
        path: PathBuf,
        /// Result code returned by the device
        result: vk::Result,
    },

    /// The device rejected the pipeline description
    #[error("failed to create graphics pipeline: {0:?}")]
    PipelineCreation(vk::Result),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Shader module destroyed on drop unless released
struct ModuleGuard<'a, D: PipelineDevice> {
    device: &'a D,
    module: vk::ShaderModule,
}

impl<'a, D: PipelineDevice> ModuleGuard<'a, D> {
    fn create(device: &'a D, path: &Path, bytes: &[u8]) -> PipelineResult<Self> {
        let code = spirv_words(bytes).map_err(|source| PipelineError::InvalidShader {
            path: path.to_path_buf(),
            source,
        })?;
        let module = device
            .create_shader_module(&code)
            .map_err(|result| PipelineError::ShaderCompile {
                path: path.to_path_buf(),
                result,
            })?;

        log::debug!("Created shader module {:?} from {}", module, path.display());
        Ok(Self { device, module })
    }

    fn release(mut self) -> vk::ShaderModule {
        std::mem::replace(&mut self.module, vk::ShaderModule::null())
    }
}

impl<D: PipelineDevice> Drop for ModuleGuard<'_, D> {
    fn drop(&mut self) {
        if self.module != vk::ShaderModule::null() {
            self.device.destroy_shader_module(self.module);
        }
    }
}

/// Graphics pipeline with RAII cleanup
pub struct Pipeline<D: PipelineDevice = ash::Device> {
    device: D,
    pipeline: vk::Pipeline,
    vert_module: vk::ShaderModule,
    frag_module: vk::ShaderModule,
}

impl<D: PipelineDevice> Pipeline<D> {
    /// Build the pipeline from two SPIR-V files and a complete config
    ///
    /// Only input assembly, viewport, rasterization and colour blend state
    /// are taken from `config`; its multisample and depth-stencil states are
    /// not attached to the pipeline.
    pub fn new(
        device: D,
        vert_path: impl AsRef<Path>,
        frag_path: impl AsRef<Path>,
        config: &PipelineConfig,
    ) -> PipelineResult<Self> {
        let vert_path = vert_path.as_ref();
        let frag_path = frag_path.as_ref();

        let layout = config
            .pipeline_layout
            .ok_or(PipelineError::IncompleteConfig("pipeline layout"))?;
        let render_pass = config
            .render_pass
            .ok_or(PipelineError::IncompleteConfig("render pass"))?;

        let vert_code = load(vert_path)?;
        let frag_code = load(frag_path)?;

        let vert_module = ModuleGuard::create(&device, vert_path, &vert_code)?;
        let frag_module = ModuleGuard::create(&device, frag_path, &frag_code)?;

        let shader_stages = [
            vk::PipelineShaderStageCreateInfo::builder()
                .stage(vk::ShaderStageFlags::VERTEX)
                .module(vert_module.module)
                .name(ENTRY_POINT)
                .build(),
            vk::PipelineShaderStageCreateInfo::builder()
                .stage(vk::ShaderStageFlags::FRAGMENT)
                .module(frag_module.module)
                .name(ENTRY_POINT)
                .build(),
        ];

        // Geometry comes from the vertex shader, no vertex buffers are bound
        let vertex_input_info = vk::PipelineVertexInputStateCreateInfo::builder();

        let input_assembly_info = config.input_assembly_info.to_vk();

        let viewports = [config.viewport];
        let scissors = [config.scissor];
        let viewport_info = vk::PipelineViewportStateCreateInfo::builder()
            .viewports(&viewports)
            .scissors(&scissors);

        let rasterization_info = config.rasterization_info.to_vk();

        let color_blend_attachments = [config.color_blend_attachment.to_vk()];
        let color_blend_info = config.color_blend_info.to_vk(&color_blend_attachments);

        let pipeline_info = vk::GraphicsPipelineCreateInfo::builder()
            .stages(&shader_stages)
            .vertex_input_state(&vertex_input_info)
            .input_assembly_state(&input_assembly_info)
            .viewport_state(&viewport_info)
            .rasterization_state(&rasterization_info)
            .color_blend_state(&color_blend_info)
            .layout(layout)
            .render_pass(render_pass)
            .subpass(config.subpass)
            .base_pipeline_index(-1)
            .base_pipeline_handle(vk::Pipeline::null());

        let pipeline = device
            .create_graphics_pipeline(&pipeline_info)
            .map_err(PipelineError::PipelineCreation)?;

        log::info!(
            "Created graphics pipeline {:?} ({} + {})",
            pipeline,
            vert_path.display(),
            frag_path.display()
        );

        let vert_module = vert_module.release();
        let frag_module = frag_module.release();

        Ok(Self {
            device,
            pipeline,
            vert_module,
            frag_module,
        })
    }

    /// Get pipeline handle
    pub fn handle(&self) -> vk::Pipeline {
        self.pipeline
    }

    /// Get vertex shader module handle
    pub fn vertex_module(&self) -> vk::ShaderModule {
        self.vert_module
    }

    /// Get fragment shader module handle
    pub fn fragment_module(&self) -> vk::ShaderModule {
        self.frag_module
    }
}

impl<D: PipelineDevice> Drop for Pipeline<D> {
    fn drop(&mut self) {
        log::debug!("Destroying graphics pipeline {:?}", self.pipeline);
        self.device.destroy_pipeline(self.pipeline);
        self.device.destroy_shader_module(self.frag_module);
        self.device.destroy_shader_module(self.vert_module);
    }
}

fn load(path: &Path) -> PipelineResult<Vec<u8>> {
    read_shader_file(path).map_err(|source| PipelineError::ShaderLoad {
        path: path.to_path_buf(),
        source,
    })
}
