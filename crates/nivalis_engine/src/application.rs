//! Application composition root
//!
//! [`Instance`] brings up every subsystem in order and owns the results.
//! Fields are declared in reverse construction order so that dropping an
//! `Instance` tears everything down dependents first.

use thiserror::Error;

use crate::config::ConfigError;
use crate::core::config::ApplicationConfig;
use crate::render::pipeline::{default_pipeline_config, Pipeline, PipelineError};
use crate::render::vulkan::{Device, PipelineLayout, RenderPass, VulkanError};
use crate::render::window::{Window, WindowError, WindowSystem};

/// Top-level application errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration was rejected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Window system or window failure
    #[error(transparent)]
    Window(#[from] WindowError),

    /// Vulkan bring-up failure
    #[error(transparent)]
    Vulkan(#[from] VulkanError),

    /// Pipeline construction failure
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// The running application
pub struct Instance {
    pipeline: Pipeline,
    layout: PipelineLayout,
    render_pass: RenderPass,
    device: Device,
    window: Window,
    // Terminates GLFW, so it must outlive the window
    _window_system: WindowSystem,
    config: ApplicationConfig,
}

impl Instance {
    /// Open the window, bring up the device and build the pipeline
    pub fn new(config: ApplicationConfig) -> Result<Self, AppError> {
        config.validate()?;

        let mut window_system = WindowSystem::init()?;
        let window = Window::new(
            &mut window_system,
            config.window.width,
            config.window.height,
            &config.window.title,
        )?;

        let device = Device::new(&window_system, &window, &config.renderer)?;

        let surface_format = device.surface_format()?;
        let render_pass = RenderPass::new_color_pass(device.device().clone(), surface_format.format)?;
        let layout = PipelineLayout::empty(device.device().clone())?;

        let pipeline_config = default_pipeline_config(config.window.width, config.window.height)
            .with_layout(layout.handle())
            .with_render_pass(render_pass.handle(), 0);

        let pipeline = Pipeline::new(
            device.device().clone(),
            &config.shaders.vertex_shader_path,
            &config.shaders.fragment_shader_path,
            &pipeline_config,
        )?;

        Ok(Self {
            pipeline,
            layout,
            render_pass,
            device,
            window,
            _window_system: window_system,
            config,
        })
    }

    /// Run the application
    ///
    /// Nothing is drawn yet; this returns as soon as it is called.
    pub fn init(&mut self) -> Result<(), AppError> {
        log::info!(
            "{} initialised ({}x{}), no frame loop configured",
            self.config.renderer.application_name,
            self.config.window.width,
            self.config.window.height
        );
        Ok(())
    }

    /// The application window
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// The graphics device
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// The graphics pipeline
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// The pipeline layout the pipeline was built against
    pub fn pipeline_layout(&self) -> &PipelineLayout {
        &self.layout
    }

    /// The render pass the pipeline was built for
    pub fn render_pass(&self) -> &RenderPass {
        &self.render_pass
    }

    /// Configuration the application was started with
    pub fn config(&self) -> &ApplicationConfig {
        &self.config
    }
}
