//! Rendering subsystem
//!
//! - **`window`**: GLFW window and library lifecycle
//! - **`vulkan`**: instance, device and render pass bring-up
//! - **`pipeline`**: pipeline configuration and construction

pub mod pipeline;
pub mod vulkan;
pub mod window;

pub use pipeline::{default_pipeline_config, Pipeline, PipelineConfig};
pub use vulkan::Device;
pub use window::{Window, WindowSystem};
