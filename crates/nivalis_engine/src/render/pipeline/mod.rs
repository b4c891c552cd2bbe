//! Graphics pipeline
//!
//! - **`pipeline_config`**: fixed-function state and its defaults
//! - **`shader`**: SPIR-V loading
//! - **`device`**: the device calls a pipeline needs
//! - **`graphics_pipeline`**: atomic pipeline construction

pub mod device;
pub mod pipeline_config;
pub mod shader;

mod graphics_pipeline;

#[cfg(test)]
mod pipeline_tests;

pub use device::PipelineDevice;
pub use graphics_pipeline::{Pipeline, PipelineError, PipelineResult};
pub use pipeline_config::{
    default_pipeline_config, ColorBlendAttachment, ColorBlendState, DepthStencilState,
    InputAssemblyState, MultisampleState, PipelineConfig, RasterizationState, StencilFaceState,
};
