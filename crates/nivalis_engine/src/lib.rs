//! # Nivalis Engine
//!
//! Window, device and pipeline bring-up for a Vulkan application.
//!
//! The crate covers the linear start-up sequence of a renderer: open a
//! GLFW window, create a Vulkan device that can present to it, and build a
//! single graphics pipeline from two SPIR-V shader binaries. There is no
//! frame loop yet; [`Instance::init`] is the extension point for one.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nivalis_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApplicationConfig::default();
//!     nivalis_engine::foundation::logging::init(&config.log_level);
//!
//!     let mut app = Instance::new(config)?;
//!     app.init()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod config;
pub mod foundation;
pub mod render;

mod application;

pub use application::{AppError, Instance};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        AppError, Instance,
        core::config::{ApplicationConfig, RendererConfig, ShaderConfig, WindowConfig},
        render::{
            pipeline::{default_pipeline_config, Pipeline, PipelineConfig, PipelineDevice, PipelineError},
            vulkan::{Device, VulkanError},
            window::{Window, WindowError, WindowSystem},
        },
    };
}
