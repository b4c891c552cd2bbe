//! # Core Engine Module
//!
//! Shared configuration types used by the window, device and pipeline
//! subsystems.

pub mod config;

// Re-export commonly used config types
pub use config::{
    ApplicationConfig,
    WindowConfig,
    ShaderConfig,
    RendererConfig,
    Config,
    ConfigError,
};
