//! # Unified Configuration System
//!
//! Configuration for the window, the Vulkan renderer and the shader pair the
//! single pipeline is built from.
//!
//! The defaults are fixed at compile time ([`WIDTH`], [`HEIGHT`],
//! [`WINDOW_TITLE`], [`VERTEX_SHADER_PATH`], [`FRAGMENT_SHADER_PATH`]) and
//! the application binary always runs with them. The types are still
//! serializable so embedders can keep their own settings in TOML or RON.

use serde::{Serialize, Deserialize};

// Re-export from the config module for convenience
pub use crate::config::{Config, ConfigError};

/// Output width in pixels
pub const WIDTH: u32 = 800;
/// Output height in pixels
pub const HEIGHT: u32 = 600;
/// Window title, also used as the Vulkan application name
pub const WINDOW_TITLE: &str = "nivalis";
/// Compiled vertex shader, relative to the working directory
pub const VERTEX_SHADER_PATH: &str = "shaders/shader.vert.spv";
/// Compiled fragment shader, relative to the working directory
pub const FRAGMENT_SHADER_PATH: &str = "shaders/shader.frag.spv";

/// # Window Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Client area width in pixels
    pub width: u32,
    /// Client area height in pixels
    pub height: u32,
}

impl WindowConfig {
    /// Create a new window configuration
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "Window dimensions must be non-zero, got {}x{}",
                self.width, self.height
            ));
        }
        if self.title.is_empty() {
            return Err("Window title cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new(WINDOW_TITLE, WIDTH, HEIGHT)
    }
}

/// # Shader Configuration
///
/// Paths of the two SPIR-V binaries the pipeline is built from. Existence
/// is not checked here; a missing file is reported when the pipeline reads
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    /// Path to the vertex shader SPIR-V file
    pub vertex_shader_path: String,
    /// Path to the fragment shader SPIR-V file
    pub fragment_shader_path: String,
}

impl ShaderConfig {
    /// Create a new shader configuration
    pub fn new(vertex_path: impl Into<String>, fragment_path: impl Into<String>) -> Self {
        Self {
            vertex_shader_path: vertex_path.into(),
            fragment_shader_path: fragment_path.into(),
        }
    }

    /// Validate that both paths are set
    pub fn validate(&self) -> Result<(), String> {
        if self.vertex_shader_path.is_empty() {
            return Err("Vertex shader path cannot be empty".to_string());
        }
        if self.fragment_shader_path.is_empty() {
            return Err("Fragment shader path cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self::new(VERTEX_SHADER_PATH, FRAGMENT_SHADER_PATH)
    }
}

/// # Vulkan Renderer Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Application name for Vulkan instance creation
    pub application_name: String,
    /// Application version (major, minor, patch)
    pub application_version: (u32, u32, u32),
    /// Whether to enable Vulkan validation layers, `None` follows the build type
    pub enable_validation: Option<bool>,
}

impl RendererConfig {
    /// Create a new renderer configuration
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            application_name: app_name.into(),
            application_version: (0, 1, 0),
            enable_validation: None,
        }
    }

    /// Enable or disable validation layers
    #[must_use]
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.enable_validation = Some(enabled);
        self
    }

    /// Whether validation should be enabled for this build
    ///
    /// Validation is only ever available in debug builds.
    pub fn validation_enabled(&self) -> bool {
        cfg!(debug_assertions) && self.enable_validation.unwrap_or(true)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.application_name.is_empty() {
            return Err("Application name cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self::new(WINDOW_TITLE)
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration consumed by [`crate::Instance::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Window configuration
    pub window: WindowConfig,
    /// Shader binaries for the pipeline
    pub shaders: ShaderConfig,
    /// Vulkan renderer configuration
    pub renderer: RendererConfig,
    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.window.validate().map_err(ConfigError::Invalid)?;
        self.shaders.validate().map_err(ConfigError::Invalid)?;
        self.renderer.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            shaders: ShaderConfig::default(),
            renderer: RendererConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Config for ApplicationConfig {}
