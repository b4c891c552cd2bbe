//! Window management using GLFW
//!
//! [`WindowSystem`] owns the process-wide GLFW library state and is created
//! once by the composition root. [`Window`] only owns its native window and
//! its event receiver, so any number of windows can be opened without
//! re-initializing or tearing down the library.

use ash::vk;
use thiserror::Error;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// GLFW could not be initialized
    #[error("GLFW initialization failed: {0}")]
    InitializationFailed(String),

    /// GLFW is running but cannot find a Vulkan loader
    #[error("Vulkan is not supported by the windowing system")]
    MissingVulkanSupport,

    /// The windowing system could not allocate a window
    #[error("failed to create {width}x{height} window \"{title}\"")]
    CreationFailed {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Requested title
        title: String,
    },

    /// The backend rejected surface creation for this window
    #[error("failed to create window surface: {0:?}")]
    SurfaceCreationFailed(vk::Result),
}

/// Result type for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// Process-wide GLFW lifecycle
///
/// Initializing creates the library state; it is terminated once this value
/// and every window created from it have been dropped.
pub struct WindowSystem {
    glfw: glfw::Glfw,
}

impl WindowSystem {
    /// Initialize GLFW, routing its errors to the logger
    pub fn init() -> WindowResult<Self> {
        let glfw = glfw::init(glfw::log_errors)
            .map_err(|e| WindowError::InitializationFailed(format!("{e:?}")))?;

        log::debug!("GLFW initialized");
        Ok(Self { glfw })
    }

    /// Vulkan instance extensions GLFW needs to create surfaces
    pub fn required_instance_extensions(&self) -> WindowResult<Vec<String>> {
        if !self.glfw.vulkan_supported() {
            return Err(WindowError::MissingVulkanSupport);
        }
        self.glfw
            .get_required_instance_extensions()
            .ok_or(WindowError::MissingVulkanSupport)
    }

    /// Process pending window system events without blocking
    pub fn poll_events(&mut self) {
        self.glfw.poll_events();
    }
}

/// GLFW window configured for Vulkan rendering
pub struct Window {
    window: glfw::PWindow,
    #[allow(dead_code)] // Keeps the event channel alive for the window's lifetime
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
    width: u32,
    height: u32,
    title: String,
}

impl Window {
    /// Open a fixed-size window with no client rendering API
    pub fn new(system: &mut WindowSystem, width: u32, height: u32, title: &str) -> WindowResult<Self> {
        // Configure for Vulkan (no OpenGL context)
        system.glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));
        system.glfw.window_hint(glfw::WindowHint::Resizable(false));

        let (window, events) = system
            .glfw
            .create_window(width, height, title, glfw::WindowMode::Windowed)
            .ok_or_else(|| WindowError::CreationFailed {
                width,
                height,
                title: title.to_string(),
            })?;

        log::info!("Created {}x{} window \"{}\"", width, height, title);

        Ok(Self {
            window,
            events,
            width,
            height,
            title: title.to_string(),
        })
    }

    /// Whether the user has requested the window to close
    pub fn should_close(&self) -> bool {
        self.window.should_close()
    }

    /// Size the window was created with
    pub fn extent(&self) -> vk::Extent2D {
        vk::Extent2D {
            width: self.width,
            height: self.height,
        }
    }

    /// Window title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Create a Vulkan surface for this window
    ///
    /// The caller owns the returned surface and must destroy it before the
    /// instance.
    pub fn create_surface(&self, instance: vk::Instance) -> WindowResult<vk::SurfaceKHR> {
        let mut surface = vk::SurfaceKHR::null();
        let result = self.window.create_window_surface(instance, std::ptr::null(), &mut surface);

        if result == vk::Result::SUCCESS {
            log::debug!("Created window surface {:?}", surface);
            Ok(surface)
        } else {
            Err(WindowError::SurfaceCreationFailed(result))
        }
    }
}
