//! Vulkan rendering backend
//!
//! Low-level Vulkan wrappers. Every type owns the handles it creates and
//! releases them on drop.

pub mod context;
pub mod render_pass;

pub use context::{Device, LogicalDevice, PhysicalDeviceInfo, VulkanError, VulkanInstance, VulkanResult};
pub use render_pass::{PipelineLayout, RenderPass};
