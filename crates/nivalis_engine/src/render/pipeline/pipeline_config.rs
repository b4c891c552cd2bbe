//! Pipeline configuration and fixed-function defaults
//!
//! [`PipelineConfig`] describes every fixed-function stage of the graphics
//! pipeline as plain values. Vulkan create-info structs are only assembled
//! while the pipeline is being built, so a config can be cloned, compared and
//! kept around without dangling pointers.
//!
//! The pipeline layout and render pass are owned elsewhere and are never
//! defaulted: [`default_pipeline_config`] leaves them unset and the caller
//! completes the config with [`PipelineConfig::with_layout`] and
//! [`PipelineConfig::with_render_pass`] before handing it to
//! [`crate::render::pipeline::Pipeline::new`].

use ash::vk;

/// Primitive assembly state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputAssemblyState {
    /// How vertices are grouped into primitives
    pub topology: vk::PrimitiveTopology,
    /// Whether a special index value restarts strip topologies
    pub primitive_restart_enable: bool,
}

impl InputAssemblyState {
    /// Vulkan create info for this state
    pub fn to_vk(&self) -> vk::PipelineInputAssemblyStateCreateInfo {
        vk::PipelineInputAssemblyStateCreateInfo::builder()
            .topology(self.topology)
            .primitive_restart_enable(self.primitive_restart_enable)
            .build()
    }
}

/// Rasterization state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterizationState {
    /// Clamp fragment depth instead of clipping
    pub depth_clamp_enable: bool,
    /// Discard every primitive before rasterization
    pub rasterizer_discard_enable: bool,
    /// Fill, line or point rendering
    pub polygon_mode: vk::PolygonMode,
    /// Rasterized line width
    pub line_width: f32,
    /// Which faces are culled
    pub cull_mode: vk::CullModeFlags,
    /// Winding order of front faces
    pub front_face: vk::FrontFace,
    /// Whether depth bias is applied
    pub depth_bias_enable: bool,
    /// Constant depth added to each fragment
    pub depth_bias_constant_factor: f32,
    /// Maximum (or minimum) depth bias
    pub depth_bias_clamp: f32,
    /// Depth bias scaled by the fragment slope
    pub depth_bias_slope_factor: f32,
}

impl RasterizationState {
    /// Vulkan create info for this state
    pub fn to_vk(&self) -> vk::PipelineRasterizationStateCreateInfo {
        vk::PipelineRasterizationStateCreateInfo::builder()
            .depth_clamp_enable(self.depth_clamp_enable)
            .rasterizer_discard_enable(self.rasterizer_discard_enable)
            .polygon_mode(self.polygon_mode)
            .line_width(self.line_width)
            .cull_mode(self.cull_mode)
            .front_face(self.front_face)
            .depth_bias_enable(self.depth_bias_enable)
            .depth_bias_constant_factor(self.depth_bias_constant_factor)
            .depth_bias_clamp(self.depth_bias_clamp)
            .depth_bias_slope_factor(self.depth_bias_slope_factor)
            .build()
    }
}

/// Multisampling state
///
/// No sample mask is ever set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultisampleState {
    /// Per-sample shading
    pub sample_shading_enable: bool,
    /// Samples per pixel
    pub rasterization_samples: vk::SampleCountFlags,
    /// Minimum fraction of samples shaded when sample shading is on
    pub min_sample_shading: f32,
    /// Derive coverage from fragment alpha
    pub alpha_to_coverage_enable: bool,
    /// Force fragment alpha to one
    pub alpha_to_one_enable: bool,
}

impl MultisampleState {
    /// Vulkan create info for this state
    pub fn to_vk(&self) -> vk::PipelineMultisampleStateCreateInfo {
        vk::PipelineMultisampleStateCreateInfo::builder()
            .sample_shading_enable(self.sample_shading_enable)
            .rasterization_samples(self.rasterization_samples)
            .min_sample_shading(self.min_sample_shading)
            .alpha_to_coverage_enable(self.alpha_to_coverage_enable)
            .alpha_to_one_enable(self.alpha_to_one_enable)
            .build()
    }
}

/// Blend configuration of the single colour attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorBlendAttachment {
    /// Channels written to the attachment
    pub color_write_mask: vk::ColorComponentFlags,
    /// Whether blending happens at all
    pub blend_enable: bool,
    /// Source colour factor
    pub src_color_blend_factor: vk::BlendFactor,
    /// Destination colour factor
    pub dst_color_blend_factor: vk::BlendFactor,
    /// Colour blend operation
    pub color_blend_op: vk::BlendOp,
    /// Source alpha factor
    pub src_alpha_blend_factor: vk::BlendFactor,
    /// Destination alpha factor
    pub dst_alpha_blend_factor: vk::BlendFactor,
    /// Alpha blend operation
    pub alpha_blend_op: vk::BlendOp,
}

impl ColorBlendAttachment {
    /// Vulkan attachment state
    pub fn to_vk(&self) -> vk::PipelineColorBlendAttachmentState {
        vk::PipelineColorBlendAttachmentState::builder()
            .color_write_mask(self.color_write_mask)
            .blend_enable(self.blend_enable)
            .src_color_blend_factor(self.src_color_blend_factor)
            .dst_color_blend_factor(self.dst_color_blend_factor)
            .color_blend_op(self.color_blend_op)
            .src_alpha_blend_factor(self.src_alpha_blend_factor)
            .dst_alpha_blend_factor(self.dst_alpha_blend_factor)
            .alpha_blend_op(self.alpha_blend_op)
            .build()
    }
}

/// Global colour blend state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBlendState {
    /// Use a bitwise logic op instead of blending
    pub logic_op_enable: bool,
    /// Logic op used when enabled
    pub logic_op: vk::LogicOp,
    /// Constant colour referenced by CONSTANT blend factors
    pub blend_constants: [f32; 4],
}

impl ColorBlendState {
    /// Vulkan create info referencing `attachments`
    pub fn to_vk<'a>(
        &self,
        attachments: &'a [vk::PipelineColorBlendAttachmentState],
    ) -> vk::PipelineColorBlendStateCreateInfoBuilder<'a> {
        vk::PipelineColorBlendStateCreateInfo::builder()
            .logic_op_enable(self.logic_op_enable)
            .logic_op(self.logic_op)
            .attachments(attachments)
            .blend_constants(self.blend_constants)
    }
}

/// Stencil operations for one face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StencilFaceState {
    /// Action when the stencil test fails
    pub fail_op: vk::StencilOp,
    /// Action when both tests pass
    pub pass_op: vk::StencilOp,
    /// Action when stencil passes and depth fails
    pub depth_fail_op: vk::StencilOp,
    /// Stencil comparison
    pub compare_op: vk::CompareOp,
    /// Bits read for the comparison
    pub compare_mask: u32,
    /// Bits written
    pub write_mask: u32,
    /// Reference value
    pub reference: u32,
}

impl Default for StencilFaceState {
    fn default() -> Self {
        Self {
            fail_op: vk::StencilOp::KEEP,
            pass_op: vk::StencilOp::KEEP,
            depth_fail_op: vk::StencilOp::KEEP,
            compare_op: vk::CompareOp::NEVER,
            compare_mask: 0,
            write_mask: 0,
            reference: 0,
        }
    }
}

impl StencilFaceState {
    /// Vulkan stencil state
    pub fn to_vk(&self) -> vk::StencilOpState {
        vk::StencilOpState {
            fail_op: self.fail_op,
            pass_op: self.pass_op,
            depth_fail_op: self.depth_fail_op,
            compare_op: self.compare_op,
            compare_mask: self.compare_mask,
            write_mask: self.write_mask,
            reference: self.reference,
        }
    }
}

/// Depth and stencil testing state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthStencilState {
    /// Compare fragment depth against the depth buffer
    pub depth_test_enable: bool,
    /// Write passing fragment depth
    pub depth_write_enable: bool,
    /// Depth comparison
    pub depth_compare_op: vk::CompareOp,
    /// Discard fragments outside `[min_depth_bounds, max_depth_bounds]`
    pub depth_bounds_test_enable: bool,
    /// Lower depth bound
    pub min_depth_bounds: f32,
    /// Upper depth bound
    pub max_depth_bounds: f32,
    /// Stencil testing
    pub stencil_test_enable: bool,
    /// Front face stencil operations
    pub front: StencilFaceState,
    /// Back face stencil operations
    pub back: StencilFaceState,
}

impl DepthStencilState {
    /// Vulkan create info for this state
    pub fn to_vk(&self) -> vk::PipelineDepthStencilStateCreateInfo {
        vk::PipelineDepthStencilStateCreateInfo::builder()
            .depth_test_enable(self.depth_test_enable)
            .depth_write_enable(self.depth_write_enable)
            .depth_compare_op(self.depth_compare_op)
            .depth_bounds_test_enable(self.depth_bounds_test_enable)
            .min_depth_bounds(self.min_depth_bounds)
            .max_depth_bounds(self.max_depth_bounds)
            .stencil_test_enable(self.stencil_test_enable)
            .front(self.front.to_vk())
            .back(self.back.to_vk())
            .build()
    }
}

/// Configuration for the graphics pipeline
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    /// Mapping from clip space to the output image
    pub viewport: vk::Viewport,
    /// Pixel-space clip rectangle, must fit inside the framebuffer
    pub scissor: vk::Rect2D,
    /// Primitive assembly
    pub input_assembly_info: InputAssemblyState,
    /// Rasterization
    pub rasterization_info: RasterizationState,
    /// Multisampling
    pub multisample_info: MultisampleState,
    /// Blend state of the colour attachment
    pub color_blend_attachment: ColorBlendAttachment,
    /// Global blend state
    pub color_blend_info: ColorBlendState,
    /// Depth and stencil testing
    pub depth_stencil_info: DepthStencilState,
    /// Layout the pipeline is created against, not owned
    pub pipeline_layout: Option<vk::PipelineLayout>,
    /// Render pass the pipeline is compatible with, not owned
    pub render_pass: Option<vk::RenderPass>,
    /// Subpass index within `render_pass`
    pub subpass: u32,
}

/// Build the default configuration for a `width` x `height` output
///
/// The viewport covers the whole output with depth range `[0, 1]` and the
/// scissor matches it exactly. Layout and render pass are left unset.
///
/// `width` and `height` must be non-zero. This precondition is checked with
/// `debug_assert!` in debug builds only; it is the single check made here,
/// and release builds accept any input.
pub fn default_pipeline_config(width: u32, height: u32) -> PipelineConfig {
    debug_assert!(width > 0 && height > 0, "output dimensions must be positive");

    PipelineConfig {
        viewport: vk::Viewport {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        },
        scissor: vk::Rect2D {
            offset: vk::Offset2D { x: 0, y: 0 },
            extent: vk::Extent2D { width, height },
        },
        input_assembly_info: InputAssemblyState {
            topology: vk::PrimitiveTopology::TRIANGLE_LIST,
            primitive_restart_enable: false,
        },
        rasterization_info: RasterizationState {
            depth_clamp_enable: false,
            rasterizer_discard_enable: false,
            polygon_mode: vk::PolygonMode::FILL,
            line_width: 1.0,
            cull_mode: vk::CullModeFlags::NONE,
            front_face: vk::FrontFace::CLOCKWISE,
            depth_bias_enable: false,
            depth_bias_constant_factor: 0.0,
            depth_bias_clamp: 0.0,
            depth_bias_slope_factor: 0.0,
        },
        multisample_info: MultisampleState {
            sample_shading_enable: false,
            rasterization_samples: vk::SampleCountFlags::TYPE_1,
            min_sample_shading: 1.0,
            alpha_to_coverage_enable: false,
            alpha_to_one_enable: false,
        },
        color_blend_attachment: ColorBlendAttachment {
            color_write_mask: vk::ColorComponentFlags::RGBA,
            blend_enable: false,
            src_color_blend_factor: vk::BlendFactor::ONE,
            dst_color_blend_factor: vk::BlendFactor::ZERO,
            color_blend_op: vk::BlendOp::ADD,
            src_alpha_blend_factor: vk::BlendFactor::ONE,
            dst_alpha_blend_factor: vk::BlendFactor::ZERO,
            alpha_blend_op: vk::BlendOp::ADD,
        },
        color_blend_info: ColorBlendState {
            logic_op_enable: false,
            logic_op: vk::LogicOp::COPY,
            blend_constants: [0.0; 4],
        },
        depth_stencil_info: DepthStencilState {
            depth_test_enable: true,
            depth_write_enable: true,
            depth_compare_op: vk::CompareOp::LESS,
            depth_bounds_test_enable: false,
            min_depth_bounds: 0.0,
            max_depth_bounds: 1.0,
            stencil_test_enable: false,
            front: StencilFaceState::default(),
            back: StencilFaceState::default(),
        },
        pipeline_layout: None,
        render_pass: None,
        subpass: 0,
    }
}

impl PipelineConfig {
    /// Same as [`default_pipeline_config`]
    pub fn default_for(width: u32, height: u32) -> Self {
        default_pipeline_config(width, height)
    }

    /// Set the pipeline layout the pipeline is created against
    #[must_use]
    pub fn with_layout(mut self, layout: vk::PipelineLayout) -> Self {
        self.pipeline_layout = Some(layout);
        self
    }

    /// Set the render pass and subpass the pipeline is used in
    #[must_use]
    pub fn with_render_pass(mut self, render_pass: vk::RenderPass, subpass: u32) -> Self {
        self.render_pass = Some(render_pass);
        self.subpass = subpass;
        self
    }

    /// Whether layout and render pass have both been supplied
    pub fn is_complete(&self) -> bool {
        self.pipeline_layout.is_some() && self.render_pass.is_some()
    }
}

// vk::Viewport and vk::Rect2D carry no PartialEq, compare them field by field.
impl PartialEq for PipelineConfig {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (&self.viewport, &other.viewport);
        let viewport_eq = a.x == b.x
            && a.y == b.y
            && a.width == b.width
            && a.height == b.height
            && a.min_depth == b.min_depth
            && a.max_depth == b.max_depth;

        let (a, b) = (&self.scissor, &other.scissor);
        let scissor_eq = a.offset.x == b.offset.x
            && a.offset.y == b.offset.y
            && a.extent.width == b.extent.width
            && a.extent.height == b.extent.height;

        viewport_eq
            && scissor_eq
            && self.input_assembly_info == other.input_assembly_info
            && self.rasterization_info == other.rasterization_info
            && self.multisample_info == other.multisample_info
            && self.color_blend_attachment == other.color_blend_attachment
            && self.color_blend_info == other.color_blend_info
            && self.depth_stencil_info == other.depth_stencil_info
            && self.pipeline_layout == other.pipeline_layout
            && self.render_pass == other.render_pass
            && self.subpass == other.subpass
    }
}
