use wgpu::util::DeviceExt;

use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};

use super::vertex::{Position, TriangleMesh, VertexColor};

const BUFFERED_WGSL: &str = include_str!("shaders/triangle.wgsl");
const BUILTIN_WGSL: &str = include_str!("shaders/triangle_builtin.wgsl");

/// Where the triangle's vertices come from.
#[derive(Debug, Clone, PartialEq)]
pub enum TriangleSource {
    /// Positions and colors uploaded as two static vertex buffers.
    Buffered(TriangleMesh),
    /// Vertices and color hard-coded in the shader; no buffers.
    Builtin,
}

impl TriangleSource {
    pub fn shader_source(&self) -> &'static str {
        match self {
            TriangleSource::Buffered(_) => BUFFERED_WGSL,
            TriangleSource::Builtin => BUILTIN_WGSL,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            TriangleSource::Buffered(_) => "buffered",
            TriangleSource::Builtin => "builtin",
        }
    }
}

impl Default for TriangleSource {
    fn default() -> Self {
        TriangleSource::Buffered(TriangleMesh::default())
    }
}

/// Draws one triangle per call.
///
/// GPU objects are created on first use and kept: the pipeline is rebuilt only
/// if the target format changes, the vertex buffers never are.
pub struct TriangleRenderer {
    source: TriangleSource,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    position_vbo: Option<wgpu::Buffer>,
    color_vbo: Option<wgpu::Buffer>,
}

impl TriangleRenderer {
    pub fn new(source: TriangleSource) -> Self {
        Self {
            source,
            pipeline_format: None,
            pipeline: None,
            position_vbo: None,
            color_vbo: None,
        }
    }

    pub fn source(&self) -> &TriangleSource {
        &self.source
    }

    /// Clears `target` to `clear` and draws the triangle.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, clear: Color) {
        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);

        let Some(pipeline) = self.pipeline.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("trigon triangle pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);

        if let TriangleSource::Buffered(_) = self.source {
            let (Some(positions), Some(colors)) = (self.position_vbo.as_ref(), self.color_vbo.as_ref())
            else {
                return;
            };
            rpass.set_vertex_buffer(Position::SLOT, positions.slice(..));
            rpass.set_vertex_buffer(VertexColor::SLOT, colors.slice(..));
        }

        rpass.draw(0..TriangleMesh::VERTEX_COUNT, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        log::debug!(
            "building {} triangle pipeline for {:?}",
            self.source.label(),
            ctx.surface_format
        );

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("trigon triangle shader"),
            source: wgpu::ShaderSource::Wgsl(self.source.shader_source().into()),
        });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("trigon triangle pipeline layout"),
                bind_group_layouts: &[],
                immediate_size: 0,
            });

        let layouts = [Position::layout(), VertexColor::layout()];
        let buffers: &[wgpu::VertexBufferLayout<'static>] = match self.source {
            TriangleSource::Buffered(_) => &layouts,
            TriangleSource::Builtin => &[],
        };

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("trigon triangle pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Cw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        let TriangleSource::Buffered(mesh) = &self.source else { return };
        if self.position_vbo.is_some() && self.color_vbo.is_some() {
            return;
        }

        self.position_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("trigon triangle position vbo"),
            contents: mesh.position_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.color_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("trigon triangle color vbo"),
            contents: mesh.color_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        log::debug!("uploaded triangle vertex buffers");
    }
}

impl Default for TriangleRenderer {
    fn default() -> Self {
        Self::new(TriangleSource::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wgpu::naga;

    fn validated(src: &str) -> naga::Module {
        let module = naga::front::wgsl::parse_str(src).unwrap_or_else(|e| panic!("{}", e.emit_to_string(src)));
        naga::valid::Validator::new(naga::valid::ValidationFlags::all(), naga::valid::Capabilities::all())
            .validate(&module)
            .unwrap_or_else(|e| panic!("{e:?}"));
        module
    }

    fn entry_point<'m>(module: &'m naga::Module, name: &str) -> &'m naga::EntryPoint {
        module
            .entry_points
            .iter()
            .find(|ep| ep.name == name)
            .unwrap_or_else(|| panic!("missing entry point {name}"))
    }

    #[test]
    fn both_shaders_validate_with_pipeline_entry_points() {
        for src in [BUFFERED_WGSL, BUILTIN_WGSL] {
            let module = validated(src);
            assert_eq!(entry_point(&module, "vs_main").stage, naga::ShaderStage::Vertex);
            assert_eq!(entry_point(&module, "fs_main").stage, naga::ShaderStage::Fragment);
        }
    }

    fn vertex_locations(module: &naga::Module) -> Vec<u32> {
        let vs = entry_point(module, "vs_main");
        let mut locations: Vec<u32> = vs
            .function
            .arguments
            .iter()
            .filter_map(|arg| match arg.binding {
                Some(naga::Binding::Location { location, .. }) => Some(location),
                _ => None,
            })
            .collect();
        locations.sort_unstable();
        locations
    }

    #[test]
    fn buffered_shader_reads_both_vertex_locations() {
        let module = validated(BUFFERED_WGSL);
        assert_eq!(vertex_locations(&module), vec![0, 1]);
    }

    #[test]
    fn builtin_shader_takes_no_vertex_attributes() {
        let module = validated(BUILTIN_WGSL);
        assert!(vertex_locations(&module).is_empty());
    }

    #[test]
    fn source_selects_shader() {
        assert_eq!(TriangleSource::Builtin.shader_source(), BUILTIN_WGSL);
        assert_eq!(TriangleSource::default().shader_source(), BUFFERED_WGSL);
    }

    #[test]
    fn new_renderer_holds_no_gpu_objects() {
        let r = TriangleRenderer::default();
        assert!(r.pipeline.is_none());
        assert!(r.position_vbo.is_none());
        assert!(r.color_vbo.is_none());
        assert_eq!(r.source(), &TriangleSource::default());
    }
}
