use std::{
    borrow::Cow,
    sync::Arc
};

use bytemuck::{
    Pod,
    Zeroable
};

use wgpu::{
    util::DeviceExt, Device, RenderPipeline, Surface
};

use winit::window::Window;

use crate::game::math::{
    Rect2F,
    Vector2F
};
use crate::gui::GuiElement;

use super::{
    EntityView,
    RenderBatch
};

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Vertex {
    _pos: [f32; 4],
}

impl Vertex {
    fn from_position(x: f32, y: f32) -> Self {
        Vertex{
            _pos: [x, y, 1.0, 1.0]
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct Uniforms {
    color: [f32; 4],
}

fn create_ndc_rect_quad_vertices(x: f32, y: f32, w: f32, h: f32) -> (Vec<Vertex>, Vec<u16>) {
    let vertex_data = vec![
        Vertex::from_position(x, y),           // Bottom-left
        Vertex::from_position(x + w, y),       // Bottom-right
        Vertex::from_position(x + w, y + h),   // Top-right
        Vertex::from_position(x, y + h),       // Top-left
    ];

    let indices_data = vec![
        0, 1, 2, // First triangle
        2, 3, 0, // Second triangle
    ];

    (vertex_data, indices_data)
}

pub struct Renderer {
    window: Arc<Window>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    size: winit::dpi::PhysicalSize<u32>,
    surface: wgpu::Surface<'static>,
    surface_format: wgpu::TextureFormat,
    render_pipeline: RenderPipeline,
    uniform_bind_group_layout: wgpu::BindGroupLayout,
    render_batch: RenderBatch,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> Renderer {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await
            .expect("no suitable gpu adapter found");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor::default(),
                None
            )
            .await
            .expect("failed to create gpu device");

        let size = window.inner_size();

        let surface = instance.create_surface(window.clone())
            .expect("failed to create surface");
        let cap = surface.get_capabilities(&adapter);
        let surface_format = cap.formats[0];

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let render_pipeline = Self::prepare_pipeline(
            &device,
            &surface,
            &adapter,
            &uniform_bind_group_layout
        );

        let state = Renderer {
            window,
            device,
            queue,
            size,
            surface,
            surface_format,
            render_pipeline,
            uniform_bind_group_layout,
            render_batch: RenderBatch::new()
        };

        // Configure surface for the first time
        state.configure_surface();

        state
    }

    fn prepare_pipeline(
        device: &Device,
        surface: &Surface,
        adapter: &wgpu::Adapter,
        uniform_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Rect Shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("shader.wgsl"))),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Rect Pipeline Layout"),
            bind_group_layouts: &[uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        };

        let swapchain_capabilities = surface.get_capabilities(adapter);
        let swapchain_format = swapchain_capabilities.formats[0];

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Rect Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(swapchain_format.into())],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    pub fn get_window(&self) -> &Window {
        &self.window
    }

    fn configure_surface(&self) {
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: self.surface_format,
            view_formats: vec![self.surface_format.add_srgb_suffix()],
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            width: self.size.width,
            height: self.size.height,
            desired_maximum_frame_latency: 2,
            present_mode: wgpu::PresentMode::AutoVsync,
        };
        self.surface.configure(&self.device, &surface_config);
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.size = new_size;
        self.configure_surface();
    }

    pub fn batch_clear(&mut self) {
        self.render_batch.entities.clear();
        self.render_batch.gui_elements.clear();
    }

    pub fn batch_set_camera(&mut self, camera: Vector2F, zoom: f32) {
        self.render_batch.camera = camera;
        self.render_batch.zoom = zoom;
    }

    pub fn batch_append_entity(&mut self, view: EntityView) {
        self.render_batch.entities.push(view);
    }

    pub fn batch_append_gui_element(&mut self, element: GuiElement) {
        self.render_batch.gui_elements.push(element);
    }

    /// World rect to window pixels: camera sits at the window center and
    /// zoom scales around it.
    fn world_to_screen(&self, rect: &Rect2F) -> Rect2F {
        let half_w = self.size.width as f32 * 0.5;
        let half_h = self.size.height as f32 * 0.5;
        let zoom = self.render_batch.zoom;
        Rect2F::new(
            (rect.pos.x - self.render_batch.camera.x) * zoom + half_w,
            (rect.pos.y - self.render_batch.camera.y) * zoom + half_h,
            rect.size.x * zoom,
            rect.size.y * zoom,
        )
    }

    pub fn render(&mut self) {
        let surface_texture = self.surface.get_current_texture()
            .expect("failed to acquire next swapchain texture");

        let texture_view = surface_texture.texture
            .create_view(&wgpu::TextureViewDescriptor {
                // Without add_srgb_suffix() the image we will be working with
                // might not be "gamma correct".
                format: Some(self.surface_format.add_srgb_suffix()),
                ..Default::default()
            });

        let mut encoder = self.device.create_command_encoder(&Default::default());

        {
            let mut renderpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.1,
                            g: 0.1,
                            b: 0.1,
                            a: 1.0
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            renderpass.set_pipeline(&self.render_pipeline);

            self.render_entities(&mut renderpass);
            self.render_guis(&mut renderpass);
        }

        self.queue.submit([encoder.finish()]);
        self.window.pre_present_notify();
        surface_texture.present();
    }

    fn render_entities(&self, renderpass: &mut wgpu::RenderPass<'_>) {
        let views: Vec<(Rect2F, [f32; 4])> = self.render_batch.entities.iter()
            .map(|ev| {
                let rect = self.world_to_screen(&ev.rect);
                (rect, [ev.color[0], ev.color[1], ev.color[2], 1.0])
            })
            .collect();

        for (rect, color) in views {
            self.draw_pixel_rect(renderpass, &rect, color);
        }
    }

    fn render_guis(&self, renderpass: &mut wgpu::RenderPass<'_>) {
        let elements: Vec<(Rect2F, [f32; 4])> = self.render_batch.gui_elements.iter()
            .map(|gui_element| {
                let (rect, color) = match gui_element {
                    GuiElement::Box(gui_box) => (gui_box.rect, gui_box.color),
                };
                let float_color = [
                    color.0 as f32 / 255.0,
                    color.1 as f32 / 255.0,
                    color.2 as f32 / 255.0,
                    1.0
                ];
                (rect, float_color)
            })
            .collect();

        for (rect, color) in elements {
            self.draw_pixel_rect(renderpass, &rect, color);
        }
    }

    /// Draws a single pixel-space rect. One uniform buffer and quad per
    /// call keeps the pipeline trivial at sandbox entity counts.
    fn draw_pixel_rect(&self, renderpass: &mut wgpu::RenderPass<'_>, rect: &Rect2F, color: [f32; 4]) {
        let uniform = Uniforms { color };

        let uniform_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Rect Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let rect_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Rect Bind Group"),
            layout: &self.uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let (vertices, indices) = create_ndc_rect_quad_vertices(
            (rect.pos.x / self.size.width as f32) * 2.0 - 1.0,
            1.0 - ((rect.pos.y + rect.size.y) / self.size.height as f32) * 2.0,
            (rect.size.x / self.size.width as f32) * 2.0,
            (rect.size.y / self.size.height as f32) * 2.0
        );

        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Rect Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Rect Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        renderpass.set_bind_group(0, &rect_bind_group, &[]);
        renderpass.set_vertex_buffer(0, vertex_buffer.slice(..));
        renderpass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);

        renderpass.draw_indexed(0..indices.len() as u32, 0, 0..1);
    }
}
