use asterisk_core::constants::{ASTERISK_ARMS, ASTERISK_SIZE};
use asterisk_core::{asterisk_arms, FrameOutput, OrbitGroup};
use glam::{Mat4, Quat};
use web_sys as web;

mod geometry;
mod helpers;
mod post;
mod targets;
mod video;

use geometry::{InstanceBuffer, InstanceRaw, Mesh};
use post::{PostBindGroups, PostResources, PostUniforms};
use targets::RenderTargets;
use video::VideoTexture;

use crate::constants::{
    AMBIENT_LIGHT, ASTERISK_COLOR, CORNER_COLOR, DIRECTIONAL_LIGHT, LIGHT_DIR,
};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    light: [f32; 4],
    ambient: [f32; 4],
}

/// Instance data for one frame, derived from the director's output.
pub struct SceneDraw {
    pub view_proj: Mat4,
    pub arms: Vec<Mat4>,
    pub rects: Vec<Mat4>,
    pub corners: Vec<Mat4>,
}

impl SceneDraw {
    pub fn from_frame(out: &FrameOutput, orbit: &OrbitGroup) -> Self {
        Self {
            view_proj: out.camera.view_projection(),
            arms: asterisk_model(out.asterisk_rotation),
            rects: orbit.rect_transforms(out.billboard),
            corners: orbit.corner_transforms(out.billboard),
        }
    }
}

fn asterisk_model(rotation: Quat) -> Vec<Mat4> {
    let r = Mat4::from_quat(rotation);
    asterisk_arms(ASTERISK_SIZE, ASTERISK_ARMS)
        .into_iter()
        .map(|arm| r * arm)
        .collect()
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    solid_pipeline: wgpu::RenderPipeline,
    video_pipeline: wgpu::RenderPipeline,
    video_bgl: wgpu::BindGroupLayout,

    cube: Mesh,
    flat_quad: Mesh,
    video_quad: Mesh,
    solid_instances: InstanceBuffer,
    video_instances: InstanceBuffer,
    videos: Vec<VideoTexture>,

    targets: RenderTargets,
    linear_sampler: wgpu::Sampler,
    post: PostResources,
    post_groups: PostBindGroups,

    width: u32,
    height: u32,
}

impl GpuState {
    pub async fn new(canvas: &web::HtmlCanvasElement, video_count: usize) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        // The page shows through wherever the scene is empty.
        let alpha_mode = if caps.alpha_modes.contains(&wgpu::CompositeAlphaMode::PreMultiplied) {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            caps.alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("[gpu] surface {:?} {}x{} alpha={:?}", format, width, height, alpha_mode);

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(asterisk_core::SCENE_WGSL.into()),
        });
        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(asterisk_core::POST_WGSL.into()),
        });

        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
            entries: &[helpers::uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_globals"),
            layout: &globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });
        let video_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("video_bgl"),
            entries: &[helpers::texture_entry(0), helpers::sampler_entry(1)],
        });

        let pl_solid = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_solid"),
            bind_group_layouts: &[&globals_bgl],
            push_constant_ranges: &[],
        });
        let pl_video = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_video"),
            bind_group_layouts: &[&globals_bgl, &video_bgl],
            push_constant_ranges: &[],
        });
        let solid_pipeline = helpers::make_scene_pipeline(
            &device,
            &helpers::ScenePipelineDesc {
                label: "solid_pipeline",
                layout: &pl_solid,
                shader: &scene_shader,
                vs_entry: "vs_solid",
                fs_entry: "fs_solid",
                buffers: &[geometry::solid_layout(), geometry::instance_layout()],
                color_format: targets::SCENE_FORMAT,
                mask_format: targets::MASK_FORMAT,
                cull_mode: None,
            },
        );
        let video_pipeline = helpers::make_scene_pipeline(
            &device,
            &helpers::ScenePipelineDesc {
                label: "video_pipeline",
                layout: &pl_video,
                shader: &scene_shader,
                vs_entry: "vs_video",
                fs_entry: "fs_video",
                buffers: &[geometry::video_layout(), geometry::instance_layout()],
                color_format: targets::SCENE_FORMAT,
                mask_format: targets::MASK_FORMAT,
                cull_mode: None,
            },
        );

        let (cube_v, cube_i) = geometry::cube();
        let cube = Mesh::new(&device, "cube", &cube_v, &cube_i);
        let flat_quad = Mesh::quad(&device, "flat_quad", &geometry::flat_quad());
        let video_quad = Mesh::quad(&device, "video_quad", &geometry::video_quad());
        let solid_instances =
            InstanceBuffer::new(&device, "solid_instances", ASTERISK_ARMS + video_count * 4);
        let video_instances = InstanceBuffer::new(&device, "video_instances", video_count);
        let videos = (0..video_count)
            .map(|_| VideoTexture::placeholder(&device, &queue, &video_bgl, &linear_sampler))
            .collect();

        let targets = RenderTargets::new(&device, width, height);
        let post = post::create_post_resources(&device, &post_shader, format);
        let post_groups = PostBindGroups::new(&device, &post, &targets, &linear_sampler);
        queue.write_buffer(
            &post.uniform_buffer,
            0,
            bytemuck::bytes_of(&PostUniforms::outline(width, height)),
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            globals_buffer,
            globals_bind_group,
            solid_pipeline,
            video_pipeline,
            video_bgl,
            cube,
            flat_quad,
            video_quad,
            solid_instances,
            video_instances,
            videos,
            targets,
            linear_sampler,
            post,
            post_groups,
            width,
            height,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);

            self.targets.recreate(&self.device, width, height);
            self.post_groups =
                PostBindGroups::new(&self.device, &self.post, &self.targets, &self.linear_sampler);
            self.queue.write_buffer(
                &self.post.uniform_buffer,
                0,
                bytemuck::bytes_of(&PostUniforms::outline(width, height)),
            );
            log::debug!("[gpu] resized targets to {:?}", self.targets.size());
        }
    }

    pub fn upload_video(&mut self, index: usize, video: &web::HtmlVideoElement) {
        if let Some(tex) = self.videos.get_mut(index) {
            tex.upload(
                &self.device,
                &self.queue,
                &self.video_bgl,
                &self.linear_sampler,
                video,
            );
        }
    }

    pub fn render(&mut self, scene: &SceneDraw) -> Result<(), wgpu::SurfaceError> {
        let light = glam::Vec3::from_array(LIGHT_DIR).normalize();
        let globals = Globals {
            view_proj: scene.view_proj.to_cols_array_2d(),
            light: [light.x, light.y, light.z, DIRECTIONAL_LIGHT],
            ambient: [AMBIENT_LIGHT, 0.0, 0.0, 0.0],
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let solids: Vec<InstanceRaw> = scene
            .arms
            .iter()
            .map(|m| InstanceRaw::lit(*m, ASTERISK_COLOR))
            .chain(scene.corners.iter().map(|m| InstanceRaw::flat(*m, CORNER_COLOR)))
            .collect();
        let rects: Vec<InstanceRaw> = scene
            .rects
            .iter()
            .map(|m| InstanceRaw::flat(*m, [1.0; 4]))
            .collect();
        self.solid_instances.write(&self.device, &self.queue, &solids);
        self.video_instances.write(&self.device, &self.queue, &rects);

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[
                    Some(wgpu::RenderPassColorAttachment {
                        view: &self.targets.scene_view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                            store: wgpu::StoreOp::Store,
                        },
                    }),
                    Some(wgpu::RenderPassColorAttachment {
                        view: &self.targets.mask_view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                            store: wgpu::StoreOp::Store,
                        },
                    }),
                ],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // asterisk arms then corner squares share one instance buffer
            let arms = scene.arms.len() as u32;
            let total = solids.len() as u32;
            rpass.set_pipeline(&self.solid_pipeline);
            rpass.set_bind_group(0, &self.globals_bind_group, &[]);
            rpass.set_vertex_buffer(1, self.solid_instances.buffer.slice(..));
            if arms > 0 {
                rpass.set_vertex_buffer(0, self.cube.vertices.slice(..));
                rpass.set_index_buffer(self.cube.indices.slice(..), wgpu::IndexFormat::Uint16);
                rpass.draw_indexed(0..self.cube.index_count, 0, 0..arms);
            }
            if total > arms {
                rpass.set_vertex_buffer(0, self.flat_quad.vertices.slice(..));
                rpass.set_index_buffer(self.flat_quad.indices.slice(..), wgpu::IndexFormat::Uint16);
                rpass.draw_indexed(0..self.flat_quad.index_count, 0, arms..total);
            }

            if !rects.is_empty() {
                rpass.set_pipeline(&self.video_pipeline);
                rpass.set_bind_group(0, &self.globals_bind_group, &[]);
                rpass.set_vertex_buffer(0, self.video_quad.vertices.slice(..));
                rpass.set_vertex_buffer(1, self.video_instances.buffer.slice(..));
                rpass.set_index_buffer(self.video_quad.indices.slice(..), wgpu::IndexFormat::Uint16);
                for (i, tex) in self.videos.iter().enumerate().take(rects.len()) {
                    let i = i as u32;
                    rpass.set_bind_group(1, &tex.bind_group, &[]);
                    rpass.draw_indexed(0..self.video_quad.index_count, 0, i..i + 1);
                }
            }
        }

        post::blit(
            &mut encoder,
            "composite",
            &view,
            wgpu::Color::TRANSPARENT,
            &self.post.composite_pipeline,
            &self.post_groups.scene,
            Some(&self.post_groups.mask),
        );

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Present a transparent frame so the canvas does not hold a stale scene
    /// while overlays cover it.
    pub fn clear(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("clear_encoder"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("clear_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
