use super::helpers;
use super::targets::RenderTargets;
use crate::constants::{OUTLINE_COLOR, OUTLINE_STRENGTH, OUTLINE_THICKNESS};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PostUniforms {
    resolution: [f32; 2],
    edge_strength: f32,
    edge_thickness: f32,
    edge_color: [f32; 4],
}

impl PostUniforms {
    pub(crate) fn outline(width: u32, height: u32) -> Self {
        Self {
            resolution: [width as f32, height as f32],
            edge_strength: OUTLINE_STRENGTH,
            edge_thickness: OUTLINE_THICKNESS,
            edge_color: OUTLINE_COLOR,
        }
    }
}

pub(crate) struct PostResources {
    pub(crate) scene_layout: wgpu::BindGroupLayout, // colour, sampler, outline uniforms
    pub(crate) mask_layout: wgpu::BindGroupLayout,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) composite_pipeline: wgpu::RenderPipeline,
}

pub(crate) fn create_post_resources(
    device: &wgpu::Device,
    post_shader: &wgpu::ShaderModule,
    swap_format: wgpu::TextureFormat,
) -> PostResources {
    let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("outline_scene_bgl"),
        entries: &[
            helpers::texture_entry(0),
            helpers::sampler_entry(1),
            helpers::uniform_entry(2, wgpu::ShaderStages::FRAGMENT),
        ],
    });
    let mask_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("outline_mask_bgl"),
        entries: &[helpers::texture_entry(0), helpers::sampler_entry(1)],
    });
    let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("outline_uniforms"),
        size: std::mem::size_of::<PostUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("outline_layout"),
        bind_group_layouts: &[&scene_layout, &mask_layout],
        push_constant_ranges: &[],
    });
    let composite_pipeline = helpers::make_post_pipeline(
        device,
        &layout,
        post_shader,
        "fs_composite",
        swap_format,
        Some(wgpu::BlendState::REPLACE),
    );

    PostResources {
        scene_layout,
        mask_layout,
        uniform_buffer,
        composite_pipeline,
    }
}

/// Bind groups that reference the offscreen targets; rebuilt with them.
pub(crate) struct PostBindGroups {
    pub(crate) scene: wgpu::BindGroup,
    pub(crate) mask: wgpu::BindGroup,
}

impl PostBindGroups {
    pub(crate) fn new(
        device: &wgpu::Device,
        post: &PostResources,
        targets: &RenderTargets,
        sampler: &wgpu::Sampler,
    ) -> Self {
        let scene = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_scene"),
            layout: &post.scene_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&targets.scene_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: post.uniform_buffer.as_entire_binding(),
                },
            ],
        });
        let mask = helpers::texture_bind_group(device, "bg_mask", &post.mask_layout, &targets.mask_view, sampler);
        Self { scene, mask }
    }
}

pub(crate) fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    clear: wgpu::Color,
    pipeline: &wgpu::RenderPipeline,
    bg0: &wgpu::BindGroup,
    bg1: Option<&wgpu::BindGroup>,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bg0, &[]);
    if let Some(g1) = bg1 {
        r.set_bind_group(1, g1, &[]);
    }
    r.draw(0..3, 0..1);
}
