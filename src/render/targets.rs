use super::helpers;

pub(crate) const SCENE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
pub(crate) const MASK_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Offscreen targets for the scene pass.
///
/// - `scene_*` holds premultiplied linear color for the composite.
/// - `mask_*` marks outlined geometry in its red channel.
/// - `depth_*` is only attached during the scene pass.
pub(crate) struct RenderTargets {
    pub(crate) scene_tex: wgpu::Texture,
    pub(crate) scene_view: wgpu::TextureView,
    pub(crate) mask_tex: wgpu::Texture,
    pub(crate) mask_view: wgpu::TextureView,
    pub(crate) depth_tex: wgpu::Texture,
    pub(crate) depth_view: wgpu::TextureView,
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let usage = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        let (scene_tex, scene_view) =
            helpers::create_color_texture(device, "scene_tex", width, height, SCENE_FORMAT, usage);
        let (mask_tex, mask_view) =
            helpers::create_color_texture(device, "mask_tex", width, height, MASK_FORMAT, usage);
        let (depth_tex, depth_view) = helpers::create_depth_texture(device, width, height);
        Self {
            scene_tex,
            scene_view,
            mask_tex,
            mask_view,
            depth_tex,
            depth_view,
        }
    }

    pub(crate) fn recreate(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        *self = Self::new(device, width, height);
    }

    pub(crate) fn size(&self) -> (u32, u32) {
        (self.scene_tex.width(), self.scene_tex.height())
    }
}
