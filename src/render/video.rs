use super::helpers;
use web_sys as web;

pub(crate) const VIDEO_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Texture backing one orbit rectangle. Starts as a 1x1 placeholder and is
/// reallocated once the video reports its intrinsic size.
pub(crate) struct VideoTexture {
    texture: wgpu::Texture,
    pub(crate) bind_group: wgpu::BindGroup,
    size: (u32, u32),
}

impl VideoTexture {
    pub(crate) fn placeholder(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
    ) -> Self {
        let (texture, bind_group) = Self::alloc(device, layout, sampler, 1, 1);
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &[16, 16, 16, 255],
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4),
                rows_per_image: Some(1),
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        Self {
            texture,
            bind_group,
            size: (1, 1),
        }
    }

    fn alloc(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        width: u32,
        height: u32,
    ) -> (wgpu::Texture, wgpu::BindGroup) {
        let (texture, view) = helpers::create_color_texture(
            device,
            "video_tex",
            width,
            height,
            VIDEO_FORMAT,
            wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let bind_group = helpers::texture_bind_group(device, "bg_video", layout, &view, sampler);
        (texture, bind_group)
    }

    /// Copy the video's current frame. Videos without decoded data are
    /// skipped by the caller; a size change reallocates the texture.
    pub(crate) fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        video: &web::HtmlVideoElement,
    ) {
        let (w, h) = (video.video_width(), video.video_height());
        if w == 0 || h == 0 {
            return;
        }
        if self.size != (w, h) {
            log::debug!("[gpu] video texture {}x{}", w, h);
            let (texture, bind_group) = Self::alloc(device, layout, sampler, w, h);
            self.texture = texture;
            self.bind_group = bind_group;
            self.size = (w, h);
        }
        queue.copy_external_image_to_texture(
            &wgpu::CopyExternalImageSourceInfo {
                source: wgpu::ExternalImageSource::HTMLVideoElement(video.clone()),
                origin: wgpu::Origin2d::ZERO,
                flip_y: false,
            },
            wgpu::CopyExternalImageDestInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
                color_space: wgpu::PredefinedColorSpace::Srgb,
                premultiplied_alpha: false,
            },
            wgpu::Extent3d {
                width: w,
                height: h,
                depth_or_array_layers: 1,
            },
        );
    }
}
