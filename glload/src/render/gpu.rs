use std::sync::Arc;

use log::{debug, info, warn};
use winit::window::Window;

use super::surface::{ConfigAttrib, ConfigFilter, DisplayPlatform, RenderApi};
use crate::error::{GlloadError, Result};

/// Depth/stencil formats offered with each color format, in enumeration
/// order. `None` is a surface without a depth/stencil target.
pub const DEPTH_STENCIL_FORMATS: [Option<wgpu::TextureFormat>; 6] = [
    None,
    Some(wgpu::TextureFormat::Depth16Unorm),
    Some(wgpu::TextureFormat::Depth24Plus),
    Some(wgpu::TextureFormat::Depth24PlusStencil8),
    Some(wgpu::TextureFormat::Depth32Float),
    Some(wgpu::TextureFormat::Stencil8),
];

/// One surface config: a presentable color format plus an optional
/// depth/stencil target.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SurfaceChoice {
    pub color: wgpu::TextureFormat,
    pub depth_stencil: Option<wgpu::TextureFormat>,
    /// False when the compositor only accepts opaque surfaces; alpha bits
    /// then read as 0.
    pub alpha_composited: bool,
}

impl SurfaceChoice {
    pub fn attrib(&self, attrib: ConfigAttrib) -> Option<u32> {
        let [red, green, blue, alpha] = color_bits(self.color)?;
        let alpha = if self.alpha_composited { alpha } else { 0 };
        let (depth, stencil) = depth_stencil_bits(self.depth_stencil);

        Some(match attrib {
            ConfigAttrib::RedSize => red,
            ConfigAttrib::GreenSize => green,
            ConfigAttrib::BlueSize => blue,
            ConfigAttrib::AlphaSize => alpha,
            ConfigAttrib::DepthSize => depth,
            ConfigAttrib::StencilSize => stencil,
            ConfigAttrib::BufferSize => red + green + blue + alpha,
            ConfigAttrib::RenderableType => {
                RenderApi::Gles2.bit() | RenderApi::Gles3.bit()
            }
        })
    }
}

/// Per-channel bit depths of presentable color formats. `None` for formats
/// the harness does not know how to describe.
pub fn color_bits(format: wgpu::TextureFormat) -> Option<[u32; 4]> {
    use wgpu::TextureFormat as F;

    match format {
        F::Bgra8Unorm
        | F::Bgra8UnormSrgb
        | F::Rgba8Unorm
        | F::Rgba8UnormSrgb => Some([8, 8, 8, 8]),
        F::Rgb10a2Unorm => Some([10, 10, 10, 2]),
        F::Rgba16Float => Some([16, 16, 16, 16]),
        _ => None,
    }
}

/// Depth and stencil bits of an optional depth/stencil format.
pub fn depth_stencil_bits(format: Option<wgpu::TextureFormat>) -> (u32, u32) {
    use wgpu::TextureFormat as F;

    match format {
        Some(F::Depth16Unorm) => (16, 0),
        Some(F::Depth24Plus) => (24, 0),
        Some(F::Depth24PlusStencil8) => (24, 8),
        Some(F::Depth32Float) => (32, 0),
        Some(F::Depth32FloatStencil8) => (32, 8),
        Some(F::Stencil8) => (0, 8),
        _ => (0, 0),
    }
}

/// Crosses color formats with depth/stencil formats, color-major.
pub fn build_candidates(
    color_formats: &[wgpu::TextureFormat],
    depth_formats: &[Option<wgpu::TextureFormat>],
    alpha_composited: bool,
) -> Vec<SurfaceChoice> {
    color_formats
        .iter()
        .filter(|format| color_bits(**format).is_some())
        .flat_map(|&color| {
            depth_formats.iter().map(move |&depth_stencil| SurfaceChoice {
                color,
                depth_stencil,
                alpha_composited,
            })
        })
        .collect()
}

/// Display platform backed by a winit window and a wgpu surface.
pub struct WgpuDisplay {
    window: Arc<Window>,
    adapter: wgpu::Adapter,
    surface: Option<wgpu::Surface<'static>>,
    alpha_mode: wgpu::CompositeAlphaMode,
    candidates: Vec<SurfaceChoice>,
}

impl WgpuDisplay {
    pub fn new(window: Arc<Window>) -> Result<Self> {
        let instance =
            wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let surface = instance
            .create_surface(window.clone())
            .map_err(|err| GlloadError::ConfigQuery(err.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            },
        ))
        .map_err(|err| GlloadError::ConfigQuery(err.to_string()))?;

        let info = adapter.get_info();
        info!("Using adapter {} ({:?})", info.name, info.backend);

        let caps = surface.get_capabilities(&adapter);
        let alpha_mode = caps
            .alpha_modes
            .iter()
            .copied()
            .find(|mode| {
                matches!(
                    mode,
                    wgpu::CompositeAlphaMode::PreMultiplied
                        | wgpu::CompositeAlphaMode::PostMultiplied
                )
            })
            .or_else(|| caps.alpha_modes.first().copied())
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let alpha_composited = alpha_mode != wgpu::CompositeAlphaMode::Opaque
            && alpha_mode != wgpu::CompositeAlphaMode::Auto;

        let depth_formats: Vec<Option<wgpu::TextureFormat>> =
            DEPTH_STENCIL_FORMATS
                .into_iter()
                .filter(|format| match format {
                    None => true,
                    Some(format) => adapter
                        .get_texture_format_features(*format)
                        .allowed_usages
                        .contains(wgpu::TextureUsages::RENDER_ATTACHMENT),
                })
                .collect();

        let candidates =
            build_candidates(&caps.formats, &depth_formats, alpha_composited);
        debug!("Surface offers {} candidate configs", candidates.len());

        Ok(Self {
            window,
            adapter,
            surface: Some(surface),
            alpha_mode,
            candidates,
        })
    }

    fn matching(&self, filter: &ConfigFilter) -> Vec<SurfaceChoice> {
        self.candidates
            .iter()
            .filter(|choice| filter.accepts(|attrib| choice.attrib(attrib)))
            .copied()
            .collect()
    }
}

impl DisplayPlatform for WgpuDisplay {
    type Config = SurfaceChoice;
    type Surface = GpuSurface;

    fn count_configs(&self, filter: &ConfigFilter) -> Result<usize> {
        if self.surface.is_none() {
            return Err(GlloadError::ConfigQuery(
                "surface already consumed".to_string(),
            ));
        }
        Ok(self.matching(filter).len())
    }

    fn fetch_configs(
        &self,
        filter: &ConfigFilter,
        max: usize,
    ) -> Result<Vec<SurfaceChoice>> {
        let mut configs = self.matching(filter);
        configs.truncate(max);
        Ok(configs)
    }

    fn config_attrib(
        &self,
        config: &SurfaceChoice,
        attrib: ConfigAttrib,
    ) -> Option<u32> {
        config.attrib(attrib)
    }

    fn create_surface(&mut self, config: &SurfaceChoice) -> Result<GpuSurface> {
        let surface = self.surface.take().ok_or_else(|| {
            GlloadError::Surface("surface already created".to_string())
        })?;

        let (device, queue) = pollster::block_on(self.adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("glload-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::default(),
            },
        ))
        .map_err(|err| GlloadError::Surface(err.to_string()))?;

        let size = self.window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: config.color,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: self.alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        Ok(GpuSurface::new(
            Arc::new(device),
            Arc::new(queue),
            surface,
            surface_config,
            *config,
        ))
    }
}

struct DepthTarget {
    format: wgpu::TextureFormat,
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("glload-depth-stencil"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            format,
            _texture: texture,
            view,
        }
    }

    fn attachment(&self) -> wgpu::RenderPassDepthStencilAttachment<'_> {
        let depth_ops =
            self.format.has_depth_aspect().then_some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Discard,
            });
        let stencil_ops =
            self.format.has_stencil_aspect().then_some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(0),
                store: wgpu::StoreOp::Discard,
            });

        wgpu::RenderPassDepthStencilAttachment {
            view: &self.view,
            depth_ops,
            stencil_ops,
        }
    }
}

/// A configured presentation surface with its device and queue.
pub struct GpuSurface {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    depth: Option<DepthTarget>,
    choice: SurfaceChoice,
}

impl GpuSurface {
    fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
        choice: SurfaceChoice,
    ) -> Self {
        surface.configure(device.as_ref(), &config);
        let depth = choice.depth_stencil.map(|format| {
            DepthTarget::new(
                device.as_ref(),
                format,
                config.width,
                config.height,
            )
        });

        Self {
            device,
            queue,
            surface,
            config,
            depth,
            choice,
        }
    }

    pub fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }

    pub fn queue(&self) -> &Arc<wgpu::Queue> {
        &self.queue
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn depth_stencil_format(&self) -> Option<wgpu::TextureFormat> {
        self.choice.depth_stencil
    }

    pub fn choice(&self) -> SurfaceChoice {
        self.choice
    }

    pub fn size(&self) -> [u32; 2] {
        [self.config.width, self.config.height]
    }

    /// Reconfigures the surface and depth target. Zero sizes are clamped
    /// to 1 so minimized windows stay valid.
    pub fn resize(&mut self, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        if self.size() == [width, height] {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(self.device.as_ref(), &self.config);

        if let Some(depth) = self.depth.as_mut() {
            let format = depth.format;
            *depth =
                DepthTarget::new(self.device.as_ref(), format, width, height);
        }
    }

    /// Acquires the next frame. `Ok(None)` means the frame should be
    /// skipped (surface was reconfigured or timed out).
    pub fn acquire(&mut self) -> Result<Option<wgpu::SurfaceTexture>> {
        match self.surface.get_current_texture() {
            Ok(output) => Ok(Some(output)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(self.device.as_ref(), &self.config);
                Ok(None)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("surface timeout while acquiring frame");
                Ok(None)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => Err(GlloadError::Surface(
                "out of memory while acquiring frame".to_string(),
            )),
            Err(wgpu::SurfaceError::Other) => {
                warn!("surface error while acquiring frame");
                Ok(None)
            }
        }
    }

    /// Clears the color (and depth/stencil) target and presents.
    ///
    /// Returns `Ok(false)` when no frame could be acquired.
    pub fn present_clear(&mut self, color: wgpu::Color) -> Result<bool> {
        let Some(output) = self.acquire()? else {
            return Ok(false);
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.device.create_command_encoder(
            &wgpu::CommandEncoderDescriptor {
                label: Some("glload-clear"),
            },
        );

        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("glload-clear-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: self
                    .depth
                    .as_ref()
                    .map(DepthTarget::attachment),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }

        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(true)
    }
}
