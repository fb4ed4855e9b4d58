use thiserror::Error;
use wgpu::{
    Color, CommandEncoder, CommandEncoderDescriptor, Device, ExperimentalFeatures, Features,
    Instance, Limits, LoadOp, MemoryHints, Operations, PowerPreference, Queue,
    RenderPassColorAttachment, RenderPassDescriptor, RequestAdapterOptions, StoreOp, Surface,
    SurfaceConfiguration, SurfaceError, TextureView, TextureViewDescriptor,
};
use winit::{dpi::PhysicalSize, event_loop::EventLoopProxy, window::Window};

pub type RcWindow = std::sync::Arc<Window>;

/// Backdrop standing in for the camera feed.
const FEED_COLOR: Color = Color {
    r: 0.08,
    g: 0.09,
    b: 0.11,
    a: 1.0,
};

#[derive(Debug, Error)]
pub enum GraphicsError {
    #[error("cannot create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("cannot open GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface is not supported by the adapter")]
    UnsupportedSurface,
}

pub enum GraphicsEvent {
    Ready(Graphics),
    Failed(GraphicsError),
}

pub async fn create_graphics(window: RcWindow, proxy: EventLoopProxy<GraphicsEvent>) {
    let event = match init(window).await {
        Ok(gfx) => GraphicsEvent::Ready(gfx),
        Err(err) => GraphicsEvent::Failed(err),
    };
    let _ = proxy.send_event(event);
}

async fn init(window: RcWindow) -> Result<Graphics, GraphicsError> {
    let instance = Instance::default();
    let surface = instance.create_surface(std::sync::Arc::clone(&window))?;

    let adapter = instance
        .request_adapter(&RequestAdapterOptions {
            power_preference: PowerPreference::default(),
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        })
        .await?;

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: None,
            required_features: Features::empty(),
            required_limits: Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits()),
            memory_hints: MemoryHints::Performance,
            trace: Default::default(),
            experimental_features: ExperimentalFeatures::disabled(),
        })
        .await?;

    let size = window.inner_size();
    let surface_config = surface
        .get_default_config(&adapter, size.width.max(1), size.height.max(1))
        .ok_or(GraphicsError::UnsupportedSurface)?;
    surface.configure(&device, &surface_config);

    log::info!("graphics ready on {}", adapter.get_info().name);

    Ok(Graphics {
        window,
        surface,
        surface_config,
        device,
        queue,
    })
}

pub struct Graphics {
    window: RcWindow,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    device: Device,
    queue: Queue,
}

impl Graphics {
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.surface_config.width = new_size.width.max(1);
        self.surface_config.height = new_size.height.max(1);
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Clears the frame to the feed backdrop, then hands the swapchain view
    /// to `overlay` for UI drawing.
    pub fn draw<F>(&mut self, overlay: F)
    where
        F: FnOnce(&mut Self, &TextureView, &mut CommandEncoder),
    {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(err @ (SurfaceError::Lost | SurfaceError::Outdated)) => {
                log::warn!("reconfiguring surface: {err}");
                self.surface.configure(&self.device, &self.surface_config);
                return;
            }
            Err(err) => {
                log::warn!("dropping frame: {err}");
                return;
            }
        };

        let swap_view = frame.texture.create_view(&TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor { label: None });

        let feed_pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("feed_pass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: &swap_view,
                depth_slice: None,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Clear(FEED_COLOR),
                    store: StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        drop(feed_pass);

        overlay(self, &swap_view, &mut encoder);
        self.queue.submit(Some(encoder.finish()));
        frame.present();
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn surface_config(&self) -> &SurfaceConfiguration {
        &self.surface_config
    }
}
