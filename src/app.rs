use crate::config::AppConfig;
use crate::shell::{self, Thumbnails};
use arplace_assets::{AssetCatalog, AssetHandle, AssetLoader, GltfSource};
use arplace_runtime::{
    Graphics, GraphicsEvent, RcWindow, SimulatedSession, ViewCamera, create_graphics,
};
use arplace_scene::{AnchorId, PlacementSurface, TrackingState};
use arplace_selection::{Intent, SelectionState};
use egui::{Align2, Color32, FontId, Pos2, Sense, Stroke};
use glam::{Affine3A, Vec3};
use std::time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{StartCause, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    window::{Window, WindowId},
};

const FPS: u64 = 60;
const FRAME_TIME: Duration = Duration::from_nanos(1_000_000_000 / FPS);
const LOOK_SPEED: f32 = 0.005;
const FOCUS_HALF_SIZE: f32 = 0.15;
const OUTLINE_CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

const PLANE_COLOR: Color32 = Color32::from_rgb(90, 200, 250);
const ANCHOR_COLOR: Color32 = Color32::from_rgb(255, 149, 0);
const FOCUS_COLOR: Color32 = Color32::YELLOW;

enum State {
    Init(Option<EventLoopProxy<GraphicsEvent>>),
    Ready(ReadyState),
    Stopped,
}

struct ReadyState {
    gfx: Graphics,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

/// The placement loop state. Lives on the UI thread; load results and
/// session events are pulled into it once per frame.
pub struct Placement {
    catalog: AssetCatalog,
    selection: SelectionState<AssetHandle>,
    surface: PlacementSurface<SimulatedSession>,
    thumbnails: Option<Thumbnails>,
    _loader: AssetLoader,
}

impl Placement {
    pub fn new(config: &AppConfig) -> Self {
        let bundle = config.bundle();
        let loader = AssetLoader::new(GltfSource::new(bundle.root()), config.loader.workers);
        let catalog = AssetCatalog::scan(&bundle, &loader);
        let selection = SelectionState::for_catalog_len(catalog.len());

        let view = ViewCamera::new(Vec3::ZERO, 0.0, -35f32.to_radians());
        let surface = PlacementSurface::new(
            SimulatedSession::new(view),
            config.session_config(),
            config.alignment(),
        );

        Self {
            catalog,
            selection,
            surface,
            thumbnails: None,
            _loader: loader,
        }
    }

    /// Start of an update cycle: apply finished loads and session events.
    pub fn tick(&mut self) {
        self.catalog.poll_loads();
        self.selection.sync_catalog_len(self.catalog.len());
        self.surface.update();
    }

    /// End of an update cycle: apply the user's intent, then let the surface
    /// consume any confirmation in the same cycle.
    pub fn apply(&mut self, intent: Option<Intent<AssetHandle>>) -> Option<AnchorId> {
        if let Some(intent) = intent {
            if let Err(err) = self.selection.apply(intent) {
                log::warn!("ignoring intent: {err}");
            }
        }
        self.surface.observe(&mut self.selection, &self.catalog)
    }
}

pub struct App {
    state: State,
    render_target: Instant,
    placement: Placement,
}

impl App {
    pub fn new(event_loop: &EventLoop<GraphicsEvent>, config: &AppConfig) -> Self {
        Self {
            state: State::Init(Some(event_loop.create_proxy())),
            render_target: Instant::now(),
            placement: Placement::new(config),
        }
    }

    fn init_egui_for_graphics(
        gfx: &Graphics,
    ) -> (egui::Context, egui_winit::State, egui_wgpu::Renderer) {
        let egui_ctx = egui::Context::default();
        let viewport_id = egui_ctx.viewport_id();

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            viewport_id,
            gfx.window(),
            None,
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            gfx.device(),
            gfx.surface_config().format,
            egui_wgpu::RendererOptions::default(),
        );

        (egui_ctx, egui_state, egui_renderer)
    }

    fn draw(&mut self) {
        if let State::Ready(ready) = &mut self.state {
            self.placement.tick();
            Self::draw_frame(ready, &mut self.placement);
        }
    }

    fn resized(&mut self, size: PhysicalSize<u32>) {
        if let State::Ready(ready) = &mut self.state {
            ready.gfx.resize(size);
        }
    }

    fn draw_frame(ready: &mut ReadyState, placement: &mut Placement) {
        let raw_input = ready.egui_state.take_egui_input(ready.gfx.window());
        let egui_ctx = ready.egui_ctx.clone();

        let mut intent = None;
        let full_output = egui_ctx.run(raw_input, |ctx| {
            let thumbnails = placement.thumbnails.get_or_insert_with(|| {
                let thumbnails = Thumbnails::upload(ctx, &placement.catalog);
                log::debug!("uploaded {} thumbnail(s)", thumbnails.len());
                thumbnails
            });
            if let Some(asked) =
                shell::show(ctx, &placement.selection, &placement.catalog, thumbnails)
            {
                intent = Some(asked);
            }
            scene_panel(ctx, placement);
            ar_view(ctx, &mut placement.surface);
        });

        placement.apply(intent);

        let egui::FullOutput {
            platform_output,
            textures_delta,
            shapes,
            pixels_per_point,
            ..
        } = full_output;

        ready
            .egui_state
            .handle_platform_output(ready.gfx.window(), platform_output);

        let paint_jobs = ready.egui_ctx.tessellate(shapes, pixels_per_point);

        ready.gfx.draw(|gfx_inner, swap_view, encoder| {
            for (id, image_delta) in &textures_delta.set {
                ready.egui_renderer.update_texture(
                    gfx_inner.device(),
                    gfx_inner.queue(),
                    *id,
                    image_delta,
                );
            }
            for id in &textures_delta.free {
                ready.egui_renderer.free_texture(id);
            }

            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [
                    gfx_inner.surface_config().width,
                    gfx_inner.surface_config().height,
                ],
                pixels_per_point,
            };

            ready.egui_renderer.update_buffers(
                gfx_inner.device(),
                gfx_inner.queue(),
                encoder,
                &paint_jobs,
                &screen_descriptor,
            );

            let rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui_overlay_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: swap_view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut rpass = rpass.forget_lifetime();
            ready
                .egui_renderer
                .render(&mut rpass, &paint_jobs, &screen_descriptor);
        });
    }
}

fn scene_panel(ctx: &egui::Context, placement: &Placement) {
    let surface = &placement.surface;
    egui::SidePanel::right("scene_panel")
        .resizable(true)
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.heading("Scene");
            ui.separator();

            let tracking = match surface.indicator().state() {
                TrackingState::Initializing => "initializing",
                TrackingState::Tracking => "tracking",
            };
            ui.label(format!("Indicator: {tracking}"));
            ui.label(format!("Planes: {}", surface.planes().len()));
            ui.label(format!("Models loading: {}", placement.catalog.pending()));
            ui.separator();

            if surface.scene().is_empty() {
                ui.label("Nothing placed yet.");
            }
            for anchor in surface.scene().anchors() {
                let names = anchor
                    .children()
                    .iter()
                    .map(|child| child.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                let status = match anchor.plane() {
                    Some(plane) => format!("on plane {}", plane.0),
                    None => "waiting for a surface".to_string(),
                };
                ui.label(format!("#{} {names} ({status})", anchor.id().get()));
            }
        });
}

fn ar_view(ctx: &egui::Context, surface: &mut PlacementSurface<SimulatedSession>) {
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::drag());
            let rect = response.rect;

            let delta = response.drag_delta();
            if delta != egui::Vec2::ZERO {
                surface
                    .session_mut()
                    .view_mut()
                    .look(-delta.x * LOOK_SPEED, -delta.y * LOOK_SPEED);
            }

            let camera = *surface.session().view();
            let aspect = rect.width() / rect.height().max(1.0);
            let to_screen = |point: Vec3| {
                camera
                    .project(point, aspect)
                    .map(|uv| rect.min + egui::vec2(uv.x * rect.width(), uv.y * rect.height()))
            };
            let outline = |pose: &Affine3A, half_x: f32, half_z: f32| -> Option<Vec<Pos2>> {
                OUTLINE_CORNERS
                    .iter()
                    .map(|&(sx, sz)| {
                        let corner = Vec3::new(sx * half_x, 0.0, sz * half_z);
                        to_screen(pose.transform_point3(corner))
                    })
                    .collect()
            };

            for plane in surface.planes().iter() {
                let half = plane.extent * 0.5;
                if let Some(points) = outline(&plane.pose, half.x, half.y) {
                    painter.add(egui::Shape::closed_line(points, Stroke::new(1.5, PLANE_COLOR)));
                }
            }

            for anchor in surface.scene().anchors() {
                let Some(pos) = anchor.pose().and_then(|pose| to_screen(pose.translation.into()))
                else {
                    continue;
                };
                let names = anchor
                    .children()
                    .iter()
                    .map(|child| child.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                painter.circle_filled(pos, 6.0, ANCHOR_COLOR);
                painter.text(
                    pos + egui::vec2(10.0, 0.0),
                    Align2::LEFT_CENTER,
                    names,
                    FontId::proportional(13.0),
                    Color32::WHITE,
                );
            }

            match surface.indicator().pose() {
                Some(pose) => {
                    if let Some(points) = outline(&pose, FOCUS_HALF_SIZE, FOCUS_HALF_SIZE) {
                        painter.add(egui::Shape::closed_line(
                            points,
                            Stroke::new(2.0, FOCUS_COLOR),
                        ));
                    }
                }
                None => {
                    painter.text(
                        rect.center(),
                        Align2::CENTER_CENTER,
                        "Move the device to find a surface",
                        FontId::proportional(16.0),
                        Color32::LIGHT_GRAY,
                    );
                }
            }
        });
}

impl ApplicationHandler<GraphicsEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let State::Init(proxy) = &mut self.state {
            if let Some(proxy) = proxy.take() {
                let win_attr = Window::default_attributes().with_title("AR Place");
                let window: RcWindow = match event_loop.create_window(win_attr) {
                    Ok(window) => std::sync::Arc::new(window),
                    Err(err) => {
                        log::error!("cannot create window: {err}");
                        self.state = State::Stopped;
                        event_loop.exit();
                        return;
                    }
                };
                pollster::block_on(create_graphics(window, proxy));
            }
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: GraphicsEvent) {
        match event {
            GraphicsEvent::Ready(graphics) => {
                let (egui_ctx, egui_state, egui_renderer) = App::init_egui_for_graphics(&graphics);

                graphics.request_redraw();
                self.state = State::Ready(ReadyState {
                    gfx: graphics,
                    egui_ctx,
                    egui_state,
                    egui_renderer,
                });
            }
            GraphicsEvent::Failed(err) => {
                log::error!("{err}");
                self.state = State::Stopped;
                event_loop.exit();
            }
        }
    }

    fn new_events(&mut self, _event_loop: &ActiveEventLoop, _cause: StartCause) {
        if self.render_target <= Instant::now() {
            self.render_target += FRAME_TIME;
            if let State::Ready(ready) = &mut self.state {
                ready.gfx.request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::Resized(size) => self.resized(size),
            WindowEvent::RedrawRequested => {
                self.draw();
                let now = Instant::now();
                if self.render_target <= now {
                    self.render_target = now + FRAME_TIME;
                    if let State::Ready(ready) = &mut self.state {
                        ready.gfx.request_redraw();
                    }
                }
            }
            WindowEvent::CloseRequested => event_loop.exit(),
            other => {
                if let State::Ready(ready) = &mut self.state {
                    let response = ready.egui_state.on_window_event(ready.gfx.window(), &other);
                    if response.repaint {
                        ready.gfx.request_redraw();
                    }
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.render_target));
    }
}
