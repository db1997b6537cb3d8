use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use galaxy_author::controls::get as param_value;
use galaxy_author::{CONTROLS, Command, ParamField, ParamValue, Session};
use galaxy_common::Rgb;
use galaxy_input::{Action, Key, KeyBindings, Modifiers, normalize_cursor};
use galaxy_kernel::{GalaxyParameters, Replacement, load_preset};
use galaxy_render::present;
use galaxy_render_wgpu::{GpuScene, OrbitCamera, WgpuRenderer};
use galaxy_tools::{CloudInspector, CloudSummary};
use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowId};

/// Two clicks closer than this count as a double click.
const DOUBLE_CLICK: Duration = Duration::from_millis(300);

#[derive(Parser)]
#[command(name = "galaxy-desktop", about = "Galaxy point-cloud viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON parameter preset to start from
    #[arg(long)]
    preset: Option<PathBuf>,

    /// RNG seed for reproducible clouds
    #[arg(long)]
    seed: Option<u64>,
}

/// Application state.
struct AppState {
    session: Session,
    rng: StdRng,
    camera: OrbitCamera,
    bindings: KeyBindings,
    /// Commands collected from input and the panel, handled once per frame.
    pending: Vec<Command>,
    /// Replacements waiting to reach the GPU.
    unpresented: Vec<Replacement>,
    summary: Option<CloudSummary>,
    status: Option<String>,
    show_panel: bool,
    /// Slider values being dragged, not yet committed.
    drafts: HashMap<ParamField, f32>,
    color_drafts: HashMap<ParamField, Rgb>,
    // Input state
    modifiers: Modifiers,
    cursor: Vec2,
    dragging: bool,
    last_click: Option<Instant>,
    fullscreen_requested: bool,
}

impl AppState {
    fn new(params: GalaxyParameters, seed: Option<u64>) -> Result<Self> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut session = Session::new(params);
        let first = session.start(&mut rng)?;
        for event in session.drain_events() {
            tracing::debug!(?event, "galaxy event");
        }

        Ok(Self {
            session,
            rng,
            camera: OrbitCamera::default(),
            bindings: KeyBindings::default(),
            pending: Vec::new(),
            summary: Some(CloudInspector::summary(&first.cloud)),
            unpresented: vec![first],
            status: None,
            show_panel: false,
            drafts: HashMap::new(),
            color_drafts: HashMap::new(),
            modifiers: Modifiers::default(),
            cursor: Vec2::ZERO,
            dragging: false,
            last_click: None,
            fullscreen_requested: false,
        })
    }

    /// Run every queued command through the session.
    fn process_commands(&mut self) {
        for command in std::mem::take(&mut self.pending) {
            match self.session.handle(command, &mut self.rng) {
                Ok(Some(replacement)) => {
                    self.summary = Some(CloudInspector::summary(&replacement.cloud));
                    self.status = None;
                    self.unpresented.push(replacement);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("command rejected: {e}");
                    self.status = Some(e.to_string());
                }
            }
        }
        self.log_events();
    }

    /// Drain the session's generation events into the log.
    fn log_events(&mut self) {
        for event in self.session.drain_events() {
            tracing::debug!(?event, "galaxy event");
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Nudge(delta) => self.camera.nudge(delta),
            Action::Cursor(position) => self.cursor = position,
            Action::ToggleFullscreen => self.fullscreen_requested = true,
            Action::TogglePanel => self.show_panel = !self.show_panel,
            Action::Undo => self.pending.push(Command::Undo),
            Action::Redo => self.pending.push(Command::Redo),
            Action::Noop => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        let action = self.bindings.map(map_key(code), self.modifiers);
        if action != Action::Noop {
            tracing::debug!(?action, "key action");
        }
        self.apply(action);
    }

    /// Left press; a second press within [`DOUBLE_CLICK`] toggles fullscreen.
    fn handle_click(&mut self, now: Instant) {
        match self.last_click {
            Some(previous) if now.duration_since(previous) <= DOUBLE_CLICK => {
                self.apply(Action::ToggleFullscreen);
                self.last_click = None;
            }
            _ => self.last_click = Some(now),
        }
    }

    /// Left button edge. A release ends the orbit drag wherever it lands.
    fn left_button(&mut self, pressed: bool, now: Instant) {
        self.dragging = pressed;
        if pressed {
            self.handle_click(now);
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_panel {
            return;
        }

        let params = self.session.params().clone();
        let pointer_down = ctx.input(|i| i.pointer.any_down());

        egui::Window::new("Galaxy")
            .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
            .resizable(false)
            .show(ctx, |ui| {
                for spec in CONTROLS {
                    let ParamValue::Number(current) = param_value(&params, spec.field) else {
                        continue;
                    };
                    let mut value = self.drafts.get(&spec.field).copied().unwrap_or(current);
                    let response = ui.add(
                        egui::Slider::new(&mut value, spec.min..=spec.max)
                            .step_by(spec.step as f64)
                            .text(spec.field.name()),
                    );
                    if response.changed() {
                        self.drafts.insert(spec.field, value);
                    }
                    let finished =
                        response.drag_stopped() || response.lost_focus() || response.clicked();
                    if finished {
                        if let Some(value) = self.drafts.remove(&spec.field) {
                            self.pending.push(Command::Commit {
                                field: spec.field,
                                value: ParamValue::Number(value),
                            });
                        }
                    }
                }

                ui.separator();
                let mut colored = params.gradient.is_some();
                if ui.checkbox(&mut colored, "colored").changed() {
                    self.pending.push(Command::Commit {
                        field: ParamField::Colored,
                        value: ParamValue::Toggle(colored),
                    });
                }
                if params.gradient.is_some() {
                    for field in [ParamField::InsideColor, ParamField::OutsideColor] {
                        let ParamValue::Color(current) = param_value(&params, field) else {
                            continue;
                        };
                        let shown = self.color_drafts.get(&field).copied().unwrap_or(current);
                        let mut srgb = to_srgb_bytes(shown);
                        ui.horizontal(|ui| {
                            if egui::color_picker::color_edit_button_srgb(ui, &mut srgb).changed()
                            {
                                self.color_drafts.insert(field, from_srgb_bytes(srgb));
                            }
                            ui.label(field.name());
                        });
                    }
                }
                // Color pickers report every intermediate value; commit on release.
                if !pointer_down {
                    for (field, color) in self.color_drafts.drain() {
                        self.pending.push(Command::Commit {
                            field,
                            value: ParamValue::Color(color),
                        });
                    }
                }

                ui.separator();
                let editor = self.session.editor();
                let (can_undo, can_redo) = (editor.can_undo(), editor.can_redo());
                let (undo_count, redo_count) = (editor.undo_count(), editor.redo_count());
                ui.horizontal(|ui| {
                    if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                        self.pending.push(Command::Undo);
                    }
                    if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                        self.pending.push(Command::Redo);
                    }
                    if ui.button("Regenerate").clicked() {
                        self.pending.push(Command::Regenerate);
                    }
                    if ui.button("Defaults").clicked() {
                        self.pending
                            .push(Command::Reset(Box::new(GalaxyParameters::default())));
                    }
                });
                ui.label(format!("Undo: {undo_count} / Redo: {redo_count}"));

                ui.separator();
                ui.label(format!(
                    "Generation: {}",
                    self.session.displayed().generation()
                ));
                if let Some(summary) = &self.summary {
                    ui.label(format!(
                        "Points: {}  max r: {:.2}",
                        summary.point_count, summary.max_radius
                    ));
                }
                ui.label(format!(
                    "Camera: ({:.1}, {:.1}, {:.1})  Cursor: ({:.2}, {:.2})",
                    self.camera.position.x,
                    self.camera.position.y,
                    self.camera.position.z,
                    self.cursor.x,
                    self.cursor.y
                ));
                if let Some(status) = &self.status {
                    ui.colored_label(egui::Color32::LIGHT_RED, status);
                }

                ui.separator();
                ui.small("H: Panel | WASD/Arrows: Move | Drag: Orbit | Double-click: Fullscreen");
            });
    }
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyZ => Key::Z,
        KeyCode::KeyY => Key::Y,
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        _ => Key::Other,
    }
}

fn to_srgb_bytes(color: Rgb) -> [u8; 3] {
    let hex = color.to_u32();
    [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8]
}

fn from_srgb_bytes([r, g, b]: [u8; 3]) -> Rgb {
    Rgb::from_u32(u32::from_be_bytes([0, r, g, b]))
}

/// Window and GPU resources, created once the event loop resumes.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Galaxy")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("galaxy_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .context("surface reports no alpha modes")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    fn toggle_fullscreen(&self) {
        let next = match self.window.fullscreen() {
            Some(_) => None,
            None => Some(Fullscreen::Borderless(None)),
        };
        tracing::info!(fullscreen = next.is_some(), "toggling fullscreen");
        self.window.set_fullscreen(next);
    }
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn redraw(&mut self) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        let state = &mut self.state;

        state.process_commands();
        {
            let mut scene = GpuScene {
                renderer: &mut gpu.renderer,
                device: &gpu.device,
            };
            for replacement in state.unpresented.drain(..) {
                present(&mut scene, &replacement);
            }
        }
        if std::mem::take(&mut state.fullscreen_requested) {
            gpu.toggle_fullscreen();
        }
        state.camera.update();

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.renderer
            .render(&gpu.device, &gpu.queue, &view, &state.camera);

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });

        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                self.state.camera.set_viewport(size.width, size.height);
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to initialize GPU: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
        if response.consumed {
            // The panel may swallow the release that ends a drag.
            if let WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Released,
                ..
            } = event
            {
                self.state.left_button(false, Instant::now());
            }
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                gpu.resize(new_size.width, new_size.height);
                self.state
                    .camera
                    .set_viewport(gpu.config.width, gpu.config.height);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.state.modifiers.ctrl = modifiers.state().control_key();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.state.handle_key(key);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let cursor = normalize_cursor(
                    position.x,
                    position.y,
                    gpu.config.width,
                    gpu.config.height,
                );
                self.state.apply(Action::Cursor(cursor));
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                self.state
                    .left_button(btn_state == ElementState::Pressed, Instant::now());
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 50.0,
                };
                self.state.camera.zoom(lines);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.dragging {
                self.state.camera.rotate(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("galaxy-desktop starting");

    let params = match &cli.preset {
        Some(path) => {
            load_preset(path).with_context(|| format!("loading preset {}", path.display()))?
        }
        None => GalaxyParameters::default(),
    };
    let state = AppState::new(params, cli.seed)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state);
    event_loop.run_app(&mut app)?;

    Ok(())
}
