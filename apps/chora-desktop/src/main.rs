mod config;
mod loading;

use anyhow::{Result, anyhow};
use chora_assets::{AssetError, AssetLoader, AssetTask, MatcapImage, Typeface};
use chora_render::{AppContext, FrameScheduler, RenderLoop};
use chora_render_wgpu::{GpuFrame, WgpuRenderer};
use chora_scene::{MaterialHandle, TextureHandle};
use clap::Parser;
use config::DemoConfig;
use loading::{accept_matcap, apply_font};
use egui::Context as EguiContext;
use glam::Vec2;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "chora-desktop", about = "Chora Club scene viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory asset paths are resolved against
    #[arg(long, default_value = "./static")]
    assets_dir: PathBuf,

    /// Seed for the solid placements; random when absent
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file overriding window, asset and scene settings
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Completions delivered from asset threads to the event loop.
#[derive(Debug)]
enum AppEvent {
    FontLoaded(Result<Typeface, AssetError>),
    MatcapLoaded {
        slot: TextureHandle,
        result: Result<MatcapImage, AssetError>,
    },
}

/// Frame scheduling through the window's redraw request.
struct RedrawScheduler<'a>(&'a Window);

impl FrameScheduler for RedrawScheduler<'_> {
    fn schedule_next(&mut self) {
        self.0.request_redraw();
    }
}

struct GpuApp {
    config: DemoConfig,
    loader: AssetLoader,
    proxy: EventLoopProxy<AppEvent>,
    seed: u64,
    ctx: AppContext,
    text_material: MaterialHandle,
    fill_material: MaterialHandle,
    frame_loop: RenderLoop,
    tasks: Vec<AssetTask>,
    /// Matcaps that arrived before the GPU was ready.
    pending_matcaps: Vec<(TextureHandle, MatcapImage)>,
    cursor: Vec2,
    fatal: Option<anyhow::Error>,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    surface_config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(
        config: DemoConfig,
        loader: AssetLoader,
        proxy: EventLoopProxy<AppEvent>,
        seed: u64,
    ) -> Result<Self> {
        let mut ctx = AppContext::new(config.width as f32, config.height as f32, 1.0);
        let text_slot = ctx.scene.add_texture(config.text_matcap.clone());
        let fill_slot = ctx.scene.add_texture(config.fill_matcap.clone());
        let text_material = ctx.scene.add_material("text", text_slot)?;
        let fill_material = ctx.scene.add_material("fill", fill_slot)?;

        Ok(Self {
            config,
            loader,
            proxy,
            seed,
            ctx,
            text_material,
            fill_material,
            frame_loop: RenderLoop::new(),
            tasks: Vec::new(),
            pending_matcaps: Vec::new(),
            cursor: Vec2::ZERO,
            fatal: None,
            window: None,
            surface: None,
            device: None,
            queue: None,
            surface_config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        })
    }

    /// Kick off the font and matcap loads for every texture slot.
    fn start_loads(&mut self) -> Result<()> {
        let proxy = self.proxy.clone();
        self.tasks.push(self.loader.spawn_font(&self.config.font, move |result| {
            if proxy.send_event(AppEvent::FontLoaded(result)).is_err() {
                tracing::warn!("event loop closed before the font arrived");
            }
        })?);

        for (index, slot) in self.ctx.scene.textures().iter().enumerate() {
            let proxy = self.proxy.clone();
            let slot_handle = TextureHandle(index as u32);
            self.tasks.push(self.loader.spawn_matcap(&slot.path, move |result| {
                let event = AppEvent::MatcapLoaded {
                    slot: slot_handle,
                    result,
                };
                if proxy.send_event(event).is_err() {
                    tracing::warn!("event loop closed before a matcap arrived");
                }
            })?);
        }
        tracing::info!("started {} asset loads", self.tasks.len());
        Ok(())
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
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
        .ok_or_else(|| anyhow!("no GPU adapter can present to this window"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("chora_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let scale = window.scale_factor();
        let logical = window.inner_size().to_logical::<f32>(scale);
        let size = self.ctx.resize(logical.width, logical.height, scale as f32);

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no texture formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let mut renderer =
            WgpuRenderer::new(&device, &queue, surface_format, size.width, size.height);
        for (slot, image) in self.pending_matcaps.drain(..) {
            renderer.set_matcap(&device, &queue, slot, &image);
        }

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(scale as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend, buffer {}x{}",
            adapter.get_info().backend.to_str(),
            size.width,
            size.height
        );

        window.request_redraw();
        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.surface_config = Some(surface_config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    /// Apply a host size change and reconfigure the surface to match.
    fn apply_resize(&mut self, physical: PhysicalSize<u32>, scale: f64) {
        let logical = physical.to_logical::<f32>(scale);
        let size = self.ctx.resize(logical.width, logical.height, scale as f32);

        if let (Some(surface), Some(device), Some(surface_config)) =
            (&self.surface, &self.device, &mut self.surface_config)
        {
            surface_config.width = size.width;
            surface_config.height = size.height;
            surface.configure(device, surface_config);
            if let Some(renderer) = &mut self.renderer {
                renderer.resize(device, size.width, size.height);
            }
        }
    }

    fn on_font(&mut self, result: Result<Typeface, AssetError>) {
        apply_font(
            &mut self.ctx,
            self.text_material,
            self.fill_material,
            &self.config.populate,
            self.seed,
            result,
        );
    }

    fn on_matcap(&mut self, slot: TextureHandle, result: Result<MatcapImage, AssetError>) {
        let Some(image) = accept_matcap(slot, result) else {
            return;
        };
        match (&mut self.renderer, &self.device, &self.queue) {
            (Some(renderer), Some(device), Some(queue)) => {
                renderer.set_matcap(device, queue, slot, &image);
            }
            _ => self.pending_matcaps.push((slot, image)),
        }
    }

    fn redraw(&mut self) {
        let (
            Some(window),
            Some(surface),
            Some(device),
            Some(queue),
            Some(surface_config),
            Some(renderer),
            Some(egui_winit),
            Some(egui_renderer),
        ) = (
            &self.window,
            &self.surface,
            &self.device,
            &self.queue,
            &self.surface_config,
            &mut self.renderer,
            &mut self.egui_winit,
            &mut self.egui_renderer,
        )
        else {
            return;
        };

        let output = match surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(device, surface_config);
                window.request_redraw();
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                window.request_redraw();
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut frame = GpuFrame {
            renderer,
            device,
            queue,
            target: &view,
        };
        if self
            .frame_loop
            .tick(&mut self.ctx, &mut frame, &mut RedrawScheduler(window.as_ref()))
            .is_none()
        {
            return;
        }

        let raw_input = egui_winit.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, draw_debug_panel);
        egui_winit.handle_platform_output(window, full_output.platform_output);

        // The surface renders at the clamped ratio, not the native one.
        let pixels_per_point = self.ctx.viewport.pixel_ratio;
        let paint_jobs = self.egui_ctx.tessellate(full_output.shapes, pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [surface_config.width, surface_config.height],
            pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        egui_renderer.update_buffers(device, queue, &mut encoder, &paint_jobs, &screen_descriptor);
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
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        output.present();
    }
}

/// Debug panel. It has no widgets yet.
fn draw_debug_panel(ctx: &EguiContext) {
    egui::Window::new("Controls").show(ctx, |_ui| {});
}

impl ApplicationHandler<AppEvent> for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_gpu(event_loop) {
            tracing::error!("failed to create window or GPU surface: {e:#}");
            self.fatal = Some(e);
            event_loop.exit();
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::FontLoaded(result) => self.on_font(result),
            AppEvent::MatcapLoaded { slot, result } => self.on_matcap(slot, result),
        }
        self.tasks.retain(|task| !task.is_finished());
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                self.frame_loop.handle().stop();
                tracing::info!("closing after {} frames", self.frame_loop.frames());
                event_loop.exit();
            }
            WindowEvent::Resized(physical) => {
                let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                self.apply_resize(physical, scale);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(physical) = self.window.as_ref().map(|w| w.inner_size()) {
                    self.apply_resize(physical, scale_factor);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                let logical = position.to_logical::<f32>(scale);
                self.cursor = Vec2::new(logical.x, logical.y);
                self.ctx
                    .controls
                    .pointer_move(self.cursor, self.ctx.viewport.height);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => match state {
                ElementState::Pressed => self.ctx.controls.pointer_down(self.cursor),
                ElementState::Released => self.ctx.controls.pointer_up(),
            },
            WindowEvent::MouseWheel { delta, .. } => {
                let notches = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 50.0,
                };
                self.ctx.controls.wheel(notches);
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => DemoConfig::load(path)?,
        None => DemoConfig::default(),
    };
    let seed = config.resolve_seed(cli.seed);
    tracing::info!(
        "chora-desktop starting (assets {}, seed {seed})",
        cli.assets_dir.display()
    );

    let event_loop = EventLoop::<AppEvent>::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = GpuApp::new(
        config,
        AssetLoader::new(cli.assets_dir),
        event_loop.create_proxy(),
        seed,
    )?;
    app.start_loads()?;
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
