//! Window creation and event handling via winit.
//!
//! [`OrreryApp`] implements winit's [`ApplicationHandler`]: it owns the
//! window, GPU context, scene state and input controller, and drives one
//! animation step and one render per `RedrawRequested`.

use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use orrery_config::Config;
use orrery_input::{CameraController, RawKeyEvent, is_pause_toggle};
use orrery_render::{RenderContext, SurfaceError, init_render_context_blocking};
use orrery_scene::{AnimationClock, BodyId, SceneState, build_draw_plan};
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::assets::TextureLoader;
use crate::error::AppError;
use crate::renderer::SceneRenderer;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let clock = AnimationClock::new(config.scene.start_paused);
    WindowAttributes::default()
        .with_title(window_title(&config.window.title, &clock))
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// The title doubles as the pause control's label: it names the action the
/// pause key will take.
pub fn window_title(base: &str, clock: &AnimationClock) -> String {
    format!("{base} - {}", clock.action_label())
}

/// GPU-side state that exists once the window does.
struct Graphics {
    window: Arc<Window>,
    gpu: RenderContext,
    renderer: SceneRenderer,
}

pub struct OrreryApp {
    config: Config,
    scene: SceneState,
    controller: CameraController,
    loader: TextureLoader,
    graphics: Option<Graphics>,
    fatal: Option<AppError>,
}

impl OrreryApp {
    pub fn new(config: Config) -> Self {
        Self {
            scene: SceneState::new(&config.scene),
            controller: CameraController::new(config.input.clone()),
            loader: TextureLoader::new(config.assets.decode_workers),
            graphics: None,
            fatal: None,
            config,
        }
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    fn init_graphics(&self, event_loop: &ActiveEventLoop) -> Result<Graphics, AppError> {
        let attrs = window_attributes_from_config(&self.config);
        let window = Arc::new(event_loop.create_window(attrs)?);
        let gpu = init_render_context_blocking(window.clone(), self.config.window.vsync)?;
        info!(
            adapter = %gpu.adapter.get_info().name,
            format = ?gpu.surface_format,
            "GPU initialized"
        );
        let renderer = SceneRenderer::new(&gpu, &self.config.render, &self.scene.bodies)?;
        Ok(Graphics {
            window,
            gpu,
            renderer,
        })
    }

    fn request_textures(&mut self) {
        let dir = &self.config.assets.texture_dir;
        for id in BodyId::ALL {
            let path = dir.join(id.texture_file());
            if !self.loader.request(id.name(), path) {
                warn!(body = %id, "Texture loader is shut down");
            }
        }
        debug!(pending = self.loader.pending(), dir = %dir.display(), "Texture decodes queued");
    }

    fn resize(&mut self, width: u32, height: u32) {
        let Some(graphics) = &mut self.graphics else {
            return;
        };
        graphics.gpu.resize(width, height);
        let (width, height) = graphics.gpu.size();
        graphics.renderer.resize(&graphics.gpu.device, width, height);
        self.controller.set_viewport(width, height);
        debug!(width, height, "Surface resized");
    }

    fn update_title(&self) {
        if let Some(graphics) = &self.graphics {
            graphics
                .window
                .set_title(&window_title(&self.config.window.title, &self.scene.clock));
        }
    }

    /// Swap in every texture that finished decoding since the last frame.
    fn apply_decoded_textures(&mut self) {
        let Some(graphics) = &mut self.graphics else {
            return;
        };
        for result in self.loader.drain() {
            match result.texture {
                Ok(texture) => {
                    if let Err(e) = graphics
                        .renderer
                        .apply_texture(&graphics.gpu, &result.key, &texture)
                    {
                        warn!(key = %result.key, "Texture upload rejected: {e}");
                    }
                }
                Err(e) => warn!(key = %result.key, "Keeping placeholder texture: {e}"),
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.apply_decoded_textures();
        self.scene.advance(Instant::now());
        let plan = build_draw_plan(&self.scene);

        let Some(graphics) = &mut self.graphics else {
            return;
        };
        match graphics.renderer.render(&graphics.gpu, &plan) {
            Ok(()) => {}
            Err(SurfaceError::Timeout) => debug!("Surface timeout, skipping frame"),
            Err(SurfaceError::Lost) => {
                warn!("Surface lost, reconfiguring");
                let size = graphics.window.inner_size();
                self.resize(size.width, size.height);
            }
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory, shutting down");
                event_loop.exit();
            }
        }
    }
}

impl ApplicationHandler for OrreryApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }
        match self.init_graphics(event_loop) {
            Ok(graphics) => {
                let size = graphics.window.inner_size();
                graphics.window.request_redraw();
                self.graphics = Some(graphics);
                self.resize(size.width, size.height);
                self.request_textures();
            }
            Err(e) => {
                error!("Startup failed: {e}");
                self.fatal = Some(e);
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
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(size) = self.graphics.as_ref().map(|g| g.window.inner_size()) {
                    debug!(scale_factor, "Scale factor changed");
                    self.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if is_pause_toggle(RawKeyEvent::from(&event)) {
                    self.scene.toggle_pause();
                    self.update_title();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                self.controller
                    .on_cursor_moved(position, &mut self.scene.camera);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.controller.on_mouse_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.controller.on_wheel(delta, &mut self.scene.camera);
            }
            WindowEvent::Touch(touch) => {
                let position = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                self.controller.on_touch(
                    touch.id,
                    touch.phase,
                    position,
                    Instant::now(),
                    &mut self.scene.camera,
                );
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(graphics) = &self.graphics {
                    graphics.window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Creates an event loop and runs the viewer until the window closes.
#[instrument(skip_all)]
pub fn run(config: Config) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = OrreryApp::new(config);
    event_loop.run_app(&mut app)?;
    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
