//! Application window and event loop management.

use std::sync::Arc;

use cardioscope_core::{MeshDataset, MeshId, ViewerConfig};
use cardioscope_io::{DatasetLoader, FileLoader, LoadResult};
use cardioscope_render::{Display, RenderEngine};
use pollster::FutureExt;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::error::{Result, ViewerError};
use crate::state::LoadRequest;
use crate::ui::{key_to_event, UiAction};
use crate::viewer::Viewer;
use crate::xr::UnavailableXr;

/// Radians of orbit per pixel of mouse drag.
const ORBIT_SPEED: f32 = 0.01;

/// Events sent to the event loop from outside the window system.
#[derive(Debug)]
pub enum AppEvent {
    /// A worker thread finished a load.
    Loaded {
        ticket: crate::state::LoadTicket,
        result: LoadResult<MeshDataset>,
    },
}

/// The windowed viewer.
pub struct App {
    config: Option<ViewerConfig>,
    startup_mesh: MeshId,
    loader: FileLoader,
    proxy: EventLoopProxy<AppEvent>,
    window: Option<Arc<Window>>,
    viewer: Option<Viewer<RenderEngine>>,
    error: Option<ViewerError>,
    close_requested: bool,
    mouse_pos: (f64, f64),
    left_mouse_down: bool,
}

impl App {
    fn new(config: ViewerConfig, startup_mesh: MeshId, proxy: EventLoopProxy<AppEvent>) -> Self {
        Self {
            loader: FileLoader::new(config.base_dir.clone()),
            config: Some(config),
            startup_mesh,
            proxy,
            window: None,
            viewer: None,
            error: None,
            close_requested: false,
            mouse_pos: (0.0, 0.0),
            left_mouse_down: false,
        }
    }

    /// Runs a load on a worker thread. The result comes back as
    /// [`AppEvent::Loaded`].
    fn spawn_load(&self, request: LoadRequest) {
        let loader = self.loader.clone();
        let proxy = self.proxy.clone();
        std::thread::spawn(move || {
            let result = loader.load(&request.location).block_on();
            if proxy
                .send_event(AppEvent::Loaded {
                    ticket: request.ticket,
                    result,
                })
                .is_err()
            {
                log::debug!("event loop closed before load of {} finished", request.location);
            }
        });
    }

    fn create_viewer(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let Some(config) = self.config.take() else {
            return Ok(());
        };

        let window_attributes = Window::default_attributes()
            .with_title(config.window.title.clone())
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let engine = RenderEngine::new_windowed(window.clone()).block_on()?;
        let mut viewer = Viewer::new(config, engine, Box::new(UnavailableXr));

        log::info!("Loading data...");
        let request = viewer.begin_load(self.startup_mesh, true);
        self.spawn_load(request);

        self.window = Some(window);
        self.viewer = Some(viewer);
        self.update_title();
        Ok(())
    }

    fn update_title(&self) {
        if let (Some(window), Some(viewer)) = (&self.window, &self.viewer) {
            let mesh = viewer
                .state()
                .current_mesh
                .map_or_else(|| "loading".to_string(), |id| format!("mesh {id}"));
            window.set_title(&format!(
                "{} - {mesh} - [V] {}",
                viewer.config().window.title,
                viewer.vr_button_label()
            ));
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        if code == KeyCode::Escape {
            self.close_requested = true;
            return;
        }
        let Some(viewer) = &mut self.viewer else {
            return;
        };
        let Some(event) = key_to_event(code, viewer.opacity_step()) else {
            return;
        };
        log::debug!("ui event: {event:?}");
        if let UiAction::Load(request) = viewer.handle_event(event) {
            self.spawn_load(request);
        }
        self.update_title();
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_viewer(event_loop) {
            log::error!("failed to start viewer: {e}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::Loaded { ticket, result } => {
                if let Some(viewer) = &mut self.viewer {
                    let outcome = viewer.complete_load(ticket, result);
                    log::debug!("load #{} finished: {outcome:?}", ticket.generation);
                }
                self.update_title();
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
                self.close_requested = true;
            }
            WindowEvent::Resized(size) => {
                if let Some(viewer) = &mut self.viewer {
                    viewer.display_mut().resize(size.width, size.height);
                }
                self.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                if let Some(viewer) = &mut self.viewer {
                    viewer.display_mut().render();
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.left_mouse_down = state == ElementState::Pressed;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let delta_x = position.x - self.mouse_pos.0;
                let delta_y = position.y - self.mouse_pos.1;
                self.mouse_pos = (position.x, position.y);

                if self.left_mouse_down {
                    if let Some(viewer) = &mut self.viewer {
                        viewer
                            .display_mut()
                            .camera
                            .orbit(delta_x as f32 * ORBIT_SPEED, delta_y as f32 * ORBIT_SPEED);
                    }
                    self.request_redraw();
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(viewer) = &mut self.viewer {
                    let scroll = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                    };
                    let camera = &mut viewer.display_mut().camera;
                    let scale = camera.position.distance(camera.target) * 0.1;
                    camera.zoom(scroll * scale);
                }
                self.request_redraw();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        self.handle_key(code);
                    }
                }
            }
            _ => {}
        }

        if self.close_requested {
            event_loop.exit();
        }
    }
}

/// Opens the viewer window and blocks until it is closed.
pub fn run(config: ViewerConfig, startup_mesh: MeshId) -> Result<()> {
    let event_loop = EventLoop::<AppEvent>::with_user_event().build()?;
    let mut app = App::new(config, startup_mesh, event_loop.create_proxy());
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
