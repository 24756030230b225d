//! Window lifecycle and the per-frame driver around [`Game`].

use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler, dpi::LogicalSize, event::WindowEvent, event_loop::{
        ActiveEventLoop,
        ControlFlow,
        EventLoop
    }, window::{
        Window,
        WindowId
    }
};

use crate::game::components::{
    CameraComponent,
    Transform
};
use crate::game::systems;
use crate::game::Game;
use crate::gui::EntityInspector;
use crate::rendering::Renderer;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub physics_timestep: f32,
    pub start_with_overlay: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_width: crate::DEFAULT_WINDOW_WIDTH,
            window_height: crate::DEFAULT_WINDOW_HEIGHT,
            physics_timestep: crate::DEFAULT_PHYSICS_TIMESTEP,
            start_with_overlay: false,
        }
    }
}

struct App {
    config: AppConfig,
    game: Game,
    inspector: EntityInspector,
    renderer: Option<Renderer>,
    last_frame: Option<Instant>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let game = Game::new(config.physics_timestep);
        let mut inspector = EntityInspector::new();
        if config.start_with_overlay {
            inspector.toggle();
        }
        Self {
            config,
            game,
            inspector,
            renderer: None,
            last_frame: None,
        }
    }

    fn redraw(&mut self) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        let now = Instant::now();
        let dt = self
            .last_frame
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);

        // Checked before update() so the press edge is still visible
        if self.game.input.just_pressed("ToggleOverlay") {
            self.inspector.toggle();
        }

        self.game.update(dt);

        renderer.batch_clear();
        let camera_position = self
            .game
            .registry
            .get_component::<Transform>(self.game.handles.camera)
            .map(|transform| transform.position)
            .unwrap_or_default();
        let camera_zoom = self
            .game
            .registry
            .get_component::<CameraComponent>(self.game.handles.camera)
            .map(|camera| camera.zoom)
            .unwrap_or(1.0);
        renderer.batch_set_camera(camera_position, camera_zoom);

        for view in systems::collect_entity_views(&self.game.registry) {
            renderer.batch_append_entity(view);
        }
        for element in self
            .inspector
            .build(&self.game.registry, &self.game.space, &self.game.handles)
        {
            renderer.batch_append_gui_element(element);
        }

        renderer.render();
        renderer.get_window().request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes()
            .with_title(crate::WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let renderer = pollster::block_on(Renderer::new(window.clone()));
        self.renderer = Some(renderer);
        self.last_frame = Some(Instant::now());

        window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, stopping");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            WindowEvent::Resized(size) => {
                // No re-render here, this event is always followed up by
                // a redraw request.
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size);
                }
            }
            WindowEvent::MouseWheel {
                device_id: _,
                delta,
                phase: _
            } => {
                let scroll_sensitivity: f32 = 0.1;
                match delta {
                    winit::event::MouseScrollDelta::LineDelta(_, y) => {
                        // y is +-1
                        self.game.zoom_camera((1.0 + scroll_sensitivity).powf(y));
                    }
                    winit::event::MouseScrollDelta::PixelDelta(position) => {
                        let y = position.y as f32 / 40.0;
                        self.game.zoom_camera((1.0 + scroll_sensitivity).powf(y));
                    }
                }
            }
            WindowEvent::KeyboardInput { device_id: _, event, is_synthetic: _ } => {
                self.game.input.handle_key_event(&event);
            }
            _ => (),
        }
    }
}

pub fn run(config: AppConfig) -> Result<(), winit::error::EventLoopError> {
    let event_loop = EventLoop::new()?;

    // New loop iterations start immediately whether or not events are
    // pending, so the sandbox renders as fast as the surface allows.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)
}
