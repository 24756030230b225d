pub mod app;
pub mod assets;
pub mod ecs;
pub mod game;
pub mod gui;
pub mod input;
pub mod physics;
pub mod rendering;

pub const WINDOW_TITLE: &str = "Sandbox";
pub const DEFAULT_WINDOW_WIDTH: u32 = 1280;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 720;

/// Physics runs at 50 Hz regardless of the render frame rate.
pub const DEFAULT_PHYSICS_TIMESTEP: f32 = 1.0 / 50.0;
