//! Simulation state and the fixed-timestep update loop.

pub mod components;
pub mod math;
pub mod scene;
pub mod spritesheet;
pub mod systems;

use crate::assets::ResourceManager;
use crate::ecs::Registry;
use crate::game::components::CameraComponent;
use crate::game::scene::SceneHandles;
use crate::input::InputMap;
use crate::physics::Space;

/// Frames longer than this are clamped before feeding the accumulator,
/// so a stall cannot queue an unbounded number of physics steps.
const MAX_FRAME_TIME: f32 = 0.25;

pub struct Game {
    pub registry: Registry,
    pub space: Space,
    pub input: InputMap,
    pub assets: ResourceManager,
    pub handles: SceneHandles,
    accumulator: f32,
    physics_timestep: f32,
}

impl Game {
    pub fn new(physics_timestep: f32) -> Self {
        let mut registry = Registry::new();
        let mut space = Space::new();
        let mut assets = ResourceManager::new();
        let handles = scene::setup(&mut registry, &mut space, &mut assets);

        Self {
            registry,
            space,
            input: InputMap::with_sandbox_bindings(),
            assets,
            handles,
            accumulator: 0.0,
            physics_timestep,
        }
    }

    pub fn physics_timestep(&self) -> f32 {
        self.physics_timestep
    }

    /// Advances the sandbox by one rendered frame. Physics runs in fixed
    /// steps drained from an accumulator, everything else once per frame
    /// with the raw delta. Returns how many physics steps ran.
    pub fn update(&mut self, dt: f32) -> u32 {
        let dt = if dt > MAX_FRAME_TIME {
            log::warn!("Frame took {dt:.3}s, clamping to {MAX_FRAME_TIME}s");
            MAX_FRAME_TIME
        } else {
            dt
        };

        systems::player_input_system(&mut self.registry, &self.input);

        let mut steps = 0;
        self.accumulator += dt;
        while self.accumulator >= self.physics_timestep {
            systems::player_controller_system(&mut self.registry, &mut self.space);
            self.space.step(self.physics_timestep);
            self.accumulator -= self.physics_timestep;
            steps += 1;
        }

        systems::physics_sync_system(&mut self.registry, &self.space);
        systems::player_animation_system(&mut self.registry, &self.input, &self.space);
        systems::animation_system(&mut self.registry, dt);
        systems::camera_system(&mut self.registry, &self.input, dt);
        systems::velocity_system(&mut self.registry, dt);

        self.input.end_frame();
        steps
    }

    pub fn zoom_camera(&mut self, factor: f32) {
        if let Some(camera) = self
            .registry
            .get_component_mut::<CameraComponent>(self.handles.camera)
        {
            camera.zoom = (camera.zoom * factor).clamp(0.1, 10.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_PHYSICS_TIMESTEP;

    #[test]
    fn test_update_drains_accumulator_in_fixed_steps() {
        let mut game = Game::new(DEFAULT_PHYSICS_TIMESTEP);
        assert_eq!(game.update(DEFAULT_PHYSICS_TIMESTEP * 3.0), 3);
        assert_eq!(game.update(DEFAULT_PHYSICS_TIMESTEP * 0.5), 0);
        assert_eq!(game.update(DEFAULT_PHYSICS_TIMESTEP * 0.5), 1);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut game = Game::new(DEFAULT_PHYSICS_TIMESTEP);
        let steps = game.update(10.0);
        assert!(steps as f32 * DEFAULT_PHYSICS_TIMESTEP <= MAX_FRAME_TIME);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut game = Game::new(DEFAULT_PHYSICS_TIMESTEP);
        for _ in 0..100 {
            game.zoom_camera(1.5);
        }
        let camera = game
            .registry
            .get_component::<CameraComponent>(game.handles.camera)
            .unwrap();
        assert_eq!(camera.zoom, 10.0);
    }
}
