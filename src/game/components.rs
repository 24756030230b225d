use std::sync::Arc;

use crate::assets::ModelAsset;
use crate::game::math::Vector2F;
use crate::physics::BodyId;

/// Presentation-side pose. For physics-backed entities this is a downstream
/// mirror of the body, refreshed once per frame after the physics steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub position: Vector2F,
    /// Degrees, to keep the inspector readable.
    pub rotation: f32,
    pub scale: Vector2F,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: Vector2F::zero(),
            rotation: 0.0,
            scale: Vector2F::new(1.0, 1.0),
        }
    }

    pub fn with_position(position: Vector2F) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }

    pub fn translate(&mut self, offset: Vector2F) {
        self.position += offset;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// What an entity looks like. No texture pipeline here - sprites are flat
/// colored quads, models are shared lists of colored rects.
#[derive(Debug, Clone)]
pub enum Drawable {
    Sprite {
        size: Vector2F,
        /// Normalized anchor inside the quad, (0.5, 0.5) is centered.
        origin: Vector2F,
        color: [f32; 3],
    },
    Model(Arc<ModelAsset>),
}

#[derive(Debug, Clone)]
pub struct GraphicsComponent {
    pub drawable: Drawable,
}

impl GraphicsComponent {
    pub fn sprite(size: Vector2F, color: [f32; 3]) -> Self {
        Self {
            drawable: Drawable::Sprite {
                size,
                origin: Vector2F::new(0.5, 0.5),
                color,
            },
        }
    }

    pub fn model(model: Arc<ModelAsset>) -> Self {
        Self {
            drawable: Drawable::Model(model),
        }
    }
}

/// Ownership of exactly one body in the physics space.
#[derive(Debug, Clone, Copy)]
pub struct RigidBodyComponent {
    pub body: BodyId,
}

/// Per-frame movement intents, written by the player input system.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputComponent {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Tags the entity the player steers.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlayerControlled;

#[derive(Debug, Clone, Copy)]
pub struct CameraComponent {
    /// World-to-screen zoom, adjusted with the mouse wheel.
    pub zoom: f32,
}

impl Default for CameraComponent {
    fn default() -> Self {
        Self { zoom: 1.0 }
    }
}

/// Plain kinematic velocity for entities outside the physics space.
#[derive(Debug, Default, Clone, Copy)]
pub struct VelocityComponent {
    pub linear: Vector2F,
}

#[test]
fn test_transform_defaults() {
    let transform = Transform::new();
    assert_eq!(transform.position, Vector2F::zero());
    assert_eq!(transform.rotation, 0.0);
    assert_eq!(transform.scale, Vector2F::new(1.0, 1.0));
}

#[test]
fn test_transform_translate() {
    let mut transform = Transform::with_position(Vector2F::new(10.0, 20.0));
    transform.translate(Vector2F::new(-5.0, 5.0));
    assert_eq!(transform.position, Vector2F::new(5.0, 25.0));
}
