use crate::game::math::Vector2F;

use super::Shape;

/// Handle to a body slot inside a [`super::Space`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub(crate) usize);

#[derive(Debug, Clone)]
pub struct RigidBody {
    pub position: Vector2F,
    pub velocity: Vector2F,
    /// Radians, mirrored into the owning entity's transform once per frame.
    pub angle: f32,
    pub angular_velocity: f32,
    pub restitution: f32,
    pub friction: f32,
    mass: f32,
    inv_mass: f32,
    shapes: Vec<Shape>,
}

const DEFAULT_FRICTION: f32 = 0.7;

impl RigidBody {
    pub fn dynamic(mass: f32) -> Self {
        assert!(mass > 0.0, "dynamic body needs positive mass");
        Self {
            position: Vector2F::zero(),
            velocity: Vector2F::zero(),
            angle: 0.0,
            angular_velocity: 0.0,
            restitution: 0.0,
            friction: DEFAULT_FRICTION,
            mass,
            inv_mass: 1.0 / mass,
            shapes: Vec::new(),
        }
    }

    /// Infinite mass, never moved by the solver.
    pub fn fixed() -> Self {
        Self {
            position: Vector2F::zero(),
            velocity: Vector2F::zero(),
            angle: 0.0,
            angular_velocity: 0.0,
            restitution: 0.0,
            friction: DEFAULT_FRICTION,
            mass: f32::INFINITY,
            inv_mass: 0.0,
            shapes: Vec::new(),
        }
    }

    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Instant momentum change at the center of mass.
    pub fn apply_impulse(&mut self, impulse: Vector2F) {
        self.velocity += impulse * self.inv_mass;
    }
}

#[test]
fn test_impulse_scales_with_mass() {
    let mut light = RigidBody::dynamic(10.0);
    let mut heavy = RigidBody::dynamic(100.0);

    light.apply_impulse(Vector2F::new(0.0, -100.0));
    heavy.apply_impulse(Vector2F::new(0.0, -100.0));

    assert_eq!(light.velocity, Vector2F::new(0.0, -10.0));
    assert_eq!(heavy.velocity, Vector2F::new(0.0, -1.0));
}

#[test]
fn test_static_body_ignores_impulses() {
    let mut floor = RigidBody::fixed();
    floor.apply_impulse(Vector2F::new(1000.0, 1000.0));
    assert_eq!(floor.velocity, Vector2F::zero());
    assert!(floor.is_static());
}
