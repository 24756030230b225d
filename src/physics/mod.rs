//! Impulse-based 2D rigid-body space.
//!
//! Y axis points down, matching the scene coordinates: gravity is +y and
//! jumps are -y impulses. The space is stepped with a fixed dt only; frame
//! pacing lives in the game loop, not here.

pub mod body;
pub mod shape;
pub mod space;

pub use body::{BodyId, RigidBody};
pub use shape::Shape;
pub use space::Space;

#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    #[error("body {0:?} does not exist in this space")]
    BodyNotExist(BodyId),
}
