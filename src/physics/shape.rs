use crate::game::math::{Rect2F, Vector2F};

/// Collision shape, positioned relative to its body's center of mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned box given by half extents.
    Box {
        half_extents: Vector2F,
        offset: Vector2F,
    },
    /// Thick line segment in world coordinates, for static geometry like
    /// the floor. Owning bodies are expected to sit at the origin.
    Segment {
        a: Vector2F,
        b: Vector2F,
        radius: f32,
    },
}

impl Shape {
    pub fn boxed(width: f32, height: f32) -> Self {
        Self::Box {
            half_extents: Vector2F::new(width / 2.0, height / 2.0),
            offset: Vector2F::zero(),
        }
    }

    pub fn segment(a: Vector2F, b: Vector2F, radius: f32) -> Self {
        Self::Segment { a, b, radius }
    }

    /// World-space bounding rect for a body placed at `body_position`.
    pub fn aabb(&self, body_position: Vector2F) -> Rect2F {
        match self {
            Shape::Box { half_extents, offset } => Rect2F::from_center(
                body_position + *offset,
                *half_extents * 2.0,
            ),
            Shape::Segment { a, b, radius } => {
                let min_x = a.x.min(b.x) - radius;
                let min_y = a.y.min(b.y) - radius;
                let max_x = a.x.max(b.x) + radius;
                let max_y = a.y.max(b.y) + radius;
                Rect2F::new(min_x, min_y, max_x - min_x, max_y - min_y)
            }
        }
    }
}

#[test]
fn test_box_aabb_follows_body() {
    let shape = Shape::boxed(10.0, 20.0);
    let aabb = shape.aabb(Vector2F::new(100.0, 50.0));
    assert_eq!(aabb.pos, Vector2F::new(95.0, 40.0));
    assert_eq!(aabb.size, Vector2F::new(10.0, 20.0));
}

#[test]
fn test_segment_aabb_spans_endpoints() {
    let shape = Shape::segment(Vector2F::new(0.0, 720.0), Vector2F::new(100.0, 720.0), 1.0);
    let aabb = shape.aabb(Vector2F::zero());
    assert_eq!(aabb.pos, Vector2F::new(-1.0, 719.0));
    assert_eq!(aabb.size, Vector2F::new(102.0, 2.0));
}
