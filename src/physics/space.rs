use crate::game::math::Vector2F;

use super::{BodyId, PhysicsError, RigidBody, Shape};

/// Simulated rigid-body space. Bodies live in slots so handles stay stable
/// across removals.
pub struct Space {
    pub gravity: Vector2F,
    bodies: Vec<Option<RigidBody>>,
}

/// Contact between bodies `a` and `b`, normal pointing from `a` to `b`.
#[derive(Debug, Clone, Copy)]
struct Contact {
    a: usize,
    b: usize,
    normal: Vector2F,
    penetration: f32,
}

/// Allowed resting penetration before the position solver kicks in.
const PENETRATION_SLOP: f32 = 0.05;
/// Share of the remaining penetration corrected per step.
const CORRECTION_PERCENT: f32 = 0.8;

impl Space {
    pub fn new() -> Self {
        // Y-down world: things fall towards larger y
        Self::with_gravity(Vector2F::new(0.0, 981.0))
    }

    pub fn with_gravity(gravity: Vector2F) -> Self {
        log::info!("Physics space created, gravity {gravity}");
        Self {
            gravity,
            bodies: Vec::new(),
        }
    }

    pub fn add_body(&mut self, body: RigidBody) -> BodyId {
        for (index, slot) in self.bodies.iter_mut().enumerate() {
            if slot.is_none() {
                *slot = Some(body);
                return BodyId(index);
            }
        }
        self.bodies.push(Some(body));
        BodyId(self.bodies.len() - 1)
    }

    pub fn remove_body(&mut self, id: BodyId) -> Result<RigidBody, PhysicsError> {
        self.bodies
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(PhysicsError::BodyNotExist(id))
    }

    pub fn body(&self, id: BodyId) -> Result<&RigidBody, PhysicsError> {
        self.bodies
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(PhysicsError::BodyNotExist(id))
    }

    pub fn body_mut(&mut self, id: BodyId) -> Result<&mut RigidBody, PhysicsError> {
        self.bodies
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(PhysicsError::BodyNotExist(id))
    }

    pub fn attach_shape(&mut self, id: BodyId, shape: Shape) -> Result<(), PhysicsError> {
        self.body_mut(id)?.add_shape(shape);
        Ok(())
    }

    pub fn body_count(&self) -> usize {
        self.bodies.iter().filter(|slot| slot.is_some()).count()
    }

    /// Advances the simulation by exactly `dt`. Callers drive this with a
    /// fixed dt; identical step sequences give identical trajectories.
    pub fn step(&mut self, dt: f32) {
        for slot in self.bodies.iter_mut() {
            let Some(body) = slot else { continue };
            if body.is_static() {
                continue;
            }
            let gravity = self.gravity;
            body.velocity += gravity * dt;
            body.position += body.velocity * dt;
            body.angle += body.angular_velocity * dt;
        }

        let contacts = self.find_contacts();
        log::trace!("Physics step dt={dt}, contacts: {}", contacts.len());
        for contact in contacts {
            self.resolve(contact);
        }
    }

    fn find_contacts(&self) -> Vec<Contact> {
        let mut contacts = Vec::new();
        for ia in 0..self.bodies.len() {
            let Some(body_a) = self.bodies[ia].as_ref() else { continue };
            for ib in (ia + 1)..self.bodies.len() {
                let Some(body_b) = self.bodies[ib].as_ref() else { continue };
                if body_a.is_static() && body_b.is_static() {
                    continue;
                }

                for shape_a in body_a.shapes() {
                    for shape_b in body_b.shapes() {
                        let aabb_a = shape_a.aabb(body_a.position);
                        let aabb_b = shape_b.aabb(body_b.position);
                        if !aabb_a.overlaps(&aabb_b) {
                            continue;
                        }
                        if let Some((normal, penetration)) = collide(
                            shape_a,
                            body_a.position,
                            shape_b,
                            body_b.position,
                        ) {
                            contacts.push(Contact {
                                a: ia,
                                b: ib,
                                normal,
                                penetration,
                            });
                        }
                    }
                }
            }
        }
        contacts
    }

    fn resolve(&mut self, contact: Contact) {
        let (body_a, body_b) = match pair_mut(&mut self.bodies, contact.a, contact.b) {
            Some(pair) => pair,
            None => return,
        };

        let inv_mass_sum = body_a.inv_mass() + body_b.inv_mass();
        if inv_mass_sum == 0.0 {
            return;
        }

        let normal = contact.normal;
        let relative = body_b.velocity - body_a.velocity;
        let approach = relative.dot(normal);

        // Impulses only for approaching pairs, separating ones sort
        // themselves out
        if approach < 0.0 {
            let restitution = body_a.restitution.min(body_b.restitution);
            let j = -(1.0 + restitution) * approach / inv_mass_sum;
            let impulse = normal * j;
            body_a.velocity -= impulse * body_a.inv_mass();
            body_b.velocity += impulse * body_b.inv_mass();

            // Coulomb friction along the contact tangent, clamped by the
            // normal impulse
            let relative = body_b.velocity - body_a.velocity;
            let tangent = relative - normal * relative.dot(normal);
            if tangent.length() > f32::EPSILON {
                let tangent = tangent.normal();
                let jt = -relative.dot(tangent) / inv_mass_sum;
                let mu = (body_a.friction * body_b.friction).sqrt();
                let jt = jt.clamp(-j * mu, j * mu);
                let friction_impulse = tangent * jt;
                body_a.velocity -= friction_impulse * body_a.inv_mass();
                body_b.velocity += friction_impulse * body_b.inv_mass();
            }
        }

        // Positional correction keeps stacked bodies from sinking
        let depth = (contact.penetration - PENETRATION_SLOP).max(0.0);
        let correction = normal * (CORRECTION_PERCENT * depth / inv_mass_sum);
        body_a.position -= correction * body_a.inv_mass();
        body_b.position += correction * body_b.inv_mass();
    }
}

impl Default for Space {
    fn default() -> Self {
        Self::new()
    }
}

fn pair_mut(
    bodies: &mut [Option<RigidBody>],
    a: usize,
    b: usize,
) -> Option<(&mut RigidBody, &mut RigidBody)> {
    debug_assert!(a < b);
    let (head, tail) = bodies.split_at_mut(b);
    match (head[a].as_mut(), tail[0].as_mut()) {
        (Some(body_a), Some(body_b)) => Some((body_a, body_b)),
        _ => None,
    }
}

/// Narrow phase. Returns (normal from a to b, penetration depth).
fn collide(
    shape_a: &Shape,
    pos_a: Vector2F,
    shape_b: &Shape,
    pos_b: Vector2F,
) -> Option<(Vector2F, f32)> {
    match (shape_a, shape_b) {
        (
            Shape::Box { half_extents: half_a, offset: offset_a },
            Shape::Box { half_extents: half_b, offset: offset_b },
        ) => collide_boxes(pos_a + *offset_a, *half_a, pos_b + *offset_b, *half_b),
        (
            Shape::Box { half_extents, offset },
            Shape::Segment { a, b, radius },
        ) => collide_box_segment(pos_a + *offset, *half_extents, *a, *b, *radius),
        (
            Shape::Segment { a, b, radius },
            Shape::Box { half_extents, offset },
        ) => collide_box_segment(pos_b + *offset, *half_extents, *a, *b, *radius)
            .map(|(normal, penetration)| (-normal, penetration)),
        // Segments are static-only geometry, they never collide with each other
        (Shape::Segment { .. }, Shape::Segment { .. }) => None,
    }
}

fn collide_boxes(
    center_a: Vector2F,
    half_a: Vector2F,
    center_b: Vector2F,
    half_b: Vector2F,
) -> Option<(Vector2F, f32)> {
    let delta = center_b - center_a;
    let overlap_x = (half_a.x + half_b.x) - delta.x.abs();
    if overlap_x <= 0.0 {
        return None;
    }
    let overlap_y = (half_a.y + half_b.y) - delta.y.abs();
    if overlap_y <= 0.0 {
        return None;
    }

    // Push out along the axis of least penetration
    if overlap_x < overlap_y {
        let sign = if delta.x >= 0.0 { 1.0 } else { -1.0 };
        Some((Vector2F::new(sign, 0.0), overlap_x))
    } else {
        let sign = if delta.y >= 0.0 { 1.0 } else { -1.0 };
        Some((Vector2F::new(0.0, sign), overlap_y))
    }
}

/// Box vs thick segment; the returned normal points from the box towards
/// the segment.
fn collide_box_segment(
    center: Vector2F,
    half_extents: Vector2F,
    a: Vector2F,
    b: Vector2F,
    radius: f32,
) -> Option<(Vector2F, f32)> {
    let ab = b - a;
    let ab_len_sq = ab.length_squared();
    let t = if ab_len_sq > 0.0 {
        ((center - a).dot(ab) / ab_len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let closest = a + ab * t;

    let delta = center - closest;
    let distance = delta.length();
    let towards_box = if distance > f32::EPSILON {
        delta / distance
    } else {
        // Box center sits exactly on the segment, push it up (y-down world)
        Vector2F::new(0.0, -1.0)
    };

    // Box support extent along the contact direction
    let support = towards_box.x.abs() * half_extents.x + towards_box.y.abs() * half_extents.y;
    let penetration = support + radius - distance;
    if penetration <= 0.0 {
        return None;
    }

    Some((-towards_box, penetration))
}

#[cfg(test)]
const TEST_DT: f32 = 1.0 / 50.0;

#[test]
fn test_free_fall_accelerates_downwards() {
    let mut space = Space::new();
    let id = space.add_body(RigidBody::dynamic(10.0));
    space.body_mut(id).unwrap().position = Vector2F::new(0.0, 100.0);

    let mut last_y = 100.0;
    let mut last_vy = 0.0;
    for _ in 0..10 {
        space.step(TEST_DT);
        let body = space.body(id).unwrap();
        assert!(body.position.y > last_y, "body should keep falling (+y)");
        assert!(body.velocity.y > last_vy, "fall should accelerate");
        last_y = body.position.y;
        last_vy = body.velocity.y;
    }
}

#[test]
fn test_static_body_never_moves() {
    let mut space = Space::new();
    let id = space.add_body(RigidBody::fixed());
    space.body_mut(id).unwrap().position = Vector2F::new(50.0, 50.0);

    for _ in 0..100 {
        space.step(TEST_DT);
    }
    assert_eq!(space.body(id).unwrap().position, Vector2F::new(50.0, 50.0));
}

#[test]
fn test_box_lands_on_segment_floor() {
    let mut space = Space::new();

    let floor = space.add_body(RigidBody::fixed());
    space
        .attach_shape(
            floor,
            Shape::segment(Vector2F::new(-1000.0, 720.0), Vector2F::new(1000.0, 720.0), 0.0),
        )
        .unwrap();

    let falling = space.add_body(RigidBody::dynamic(300.0));
    space.attach_shape(falling, Shape::boxed(100.0, 100.0)).unwrap();
    space.body_mut(falling).unwrap().position = Vector2F::new(0.0, 400.0);

    // 5 simulated seconds is plenty to fall 270 units and settle
    for _ in 0..250 {
        space.step(TEST_DT);
    }

    let body = space.body(falling).unwrap();
    let resting_y = 720.0 - 50.0;
    assert!(
        (body.position.y - resting_y).abs() < 2.0,
        "box should rest on the floor, got y={}",
        body.position.y
    );
    assert!(body.velocity.y.abs() < 25.0, "vertical speed should be damped out");
}

#[test]
fn test_stacked_boxes_separate() {
    let mut space = Space::with_gravity(Vector2F::zero());

    let a = space.add_body(RigidBody::dynamic(10.0));
    space.attach_shape(a, Shape::boxed(100.0, 100.0)).unwrap();
    let b = space.add_body(RigidBody::dynamic(10.0));
    space.attach_shape(b, Shape::boxed(100.0, 100.0)).unwrap();

    // Deep horizontal overlap
    space.body_mut(a).unwrap().position = Vector2F::new(0.0, 0.0);
    space.body_mut(b).unwrap().position = Vector2F::new(40.0, 0.0);

    for _ in 0..100 {
        space.step(TEST_DT);
    }

    let ax = space.body(a).unwrap().position.x;
    let bx = space.body(b).unwrap().position.x;
    assert!(bx - ax > 95.0, "boxes should be pushed apart, gap {}", bx - ax);
}

#[test]
fn test_fixed_step_trajectories_are_deterministic() {
    let build = || {
        let mut space = Space::new();
        let id = space.add_body(RigidBody::dynamic(80.0));
        space.attach_shape(id, Shape::boxed(128.0, 256.0)).unwrap();
        space.body_mut(id).unwrap().position = Vector2F::new(100.0, 100.0);
        space.body_mut(id).unwrap().velocity = Vector2F::new(500.0, -200.0);
        (space, id)
    };

    let (mut space_a, id_a) = build();
    let (mut space_b, id_b) = build();

    for _ in 0..500 {
        space_a.step(TEST_DT);
        space_b.step(TEST_DT);
    }

    assert_eq!(
        space_a.body(id_a).unwrap().position,
        space_b.body(id_b).unwrap().position
    );
    assert_eq!(
        space_a.body(id_a).unwrap().velocity,
        space_b.body(id_b).unwrap().velocity
    );
}

#[test]
fn test_removed_body_slot_is_reused() {
    let mut space = Space::new();
    let a = space.add_body(RigidBody::dynamic(1.0));
    let b = space.add_body(RigidBody::dynamic(1.0));
    assert_eq!(space.body_count(), 2);

    space.remove_body(a).unwrap();
    assert!(space.body(a).is_err());
    assert_eq!(space.body_count(), 1);

    let c = space.add_body(RigidBody::dynamic(1.0));
    assert_eq!(c, a, "freed slot should be reused");
    assert!(space.body(b).is_ok());
}
