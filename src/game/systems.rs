//! Per-frame and per-step systems running over the registry.

use crate::ecs::Registry;
use crate::game::components::{
    CameraComponent,
    Drawable,
    GraphicsComponent,
    InputComponent,
    PlayerControlled,
    RigidBodyComponent,
    Transform,
    VelocityComponent
};
use crate::game::math::{
    Rect2F,
    Vector2F
};
use crate::game::spritesheet::SpritesheetComponent;
use crate::input::InputMap;
use crate::physics::Space;
use crate::rendering::EntityView;

/// Horizontal run speed of the player body in px/s.
pub const RUN_SPEED: f32 = 500.0;
/// Upward jump impulse applied per unit of body mass, so bodies of any
/// mass gain the same takeoff velocity.
pub const JUMP_IMPULSE_PER_MASS: f32 = 600.0;
/// Free camera pan speed in px/s.
pub const CAMERA_SPEED: f32 = 500.0;

/// Copies the sampled input state into every player-controlled entity's
/// `InputComponent`. Jump is edge triggered and latches until the
/// controller consumes it - a frame may drain zero physics steps, so
/// overwriting the pending edge would drop presses at high frame rates.
pub fn player_input_system(registry: &mut Registry, input: &InputMap) {
    let left = input.is_active("MoveLeft");
    let right = input.is_active("MoveRight");
    let jump = input.just_pressed("Jump");

    for entity in registry.entities_with::<PlayerControlled>() {
        if let Some(control) = registry.get_component_mut::<InputComponent>(entity) {
            control.left = left;
            control.right = right;
            control.jump |= jump;
        }
    }
}

/// Turns `InputComponent` state into body velocity and jump impulses.
/// Runs once per physics step so held keys give a steady run speed.
pub fn player_controller_system(registry: &mut Registry, space: &mut Space) {
    for entity in registry.entities_with::<InputComponent>() {
        let Some(control) = registry.get_component::<InputComponent>(entity).copied() else {
            continue;
        };
        let Some(rb) = registry.get_component::<RigidBodyComponent>(entity) else {
            continue;
        };
        let Ok(body) = space.body_mut(rb.body) else {
            log::warn!("Controlled entity {entity:?} has a stale body handle");
            continue;
        };

        let mut vx = 0.0;
        if control.left {
            vx -= RUN_SPEED;
        }
        if control.right {
            vx += RUN_SPEED;
        }
        body.velocity.x = vx;

        if control.jump {
            let impulse = Vector2F::new(0.0, -JUMP_IMPULSE_PER_MASS * body.mass());
            body.apply_impulse(impulse);
            // One impulse per press, even when a frame spans several steps
            if let Some(control) = registry.get_component_mut::<InputComponent>(entity) {
                control.jump = false;
            }
        }
    }
}

/// Moves entities that carry a plain velocity but no physics body.
pub fn velocity_system(registry: &mut Registry, dt: f32) {
    for entity in registry.entities_with::<VelocityComponent>() {
        if registry.has_component::<RigidBodyComponent>(entity) {
            continue;
        }
        let Some(velocity) = registry.get_component::<VelocityComponent>(entity).copied() else {
            continue;
        };
        if let Some(transform) = registry.get_component_mut::<Transform>(entity) {
            transform.translate(velocity.linear * dt);
        }
    }
}

/// Pans camera entities with the arrow-key actions.
pub fn camera_system(registry: &mut Registry, input: &InputMap, dt: f32) {
    let mut pan = Vector2F::new(0.0, 0.0);
    if input.is_active("CameraMoveLeft") {
        pan.x -= 1.0;
    }
    if input.is_active("CameraMoveRight") {
        pan.x += 1.0;
    }
    if input.is_active("CameraMoveUp") {
        pan.y -= 1.0;
    }
    if input.is_active("CameraMoveDown") {
        pan.y += 1.0;
    }
    if pan.x == 0.0 && pan.y == 0.0 {
        return;
    }

    for entity in registry.entities_with::<CameraComponent>() {
        if let Some(transform) = registry.get_component_mut::<Transform>(entity) {
            transform.translate(pan * (CAMERA_SPEED * dt));
        }
    }
}

/// Advances every spritesheet by the frame's wall-clock delta.
pub fn animation_system(registry: &mut Registry, dt: f32) {
    for entity in registry.entities_with::<SpritesheetComponent>() {
        if let Some(sheet) = registry.get_component_mut::<SpritesheetComponent>(entity) {
            sheet.update(dt);
        }
    }
}

/// Picks the player's animation from its control state: airborne or
/// jumping shows "jump", moving shows "run", otherwise "idle". The
/// `PlayRun` debug action forces "run".
pub fn player_animation_system(registry: &mut Registry, input: &InputMap, space: &Space) {
    for entity in registry.entities_with::<PlayerControlled>() {
        let Some(control) = registry.get_component::<InputComponent>(entity).copied() else {
            continue;
        };
        let airborne = registry
            .get_component::<RigidBodyComponent>(entity)
            .and_then(|rb| space.body(rb.body).ok())
            .map(|body| body.velocity.y.abs() > 1.0)
            .unwrap_or(false);

        let name = if control.jump || airborne {
            "jump"
        } else if control.left || control.right || input.is_active("PlayRun") {
            "run"
        } else {
            "idle"
        };
        if let Some(sheet) = registry.get_component_mut::<SpritesheetComponent>(entity) {
            sheet.play(name);
        }
    }
}

/// Mirrors physics body state back into the render transforms.
pub fn physics_sync_system(registry: &mut Registry, space: &Space) {
    for entity in registry.entities_with::<RigidBodyComponent>() {
        let Some(rb) = registry.get_component::<RigidBodyComponent>(entity) else {
            continue;
        };
        let Ok(body) = space.body(rb.body) else {
            continue;
        };
        let position = body.position;
        let rotation = body.angle.to_degrees();
        if let Some(transform) = registry.get_component_mut::<Transform>(entity) {
            transform.position = position;
            transform.rotation = rotation;
        }
    }
}

/// Flattens every drawable entity into world-space colored rects for the
/// renderer. Sprite brightness tracks the animation frame so playback is
/// visible without textures.
pub fn collect_entity_views(registry: &Registry) -> Vec<EntityView> {
    let mut views = Vec::new();

    for entity in registry.entities_with::<GraphicsComponent>() {
        let Some(graphics) = registry.get_component::<GraphicsComponent>(entity) else {
            continue;
        };
        let Some(transform) = registry.get_component::<Transform>(entity) else {
            continue;
        };

        match &graphics.drawable {
            Drawable::Sprite { size, origin, color } => {
                let scaled = Vector2F::new(size.x * transform.scale.x, size.y * transform.scale.y);
                let top_left = Vector2F::new(
                    transform.position.x - scaled.x * origin.x,
                    transform.position.y - scaled.y * origin.y,
                );
                let brightness = registry
                    .get_component::<SpritesheetComponent>(entity)
                    .map(|sheet| 0.8 + 0.2 * sheet.frame_progress())
                    .unwrap_or(1.0);
                views.push(EntityView {
                    rect: Rect2F::new(top_left.x, top_left.y, scaled.x, scaled.y),
                    color: [
                        color[0] * brightness,
                        color[1] * brightness,
                        color[2] * brightness,
                    ],
                });
            }
            Drawable::Model(model) => {
                for part in &model.parts {
                    let rect = Rect2F::new(
                        transform.position.x + part.rect.pos.x * transform.scale.x,
                        transform.position.y + part.rect.pos.y * transform.scale.y,
                        part.rect.size.x * transform.scale.x,
                        part.rect.size.y * transform.scale.y,
                    );
                    views.push(EntityView {
                        rect,
                        color: [
                            part.color[0] as f32 / 255.0,
                            part.color[1] as f32 / 255.0,
                            part.color[2] as f32 / 255.0,
                        ],
                    });
                }
            }
        }
    }

    views
}

#[cfg(test)]
use crate::game::scene;

#[test]
fn test_player_input_system_copies_actions() {
    let mut registry = Registry::new();
    let mut space = Space::new();
    let mut assets = crate::assets::ResourceManager::new();
    let handles = scene::setup(&mut registry, &mut space, &mut assets);

    let mut input = InputMap::with_sandbox_bindings();
    input.press(&winit::keyboard::Key::Character("d".into()));
    player_input_system(&mut registry, &input);

    let control = registry
        .get_component::<InputComponent>(handles.runner)
        .unwrap();
    assert!(!control.left);
    assert!(control.right);
    assert!(!control.jump);
}

#[test]
fn test_pending_jump_survives_frames_without_steps() {
    let mut registry = Registry::new();
    let mut space = Space::new();
    let mut assets = crate::assets::ResourceManager::new();
    let handles = scene::setup(&mut registry, &mut space, &mut assets);

    let mut input = InputMap::with_sandbox_bindings();
    input.press(&winit::keyboard::Key::Named(winit::keyboard::NamedKey::Space));
    player_input_system(&mut registry, &input);
    input.end_frame();

    // Further frames before the controller runs must not clear the edge
    player_input_system(&mut registry, &input);
    player_input_system(&mut registry, &input);

    let control = registry
        .get_component::<InputComponent>(handles.runner)
        .unwrap();
    assert!(control.jump, "pending jump edge was overwritten");
}

#[test]
fn test_controller_sets_run_velocity() {
    let mut registry = Registry::new();
    let mut space = Space::new();
    let mut assets = crate::assets::ResourceManager::new();
    let handles = scene::setup(&mut registry, &mut space, &mut assets);

    let runner_body = registry
        .get_component::<RigidBodyComponent>(handles.runner)
        .unwrap()
        .body;
    registry
        .get_component_mut::<InputComponent>(handles.runner)
        .unwrap()
        .left = true;
    player_controller_system(&mut registry, &mut space);

    let body = space.body(runner_body).unwrap();
    assert_eq!(body.velocity.x, -RUN_SPEED);
}

#[test]
fn test_jump_impulse_is_mass_independent() {
    let mut registry = Registry::new();
    let mut space = Space::new();
    let mut assets = crate::assets::ResourceManager::new();
    let handles = scene::setup(&mut registry, &mut space, &mut assets);

    let runner_body = registry
        .get_component::<RigidBodyComponent>(handles.runner)
        .unwrap()
        .body;
    registry
        .get_component_mut::<InputComponent>(handles.runner)
        .unwrap()
        .jump = true;
    player_controller_system(&mut registry, &mut space);

    let body = space.body(runner_body).unwrap();
    assert_eq!(body.velocity.y, -JUMP_IMPULSE_PER_MASS);
}

#[test]
fn test_velocity_system_moves_plain_entities() {
    let mut registry = Registry::new();
    let entity = registry.create_entity();
    registry.add_component(entity, Transform::new());
    registry.add_component(
        entity,
        VelocityComponent {
            linear: Vector2F::new(10.0, -20.0),
        },
    );

    velocity_system(&mut registry, 0.5);

    let transform = registry.get_component::<Transform>(entity).unwrap();
    assert_eq!(transform.position, Vector2F::new(5.0, -10.0));
}

#[test]
fn test_camera_system_pans_with_arrows() {
    let mut registry = Registry::new();
    let mut space = Space::new();
    let mut assets = crate::assets::ResourceManager::new();
    let handles = scene::setup(&mut registry, &mut space, &mut assets);

    let before = registry
        .get_component::<Transform>(handles.camera)
        .unwrap()
        .position;
    let mut input = InputMap::with_sandbox_bindings();
    input.press(&winit::keyboard::Key::Named(
        winit::keyboard::NamedKey::ArrowRight,
    ));
    camera_system(&mut registry, &input, 0.1);

    let after = registry
        .get_component::<Transform>(handles.camera)
        .unwrap()
        .position;
    assert_eq!(after.x - before.x, CAMERA_SPEED * 0.1);
    assert_eq!(after.y, before.y);
}

#[test]
fn test_physics_sync_copies_body_position() {
    let mut registry = Registry::new();
    let mut space = Space::new();
    let mut assets = crate::assets::ResourceManager::new();
    let handles = scene::setup(&mut registry, &mut space, &mut assets);

    let runner_body = registry
        .get_component::<RigidBodyComponent>(handles.runner)
        .unwrap()
        .body;
    space.body_mut(runner_body).unwrap().position = Vector2F::new(12.0, 34.0);
    physics_sync_system(&mut registry, &space);

    let transform = registry.get_component::<Transform>(handles.runner).unwrap();
    assert_eq!(transform.position, Vector2F::new(12.0, 34.0));
}

#[test]
fn test_collect_entity_views_has_all_drawables() {
    let mut registry = Registry::new();
    let mut space = Space::new();
    let mut assets = crate::assets::ResourceManager::new();
    scene::setup(&mut registry, &mut space, &mut assets);

    let views = collect_entity_views(&registry);
    // Runner sprite, box sprite and at least the house's parts
    assert!(views.len() >= 3);
}
