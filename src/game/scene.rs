//! The hardcoded sandbox scene: a controllable runner, a heavy box to
//! push around, a house model and a long floor.

use std::sync::Arc;

use rand::seq::IndexedRandom;

use crate::assets::ResourceManager;
use crate::ecs::{
    Entity,
    Registry
};
use crate::game::components::{
    CameraComponent,
    GraphicsComponent,
    InputComponent,
    PlayerControlled,
    RigidBodyComponent,
    Transform
};
use crate::game::math::{
    Vector2F,
    Vector2I
};
use crate::game::spritesheet::{
    Spritesheet,
    SpritesheetComponent
};
use crate::physics::{
    RigidBody,
    Shape,
    Space
};

const RUNNER_MASS: f32 = 80.0;
const RUNNER_SIZE: Vector2F = Vector2F { x: 128.0, y: 256.0 };
const RUNNER_SPAWN: Vector2F = Vector2F { x: 100.0, y: 100.0 };

const BOX_MASS: f32 = 300.0;
const BOX_SIZE: Vector2F = Vector2F { x: 256.0, y: 256.0 };
const BOX_SPAWN: Vector2F = Vector2F { x: 400.0, y: 400.0 };

const HOUSE_POSITION: Vector2F = Vector2F { x: 750.0, y: 275.0 };
const HOUSE_SCALE: f32 = 2.0;

const FLOOR_Y: f32 = 720.0;
const FLOOR_LENGTH: f32 = 10_000.0;

const SPRITE_CELL: Vector2I = Vector2I { x: 32, y: 32 };
const FRAME_DURATION: f32 = 0.1;

const RUNNER_PALETTE: [[f32; 3]; 4] = [
    [0.91, 0.34, 0.24],
    [0.20, 0.60, 0.86],
    [0.18, 0.80, 0.44],
    [0.95, 0.77, 0.06],
];

/// Entities the rest of the sandbox keeps poking at.
pub struct SceneHandles {
    pub camera: Entity,
    pub runner: Entity,
    pub box_entity: Entity,
    pub house: Entity,
}

fn runner_spritesheet() -> Arc<Spritesheet> {
    let mut sheet = Spritesheet::new();
    // Start cells are pixel offsets into the sheet, one 32px row per
    // animation
    sheet.add_animation("idle", 5, FRAME_DURATION, Vector2I::new(0, 0), SPRITE_CELL);
    sheet.add_animation("run", 8, FRAME_DURATION, Vector2I::new(0, 32), SPRITE_CELL);
    sheet.add_animation("jump", 4, FRAME_DURATION, Vector2I::new(0, 64), SPRITE_CELL);
    Arc::new(sheet)
}

/// Populates registry and space with the sandbox scene and returns the
/// handles to its named entities.
pub fn setup(registry: &mut Registry, space: &mut Space, assets: &mut ResourceManager) -> SceneHandles {
    let mut rng = rand::rng();
    let runner_color = *RUNNER_PALETTE
        .choose(&mut rng)
        .unwrap_or(&RUNNER_PALETTE[0]);

    // Floor spans far past both window edges. It is pure physics, no
    // entity draws it.
    let mut floor = RigidBody::fixed();
    floor.add_shape(Shape::segment(
        Vector2F::new(0.0, FLOOR_Y),
        Vector2F::new(FLOOR_LENGTH, FLOOR_Y),
        1.0,
    ));
    space.add_body(floor);

    let mut runner_body = RigidBody::dynamic(RUNNER_MASS);
    runner_body.position = RUNNER_SPAWN;
    runner_body.add_shape(Shape::boxed(RUNNER_SIZE.x, RUNNER_SIZE.y));
    let runner_body = space.add_body(runner_body);

    let runner = registry.create_entity();
    registry.add_component(runner, Transform::with_position(RUNNER_SPAWN));
    registry.add_component(runner, GraphicsComponent::sprite(RUNNER_SIZE, runner_color));
    registry.add_component(runner, SpritesheetComponent::new(runner_spritesheet()));
    registry.add_component(runner, RigidBodyComponent { body: runner_body });
    registry.add_component(runner, InputComponent::default());
    registry.add_component(runner, PlayerControlled);

    let mut box_body = RigidBody::dynamic(BOX_MASS);
    box_body.position = BOX_SPAWN;
    box_body.add_shape(Shape::boxed(BOX_SIZE.x, BOX_SIZE.y));
    let box_body = space.add_body(box_body);

    let box_entity = registry.create_entity();
    registry.add_component(box_entity, Transform::with_position(BOX_SPAWN));
    registry.add_component(
        box_entity,
        GraphicsComponent::sprite(BOX_SIZE, [0.55, 0.42, 0.30]),
    );
    registry.add_component(box_entity, RigidBodyComponent { body: box_body });

    let house_model = assets.load_model_or_default("assets/house.model");
    let house = registry.create_entity();
    let mut house_transform = Transform::with_position(HOUSE_POSITION);
    house_transform.scale = Vector2F::new(HOUSE_SCALE, HOUSE_SCALE);
    registry.add_component(house, house_transform);
    registry.add_component(house, GraphicsComponent::model(house_model));

    let camera = registry.create_entity();
    registry.add_component(camera, Transform::with_position(RUNNER_SPAWN));
    registry.add_component(camera, CameraComponent::default());

    log::info!(
        "Scene ready: {} entities, {} bodies",
        registry.entity_count(),
        space.body_count()
    );

    SceneHandles {
        camera,
        runner,
        box_entity,
        house,
    }
}

#[test]
fn test_setup_spawns_expected_entities() {
    let mut registry = Registry::new();
    let mut space = Space::new();
    let mut assets = ResourceManager::new();
    let handles = setup(&mut registry, &mut space, &mut assets);

    assert_eq!(registry.entity_count(), 4);
    // Floor, runner and box
    assert_eq!(space.body_count(), 3);
    assert!(registry.has_component::<PlayerControlled>(handles.runner));
    assert!(registry.has_component::<CameraComponent>(handles.camera));
    assert!(registry.has_component::<GraphicsComponent>(handles.house));
    assert!(!registry.has_component::<RigidBodyComponent>(handles.house));
}

#[test]
fn test_runner_starts_at_spawn() {
    let mut registry = Registry::new();
    let mut space = Space::new();
    let mut assets = ResourceManager::new();
    let handles = setup(&mut registry, &mut space, &mut assets);

    let transform = registry.get_component::<Transform>(handles.runner).unwrap();
    assert_eq!(transform.position, RUNNER_SPAWN);

    let body = registry
        .get_component::<RigidBodyComponent>(handles.runner)
        .unwrap();
    assert_eq!(space.body(body.body).unwrap().position, RUNNER_SPAWN);
}

#[test]
fn test_runner_sheet_has_all_animations() {
    let sheet = runner_spritesheet();
    assert_eq!(sheet.animation_count(), 3);
    assert!(sheet.animation_index("idle").is_some());
    assert!(sheet.animation_index("run").is_some());
    assert!(sheet.animation_index("jump").is_some());

    // One 32px sheet row per animation
    let run = sheet.animation(1).unwrap();
    assert_eq!(run.start_cell, Vector2I::new(0, 32));
    let jump = sheet.animation(2).unwrap();
    assert_eq!(jump.start_cell, Vector2I::new(0, 64));
}
