use rust_sandbox::game::components::{
    RigidBodyComponent,
    Transform
};
use rust_sandbox::game::spritesheet::SpritesheetComponent;
use rust_sandbox::game::systems::RUN_SPEED;
use rust_sandbox::game::Game;
use rust_sandbox::DEFAULT_PHYSICS_TIMESTEP;

use winit::keyboard::{
    Key,
    NamedKey
};

fn runner_position(game: &Game) -> rust_sandbox::game::math::Vector2F {
    game.registry
        .get_component::<Transform>(game.handles.runner)
        .unwrap()
        .position
}

#[test]
fn test_runner_falls_until_it_rests_on_the_floor() {
    let mut game = Game::new(DEFAULT_PHYSICS_TIMESTEP);
    let spawn = runner_position(&game);

    // Three simulated seconds, plenty of time to land
    for _ in 0..150 {
        game.update(DEFAULT_PHYSICS_TIMESTEP);
    }

    let landed = runner_position(&game);
    assert!(landed.y > spawn.y, "Runner never fell");
    // Floor is at y=720, runner half height is 128
    assert!(
        (landed.y - 592.0).abs() < 5.0,
        "Runner rests at {landed} instead of the floor"
    );

    let before = landed;
    for _ in 0..50 {
        game.update(DEFAULT_PHYSICS_TIMESTEP);
    }
    let after = runner_position(&game);
    assert!((after.y - before.y).abs() < 1.0, "Runner still sinking");
}

#[test]
fn test_identical_inputs_give_identical_trajectories() {
    let mut first = Game::new(DEFAULT_PHYSICS_TIMESTEP);
    let mut second = Game::new(DEFAULT_PHYSICS_TIMESTEP);

    for frame in 0..200 {
        if frame == 20 {
            first.input.press(&Key::Character("d".into()));
            second.input.press(&Key::Character("d".into()));
        }
        if frame == 80 {
            first.input.release(&Key::Character("d".into()));
            second.input.release(&Key::Character("d".into()));
        }
        first.update(DEFAULT_PHYSICS_TIMESTEP);
        second.update(DEFAULT_PHYSICS_TIMESTEP);
    }

    assert_eq!(runner_position(&first), runner_position(&second));
}

#[test]
fn test_physics_steps_are_independent_of_frame_slicing() {
    let mut choppy = Game::new(DEFAULT_PHYSICS_TIMESTEP);
    let mut smooth = Game::new(DEFAULT_PHYSICS_TIMESTEP);

    // Same simulated time span, different frame lengths. Doubling the
    // timestep keeps the accumulator arithmetic exact, so the fixed
    // steps land identically.
    for _ in 0..10 {
        choppy.update(DEFAULT_PHYSICS_TIMESTEP);
    }
    for _ in 0..5 {
        smooth.update(DEFAULT_PHYSICS_TIMESTEP * 2.0);
    }

    assert_eq!(runner_position(&choppy), runner_position(&smooth));
}

#[test]
fn test_held_key_moves_the_runner() {
    let mut game = Game::new(DEFAULT_PHYSICS_TIMESTEP);

    // Land first so gravity is out of the picture
    for _ in 0..150 {
        game.update(DEFAULT_PHYSICS_TIMESTEP);
    }
    let start = runner_position(&game);

    // Left is the open side, nothing to bump into there
    game.input.press(&Key::Character("q".into()));
    for _ in 0..50 {
        game.update(DEFAULT_PHYSICS_TIMESTEP);
    }
    game.input.release(&Key::Character("q".into()));

    let end = runner_position(&game);
    let travelled = start.x - end.x;
    assert!(
        (travelled - RUN_SPEED).abs() < 20.0,
        "One second of running moved the runner {travelled} px"
    );
}

#[test]
fn test_space_makes_the_runner_jump_once() {
    let mut game = Game::new(DEFAULT_PHYSICS_TIMESTEP);
    for _ in 0..150 {
        game.update(DEFAULT_PHYSICS_TIMESTEP);
    }
    let resting = runner_position(&game);

    game.input.press(&Key::Named(NamedKey::Space));
    // The key stays held, only the press edge may trigger an impulse
    let mut peak = resting.y;
    for _ in 0..25 {
        game.update(DEFAULT_PHYSICS_TIMESTEP);
        peak = peak.min(runner_position(&game).y);
    }
    assert!(resting.y - peak > 50.0, "Runner never left the ground");

    game.input.release(&Key::Named(NamedKey::Space));
    for _ in 0..150 {
        game.update(DEFAULT_PHYSICS_TIMESTEP);
    }
    let landed = runner_position(&game);
    assert!((landed.y - resting.y).abs() < 5.0, "Runner did not land back");
}

#[test]
fn test_jump_press_lands_between_physics_steps() {
    let mut game = Game::new(DEFAULT_PHYSICS_TIMESTEP);
    for _ in 0..150 {
        game.update(DEFAULT_PHYSICS_TIMESTEP);
    }
    let resting = runner_position(&game);

    // High frame rate: every other frame drains zero physics steps, so
    // the press edge arrives on a frame without a controller run
    game.input.press(&Key::Named(NamedKey::Space));
    let mut peak = resting.y;
    for _ in 0..60 {
        game.update(DEFAULT_PHYSICS_TIMESTEP * 0.5);
        peak = peak.min(runner_position(&game).y);
    }

    assert!(
        resting.y - peak > 50.0,
        "jump pressed on a short frame never happened (resting {}, peak {peak})",
        resting.y
    );
}

#[test]
fn test_runner_pushes_the_box() {
    let mut game = Game::new(DEFAULT_PHYSICS_TIMESTEP);
    for _ in 0..150 {
        game.update(DEFAULT_PHYSICS_TIMESTEP);
    }
    let box_start = game
        .registry
        .get_component::<Transform>(game.handles.box_entity)
        .unwrap()
        .position;

    game.input.press(&Key::Character("d".into()));
    for _ in 0..200 {
        game.update(DEFAULT_PHYSICS_TIMESTEP);
    }

    let box_end = game
        .registry
        .get_component::<Transform>(game.handles.box_entity)
        .unwrap()
        .position;
    assert!(box_end.x > box_start.x + 10.0, "Box was never pushed");
}

#[test]
fn test_transforms_mirror_physics_bodies() {
    let mut game = Game::new(DEFAULT_PHYSICS_TIMESTEP);
    for _ in 0..30 {
        game.update(DEFAULT_PHYSICS_TIMESTEP);
    }

    for handle in [game.handles.runner, game.handles.box_entity] {
        let body_id = game
            .registry
            .get_component::<RigidBodyComponent>(handle)
            .unwrap()
            .body;
        let body_position = game.space.body(body_id).unwrap().position;
        let transform_position = game
            .registry
            .get_component::<Transform>(handle)
            .unwrap()
            .position;
        assert_eq!(body_position, transform_position);
    }
}

#[test]
fn test_runner_animation_follows_movement() {
    let mut game = Game::new(DEFAULT_PHYSICS_TIMESTEP);
    for _ in 0..150 {
        game.update(DEFAULT_PHYSICS_TIMESTEP);
    }

    let current = |game: &Game| {
        game.registry
            .get_component::<SpritesheetComponent>(game.handles.runner)
            .unwrap()
            .current_animation()
            .map(|animation| animation.name.clone())
    };
    assert_eq!(current(&game).as_deref(), Some("idle"));

    game.input.press(&Key::Character("d".into()));
    game.update(DEFAULT_PHYSICS_TIMESTEP);
    assert_eq!(current(&game).as_deref(), Some("run"));

    game.input.release(&Key::Character("d".into()));
    for _ in 0..20 {
        game.update(DEFAULT_PHYSICS_TIMESTEP);
    }
    assert_eq!(current(&game).as_deref(), Some("idle"));
}
