use std::collections::{HashMap, HashSet};

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{Key, NamedKey, SmolStr};

/// Maps raw keys to named actions and tracks their per-frame state.
///
/// `is_active` is level-triggered (key held), `just_pressed` is
/// edge-triggered and cleared by `end_frame` once the game loop consumed it.
#[derive(Debug, Default)]
pub struct InputMap {
    bindings: HashMap<Key, String>,
    active: HashSet<String>,
    just_pressed: HashSet<String>,
}

impl InputMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings for the sandbox scene: ZQSD-style movement, arrows for the
    /// camera, space to jump, R to preview the run animation.
    pub fn with_sandbox_bindings() -> Self {
        let mut input = Self::new();
        input.bind(Key::Character(SmolStr::new("q")), "MoveLeft");
        input.bind(Key::Character(SmolStr::new("d")), "MoveRight");
        input.bind(Key::Named(NamedKey::Space), "Jump");

        input.bind(Key::Named(NamedKey::ArrowLeft), "CameraMoveLeft");
        input.bind(Key::Named(NamedKey::ArrowRight), "CameraMoveRight");
        input.bind(Key::Named(NamedKey::ArrowUp), "CameraMoveUp");
        input.bind(Key::Named(NamedKey::ArrowDown), "CameraMoveDown");

        input.bind(Key::Character(SmolStr::new("r")), "PlayRun");
        input.bind(Key::Named(NamedKey::F3), "ToggleOverlay");
        input
    }

    pub fn bind<S: AsRef<str>>(&mut self, key: Key, action: S) {
        let action = action.as_ref().to_string();
        log::debug!("Bound {key:?} to action '{action}'");
        self.bindings.insert(key, action);
    }

    pub fn handle_key_event(&mut self, event: &KeyEvent) {
        if event.repeat {
            return;
        }
        match event.state {
            ElementState::Pressed => self.press(&event.logical_key),
            ElementState::Released => self.release(&event.logical_key),
        }
    }

    pub fn press(&mut self, key: &Key) {
        if let Some(action) = self.bindings.get(key) {
            if self.active.insert(action.clone()) {
                log::trace!("Action '{action}' pressed");
                self.just_pressed.insert(action.clone());
            }
        }
    }

    pub fn release(&mut self, key: &Key) {
        if let Some(action) = self.bindings.get(key) {
            if self.active.remove(action) {
                log::trace!("Action '{action}' released");
            }
        }
    }

    pub fn is_active<S: AsRef<str>>(&self, action: S) -> bool {
        self.active.contains(action.as_ref())
    }

    pub fn just_pressed<S: AsRef<str>>(&self, action: S) -> bool {
        self.just_pressed.contains(action.as_ref())
    }

    /// Clears press edges, call once per game update.
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }
}

#[cfg(test)]
fn key(character: &str) -> Key {
    Key::Character(SmolStr::new(character))
}

#[test]
fn test_actions_follow_key_state() {
    let mut input = InputMap::new();
    input.bind(key("d"), "MoveRight");

    assert!(!input.is_active("MoveRight"));

    input.press(&key("d"));
    assert!(input.is_active("MoveRight"));

    input.release(&key("d"));
    assert!(!input.is_active("MoveRight"));
}

#[test]
fn test_unbound_keys_are_ignored() {
    let mut input = InputMap::new();
    input.press(&key("x"));
    assert!(!input.is_active("MoveRight"));
}

#[test]
fn test_just_pressed_is_an_edge() {
    let mut input = InputMap::new();
    input.bind(Key::Named(NamedKey::Space), "Jump");

    input.press(&Key::Named(NamedKey::Space));
    assert!(input.just_pressed("Jump"));
    assert!(input.is_active("Jump"));

    input.end_frame();
    assert!(!input.just_pressed("Jump"), "edge must clear at frame end");
    assert!(input.is_active("Jump"), "level state stays while held");

    // Holding the key does not retrigger the edge
    input.press(&Key::Named(NamedKey::Space));
    assert!(!input.just_pressed("Jump"));
}

#[test]
fn test_sandbox_bindings_cover_scene_actions() {
    let input = InputMap::with_sandbox_bindings();
    for action in [
        "MoveLeft",
        "MoveRight",
        "Jump",
        "CameraMoveLeft",
        "CameraMoveRight",
        "CameraMoveUp",
        "CameraMoveDown",
        "PlayRun",
        "ToggleOverlay",
    ] {
        assert!(
            input.bindings.values().any(|bound| bound == action),
            "missing binding for {action}"
        );
    }
}
