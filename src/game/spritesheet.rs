use std::sync::Arc;

use crate::game::math::Vector2I;

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub name: String,
    pub frame_count: u32,
    pub frame_duration: f32,
    pub start_cell: Vector2I,
    pub cell_size: Vector2I,
}

/// Named animation table shared between entities using the same sheet.
#[derive(Debug, Default)]
pub struct Spritesheet {
    animations: Vec<Animation>,
}

impl Spritesheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_animation<S: AsRef<str>>(
        &mut self,
        name: S,
        frame_count: u32,
        frame_duration: f32,
        start_cell: Vector2I,
        cell_size: Vector2I,
    ) {
        self.animations.push(Animation {
            name: name.as_ref().to_string(),
            frame_count,
            frame_duration,
            start_cell,
            cell_size,
        });
    }

    pub fn animation(&self, index: usize) -> Option<&Animation> {
        self.animations.get(index)
    }

    pub fn animation_index<S: AsRef<str>>(&self, name: S) -> Option<usize> {
        self.animations
            .iter()
            .position(|animation| animation.name == name.as_ref())
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }
}

/// Playback state of one entity over its spritesheet.
#[derive(Debug, Clone)]
pub struct SpritesheetComponent {
    sheet: Arc<Spritesheet>,
    current: Option<usize>,
    frame: u32,
    elapsed: f32,
}

impl SpritesheetComponent {
    pub fn new(sheet: Arc<Spritesheet>) -> Self {
        Self {
            sheet,
            current: None,
            frame: 0,
            elapsed: 0.0,
        }
    }

    /// Switches animation, rewinding only on an actual change - calling
    /// `play` with the running animation every frame is fine.
    pub fn play<S: AsRef<str>>(&mut self, name: S) {
        let name = name.as_ref();
        match self.sheet.animation_index(name) {
            Some(index) => {
                if self.current != Some(index) {
                    log::debug!("Playing animation '{name}'");
                    self.current = Some(index);
                    self.frame = 0;
                    self.elapsed = 0.0;
                }
            }
            None => {
                log::warn!("Unknown animation '{name}' requested");
            }
        }
    }

    /// Advances playback by `dt` seconds, wrapping at the end.
    pub fn update(&mut self, dt: f32) {
        let Some(animation) = self.current.and_then(|index| self.sheet.animation(index)) else {
            return;
        };
        if animation.frame_count == 0 || animation.frame_duration <= 0.0 {
            return;
        }

        self.elapsed += dt;
        while self.elapsed >= animation.frame_duration {
            self.elapsed -= animation.frame_duration;
            self.frame = (self.frame + 1) % animation.frame_count;
        }
    }

    pub fn current_animation(&self) -> Option<&Animation> {
        self.current.and_then(|index| self.sheet.animation(index))
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// 0..1 progress through the current animation, for the debug overlay.
    pub fn frame_progress(&self) -> f32 {
        match self.current_animation() {
            Some(animation) if animation.frame_count > 1 => {
                self.frame as f32 / (animation.frame_count - 1) as f32
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
fn test_sheet() -> Arc<Spritesheet> {
    let mut sheet = Spritesheet::new();
    sheet.add_animation("idle", 5, 0.1, Vector2I::new(0, 0), Vector2I::new(32, 32));
    sheet.add_animation("run", 8, 0.1, Vector2I::new(0, 32), Vector2I::new(32, 32));
    Arc::new(sheet)
}

#[test]
fn test_animation_lookup() {
    let sheet = test_sheet();
    assert_eq!(sheet.animation_count(), 2);
    assert_eq!(sheet.animation_index("run"), Some(1));
    assert_eq!(sheet.animation_index("fly"), None);
    assert_eq!(sheet.animation(0).unwrap().frame_count, 5);
}

#[test]
fn test_playback_advances_and_wraps() {
    let mut component = SpritesheetComponent::new(test_sheet());
    component.play("idle");
    assert_eq!(component.frame(), 0);

    component.update(0.25);
    assert_eq!(component.frame(), 2);

    // 5 frames at 0.1s wrap after 0.5s
    component.update(0.3);
    assert_eq!(component.frame(), 0);
}

#[test]
fn test_play_same_animation_keeps_frame() {
    let mut component = SpritesheetComponent::new(test_sheet());
    component.play("run");
    component.update(0.35);
    assert_eq!(component.frame(), 3);

    component.play("run");
    assert_eq!(component.frame(), 3, "re-playing the same animation should not rewind");

    component.play("idle");
    assert_eq!(component.frame(), 0, "switching animation rewinds");
}

#[test]
fn test_unknown_animation_is_ignored() {
    let mut component = SpritesheetComponent::new(test_sheet());
    component.play("fly");
    assert!(component.current_animation().is_none());
    component.update(1.0);
    assert_eq!(component.frame(), 0);
}
