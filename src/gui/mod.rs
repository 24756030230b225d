//! Immediate-mode debug overlay built from flat colored rects.

use clap::builder::styling::RgbColor;

use crate::ecs::{
    Entity,
    Registry
};
use crate::game::components::{
    CameraComponent,
    RigidBodyComponent,
    Transform
};
use crate::game::math::{
    Rect2F,
    Vector2F
};
use crate::game::scene::SceneHandles;
use crate::game::spritesheet::SpritesheetComponent;
use crate::physics::Space;

#[derive(Debug, Clone, Copy)]
pub struct GuiBox {
    pub rect: Rect2F,
    pub color: RgbColor
}

#[derive(Debug)]
pub enum GuiElement {
    Box(GuiBox)
}

const BORDER_SIZE: f32 = 4.0;

/// Horizontal bar showing where a value sits inside a range, with the
/// fill anchored to the range midpoint.
#[derive(Debug)]
pub struct GuiGauge {
    pub rect: Rect2F,
    pub color_middle: RgbColor,
    pub color_bg: RgbColor,
    pub color_frame: RgbColor,
    min: f32,
    max: f32,
    value: f32,
}

impl GuiGauge {
    pub fn new(rect: Rect2F, min: f32, max: f32) -> Self {
        Self {
            rect,
            color_middle: RgbColor(130, 217, 214),
            color_bg: RgbColor(38, 38, 38),
            color_frame: RgbColor(92, 92, 92),
            min,
            max,
            value: min,
        }
    }

    pub fn set_value(&mut self, value: f32) {
        self.value = value.clamp(self.min, self.max);
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn get_drawable_rects(&self) -> (GuiBox, GuiBox, GuiBox) {
        let inner_rest = Rect2F::new(
            self.rect.pos.x + BORDER_SIZE,
            self.rect.pos.y + BORDER_SIZE,
            self.rect.size.x - 2.0 * BORDER_SIZE,
            self.rect.size.y - 2.0 * BORDER_SIZE
        );

        let mid = (self.min + self.max) / 2.0;
        let half_span = (self.max - self.min) / 2.0;
        let offset = (self.value - mid) / half_span;
        let center_x = inner_rest.pos.x + inner_rest.size.x / 2.0;
        let fill_width = inner_rest.size.x / 2.0 * offset.abs();
        let fill_rect = Rect2F::new(
            if offset < 0.0 { center_x - fill_width } else { center_x },
            inner_rest.pos.y,
            fill_width.max(2.0),
            inner_rest.size.y
        );

        (
            GuiBox {
                rect: self.rect,
                color: self.color_frame
            },
            GuiBox {
                rect: inner_rest,
                color: self.color_bg
            },
            GuiBox {
                rect: fill_rect,
                color: self.color_middle
            }
        )
    }
}

#[derive(Debug)]
pub struct GuiIndicator {
    pub rect: Rect2F,
    pub turned_on: bool,
    pub color_middle_on: RgbColor,
    pub color_middle_off: RgbColor,
}

impl GuiIndicator {
    pub fn new(rect: Rect2F) -> Self {
        Self {
            rect,
            turned_on: false,
            color_middle_on: RgbColor(0, 186, 22),
            color_middle_off: RgbColor(45, 61, 47),
        }
    }

    pub fn set_turned_on(&mut self, turned_on: bool) {
        self.turned_on = turned_on;
    }

    pub fn get_drawable_rects(&self) -> GuiBox {
        GuiBox {
            rect: self.rect,
            color: if self.turned_on {
                self.color_middle_on
            } else {
                self.color_middle_off
            }
        }
    }
}

const PANEL_WIDTH: f32 = 240.0;
const PANEL_PADDING: f32 = 8.0;
const ROW_HEIGHT: f32 = 20.0;
const ROW_GAP: f32 = 4.0;
const POSITION_RANGE: f32 = 5000.0;

/// One inspector panel per tracked entity, rebuilt every frame. Each
/// panel stacks gauges for the entity transform, plus animation state
/// for the runner.
#[derive(Debug, Default)]
pub struct EntityInspector {
    visible: bool,
}

impl EntityInspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::debug!("Entity inspector visible: {}", self.visible);
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn build(
        &self,
        registry: &Registry,
        space: &Space,
        handles: &SceneHandles,
    ) -> Vec<GuiElement> {
        if !self.visible {
            return vec![];
        }

        let mut elements = Vec::new();
        let mut origin = Vector2F::new(PANEL_PADDING, PANEL_PADDING);

        for entity in [handles.runner, handles.box_entity, handles.camera] {
            let height = self.build_entity_panel(registry, space, entity, origin, &mut elements);
            origin.y += height + PANEL_PADDING;
        }

        elements
    }

    fn build_entity_panel(
        &self,
        registry: &Registry,
        space: &Space,
        entity: Entity,
        origin: Vector2F,
        elements: &mut Vec<GuiElement>,
    ) -> f32 {
        let Some(transform) = registry.get_component::<Transform>(entity) else {
            return 0.0;
        };

        let mut rows: Vec<GuiElement> = Vec::new();
        let mut row_y = origin.y + PANEL_PADDING;
        let row_x = origin.x + PANEL_PADDING;
        let row_width = PANEL_WIDTH - 2.0 * PANEL_PADDING;

        let push_gauge = |row_y: &mut f32, value: f32, min: f32, max: f32, rows: &mut Vec<GuiElement>| {
            let mut gauge = GuiGauge::new(
                Rect2F::new(row_x, *row_y, row_width, ROW_HEIGHT),
                min,
                max,
            );
            gauge.set_value(value);
            let (frame, bg, fill) = gauge.get_drawable_rects();
            rows.push(GuiElement::Box(frame));
            rows.push(GuiElement::Box(bg));
            rows.push(GuiElement::Box(fill));
            *row_y += ROW_HEIGHT + ROW_GAP;
        };

        push_gauge(&mut row_y, transform.position.x, -POSITION_RANGE, POSITION_RANGE, &mut rows);
        push_gauge(&mut row_y, transform.position.y, -POSITION_RANGE, POSITION_RANGE, &mut rows);
        push_gauge(&mut row_y, transform.rotation, -180.0, 180.0, &mut rows);

        if let Some(camera) = registry.get_component::<CameraComponent>(entity) {
            push_gauge(&mut row_y, camera.zoom, 0.0, 10.0, &mut rows);
        }

        if let Some(rb) = registry.get_component::<RigidBodyComponent>(entity) {
            if let Ok(body) = space.body(rb.body) {
                push_gauge(&mut row_y, body.velocity.x, -2000.0, 2000.0, &mut rows);
                push_gauge(&mut row_y, body.velocity.y, -2000.0, 2000.0, &mut rows);
            }
        }

        if let Some(sheet) = registry.get_component::<SpritesheetComponent>(entity) {
            push_gauge(&mut row_y, sheet.frame_progress(), 0.0, 1.0, &mut rows);

            let mut airborne = GuiIndicator::new(Rect2F::new(row_x, row_y, ROW_HEIGHT, ROW_HEIGHT));
            let jumping = sheet
                .current_animation()
                .map(|animation| animation.name == "jump")
                .unwrap_or(false);
            airborne.set_turned_on(jumping);
            rows.push(GuiElement::Box(airborne.get_drawable_rects()));
            row_y += ROW_HEIGHT + ROW_GAP;
        }

        let height = row_y - origin.y + PANEL_PADDING - ROW_GAP;
        elements.push(GuiElement::Box(GuiBox {
            rect: Rect2F::new(origin.x, origin.y, PANEL_WIDTH, height),
            color: RgbColor(24, 24, 24),
        }));
        elements.extend(rows);
        height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ResourceManager;
    use crate::game::scene;

    fn sandbox() -> (Registry, Space, SceneHandles) {
        let mut registry = Registry::new();
        let mut space = Space::new();
        let mut assets = ResourceManager::new();
        let handles = scene::setup(&mut registry, &mut space, &mut assets);
        (registry, space, handles)
    }

    #[test]
    fn test_hidden_inspector_builds_nothing() {
        let (registry, space, handles) = sandbox();
        let inspector = EntityInspector::new();
        assert!(!inspector.is_visible());
        assert!(inspector.build(&registry, &space, &handles).is_empty());
    }

    #[test]
    fn test_visible_inspector_builds_panels() {
        let (registry, space, handles) = sandbox();
        let mut inspector = EntityInspector::new();
        inspector.toggle();
        let elements = inspector.build(&registry, &space, &handles);
        // Three panels, each with a background and several gauge rects
        assert!(elements.len() > 9);
    }

    #[test]
    fn test_gauge_clamps_value_to_range() {
        let mut gauge = GuiGauge::new(Rect2F::new(0.0, 0.0, 100.0, 20.0), -10.0, 10.0);
        gauge.set_value(50.0);
        assert_eq!(gauge.value(), 10.0);
        gauge.set_value(-50.0);
        assert_eq!(gauge.value(), -10.0);
    }

    #[test]
    fn test_gauge_fill_sits_on_correct_side() {
        let mut gauge = GuiGauge::new(Rect2F::new(0.0, 0.0, 108.0, 20.0), -10.0, 10.0);
        gauge.set_value(10.0);
        let (_, bg, fill) = gauge.get_drawable_rects();
        let center_x = bg.rect.pos.x + bg.rect.size.x / 2.0;
        assert_eq!(fill.rect.pos.x, center_x);

        gauge.set_value(-10.0);
        let (_, _, fill) = gauge.get_drawable_rects();
        assert!(fill.rect.pos.x < center_x);
    }

    #[test]
    fn test_indicator_follows_state() {
        let mut indicator = GuiIndicator::new(Rect2F::new(0.0, 0.0, 16.0, 16.0));
        let off = indicator.get_drawable_rects();
        indicator.set_turned_on(true);
        let on = indicator.get_drawable_rects();
        assert_ne!(off.color, on.color);
    }
}
