pub mod renderer;

pub use renderer::Renderer;

use crate::game::math::{
    Rect2F,
    Vector2F
};

/// A world-space colored rect, ready for the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityView {
    pub rect: Rect2F,
    pub color: [f32; 3],
}

/// Everything drawn in one frame: world rects with their camera, then
/// screen-space gui rects on top.
pub struct RenderBatch {
    pub(crate) entities: Vec<EntityView>,
    pub(crate) gui_elements: Vec<crate::gui::GuiElement>,
    pub(crate) camera: Vector2F,
    pub(crate) zoom: f32,
}

impl RenderBatch {
    pub(crate) fn new() -> Self {
        Self {
            entities: vec![],
            gui_elements: vec![],
            camera: Vector2F::zero(),
            zoom: 1.0,
        }
    }
}
