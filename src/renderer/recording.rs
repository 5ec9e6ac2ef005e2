//! Surface that records draw calls instead of drawing

use glam::Vec2;

use super::{RenderSurface, Shape, SpriteId, Style};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Sprite { sprite: SpriteId, pos: Vec2, size: Vec2 },
    Primitive { shape: Shape, style: Style },
}

/// Keeps every call in order; used by tests and headless runs
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn sprites(&self) -> impl Iterator<Item = (SpriteId, Vec2, Vec2)> + '_ {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Sprite { sprite, pos, size } => Some((*sprite, *pos, *size)),
            DrawCall::Primitive { .. } => None,
        })
    }

    pub fn primitives(&self) -> impl Iterator<Item = (&Shape, &Style)> + '_ {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Primitive { shape, style } => Some((shape, style)),
            DrawCall::Sprite { .. } => None,
        })
    }

    pub fn count_sprites(&self, pred: impl Fn(SpriteId) -> bool) -> usize {
        self.sprites().filter(|(sprite, _, _)| pred(*sprite)).count()
    }

    pub fn count_primitives(&self, pred: impl Fn(&Shape) -> bool) -> usize {
        self.primitives().filter(|(shape, _)| pred(*shape)).count()
    }

    /// Whether any text primitive reads exactly `needle`
    pub fn has_text(&self, needle: &str) -> bool {
        self.primitives()
            .any(|(shape, _)| matches!(shape, Shape::Text { text, .. } if text == needle))
    }
}

impl RenderSurface for RecordingSurface {
    fn draw_sprite(&mut self, sprite: SpriteId, pos: Vec2, size: Vec2) {
        self.calls.push(DrawCall::Sprite { sprite, pos, size });
    }

    fn draw_primitive(&mut self, shape: Shape, style: Style) {
        self.calls.push(DrawCall::Primitive { shape, style });
    }
}
