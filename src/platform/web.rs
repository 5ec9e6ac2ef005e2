//! Browser backend: canvas 2D drawing, timestamps and page visibility

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::SafeZone;
use crate::renderer::shapes::{self, Shape, Style};
use crate::renderer::{RenderSurface, SpriteId};

/// Wall-clock milliseconds since the epoch, for score timestamps
pub fn timestamp_ms() -> f64 {
    js_sys::Date::now()
}

pub fn page_hidden() -> bool {
    web_sys::window()
        .and_then(|w| w.document())
        .is_some_and(|d| d.visibility_state() == web_sys::VisibilityState::Hidden)
}

/// `RenderSurface` over a `<canvas>` 2D context.
///
/// The safe zone is letterboxed into the canvas: uniformly scaled to fit and
/// centered, so every player sees the same play area.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    scale: f64,
    offset: Vec2,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            canvas,
            ctx,
            scale: 1.0,
            offset: Vec2::ZERO,
        })
    }

    /// Match the backing store to the element size and refit the zone
    pub fn fit(&mut self, zone: &SafeZone) {
        let width = self.canvas.client_width().max(1) as u32;
        let height = self.canvas.client_height().max(1) as u32;
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            log::debug!("Canvas resized to {}x{}", width, height);
        }

        let sx = width as f64 / zone.size.x as f64;
        let sy = height as f64 / zone.size.y as f64;
        self.scale = sx.min(sy);
        let drawn = zone.size * self.scale as f32;
        let canvas_size = Vec2::new(width as f32, height as f32);
        self.offset = (canvas_size - drawn) / 2.0 - zone.origin * self.scale as f32;
    }

    /// Clear to black and set the zone transform
    pub fn begin_frame(&mut self) {
        let _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        self.ctx.set_fill_style_str("#000");
        self.ctx
            .fill_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);
        let _ = self.ctx.set_transform(
            self.scale,
            0.0,
            0.0,
            self.scale,
            self.offset.x as f64,
            self.offset.y as f64,
        );
    }

    fn fill_text(&self, text: &str, pos: Vec2, size: f32, css: &str) {
        self.ctx.set_fill_style_str(css);
        self.ctx.set_font(&format!("bold {}px monospace", size.round()));
        self.ctx.set_text_align("center");
        let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
    }
}

impl RenderSurface for CanvasSurface {
    fn draw_sprite(&mut self, sprite: SpriteId, pos: Vec2, size: Vec2) {
        let css = shapes::to_css(shapes::sprite_color(sprite));
        self.ctx.set_fill_style_str(&css);
        self.ctx
            .fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);

        if let SpriteId::PowerUp(kind) = sprite {
            let label = kind.symbol().to_string();
            let center = pos + size / 2.0;
            let baseline = center + Vec2::new(0.0, size.y * 0.25);
            self.fill_text(&label, baseline, size.y * 0.6, "#000");
        }
    }

    fn draw_primitive(&mut self, shape: Shape, style: Style) {
        let css = shapes::to_css(style.color);
        match shape {
            Shape::Rect { pos, size } => match style.stroke {
                Some(width) => {
                    self.ctx.set_stroke_style_str(&css);
                    self.ctx.set_line_width(width as f64);
                    self.ctx
                        .stroke_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
                }
                None => {
                    self.ctx.set_fill_style_str(&css);
                    self.ctx
                        .fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
                }
            },
            Shape::Circle { center, radius } => {
                self.ctx.begin_path();
                let _ = self.ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    radius as f64,
                    0.0,
                    std::f64::consts::TAU,
                );
                match style.stroke {
                    Some(width) => {
                        self.ctx.set_stroke_style_str(&css);
                        self.ctx.set_line_width(width as f64);
                        self.ctx.stroke();
                    }
                    None => {
                        self.ctx.set_fill_style_str(&css);
                        self.ctx.fill();
                    }
                }
            }
            Shape::Text { pos, text, size } => self.fill_text(&text, pos, size, &css),
        }
    }
}
