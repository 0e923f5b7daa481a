//! Confetti drawn on the page's 2D canvas

use effects::ConfettiCanvas;
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

pub struct CanvasConfetti {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasConfetti {
    /// Attach to the canvas matching `selector`; `None` if it is missing
    pub fn attach(document: &Document, selector: &str) -> Option<Self> {
        let canvas: HtmlCanvasElement = document
            .query_selector(selector)
            .ok()
            .flatten()?
            .dyn_into()
            .ok()?;
        let context: CanvasRenderingContext2d =
            canvas.get_context("2d").ok().flatten()?.dyn_into().ok()?;
        Some(Self { canvas, context })
    }
}

impl ConfettiCanvas for CanvasConfetti {
    fn clear(&mut self, width: f32, height: f32) {
        let (width, height) = (width as u32, height as u32);
        if self.canvas.width() != width {
            self.canvas.set_width(width);
        }
        if self.canvas.height() != height {
            self.canvas.set_height(height);
        }
        self.context
            .clear_rect(0.0, 0.0, f64::from(width), f64::from(height));
    }

    fn fill_piece(&mut self, position: Vec2, rotation: f32, size: f32, color: &str) {
        let ctx = &self.context;
        let half = f64::from(size) / 2.0;
        ctx.save();
        let _ = ctx.translate(f64::from(position.x), f64::from(position.y));
        let _ = ctx.rotate(f64::from(rotation).to_radians());
        ctx.set_fill_style_str(color);
        ctx.fill_rect(-half, -half, f64::from(size), f64::from(size));
        ctx.restore();
    }
}
