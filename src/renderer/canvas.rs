//! Draws a display list onto a `CanvasRenderingContext2d`

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::shapes::{STAR_COUNT, Shape, Starfield, frame_shapes};
use crate::sim::GameState;

/// Canvas 2D render state
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    stars: Starfield,
    pub size: (u32, u32),
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement, star_seed: u64) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let size = (canvas.width(), canvas.height());
        Ok(Self {
            canvas,
            ctx,
            stars: Starfield::new(star_seed, STAR_COUNT),
            size,
        })
    }

    /// Match the backing store to the element's CSS size
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != self.size {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            self.size = (width, height);
            log::info!("Canvas resized to {}x{}", width, height);
        }
    }

    /// Render the current frame
    pub fn render(&self, state: &GameState, time_ms: f64) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, self.size.0 as f64, self.size.1 as f64);
        for shape in frame_shapes(state, &self.stars, time_ms) {
            self.draw(&shape)?;
        }
        Ok(())
    }

    fn draw(&self, shape: &Shape) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        match shape {
            Shape::Rect { pos, size, color } => {
                ctx.set_fill_style_str(&color.css());
                ctx.fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
            }
            Shape::RotatedRect {
                origin,
                angle,
                offset,
                size,
                color,
            } => {
                ctx.save();
                ctx.translate(origin.x as f64, origin.y as f64)?;
                ctx.rotate(*angle as f64)?;
                ctx.set_fill_style_str(&color.css());
                ctx.fill_rect(
                    offset.x as f64,
                    offset.y as f64,
                    size.x as f64,
                    size.y as f64,
                );
                ctx.restore();
            }
            Shape::Circle {
                center,
                radius,
                color,
            } => {
                ctx.set_fill_style_str(&color.css());
                ctx.begin_path();
                ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)?;
                ctx.fill();
            }
            Shape::Ellipse {
                center,
                radii,
                rotation,
                color,
            } => {
                ctx.set_fill_style_str(&color.css());
                ctx.begin_path();
                ctx.ellipse(
                    center.x as f64,
                    center.y as f64,
                    radii.x as f64,
                    radii.y as f64,
                    *rotation as f64,
                    0.0,
                    TAU,
                )?;
                ctx.fill();
            }
            Shape::Glow {
                center,
                inner,
                outer,
                inner_color,
                outer_color,
            } => {
                let (x, y) = (center.x as f64, center.y as f64);
                let gradient =
                    ctx.create_radial_gradient(x, y, *inner as f64, x, y, *outer as f64)?;
                gradient.add_color_stop(0.0, &inner_color.css())?;
                gradient.add_color_stop(1.0, &outer_color.css())?;
                ctx.set_fill_style_canvas_gradient(&gradient);
                ctx.begin_path();
                ctx.arc(x, y, *outer as f64, 0.0, TAU)?;
                ctx.fill();
            }
            Shape::Line {
                from,
                to,
                color,
                dashed,
            } => {
                if *dashed {
                    let dash = js_sys::Array::of2(&JsValue::from(4.0), &JsValue::from(6.0));
                    ctx.set_line_dash(&dash)?;
                }
                ctx.set_stroke_style_str(&color.css());
                ctx.begin_path();
                ctx.move_to(from.x as f64, from.y as f64);
                ctx.line_to(to.x as f64, to.y as f64);
                ctx.stroke();
                if *dashed {
                    ctx.set_line_dash(&js_sys::Array::new())?;
                }
            }
        }
        Ok(())
    }
}
