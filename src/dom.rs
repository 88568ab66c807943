use crate::constants::{MAX_DEVICE_PIXEL_RATIO, MIN_BACKING_PX};
use crate::input::CanvasScale;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Resize the canvas backing store to its CSS size times devicePixelRatio.
/// Returns the CSS size and the ratio that was applied.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> CanvasScale {
    let dpr = web::window().map_or(1.0, |w| w.device_pixel_ratio());
    let rect = canvas.get_bounding_client_rect();
    let scale = CanvasScale::new(rect.width(), rect.height(), dpr, MAX_DEVICE_PIXEL_RATIO);
    let (w_px, h_px) = scale.backing(MIN_BACKING_PX);
    if canvas.width() != w_px {
        canvas.set_width(w_px);
    }
    if canvas.height() != h_px {
        canvas.set_height(h_px);
    }
    scale
}

/// Window inner width in CSS pixels.
pub fn viewport_width() -> Option<f64> {
    web::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
}

pub fn context_2d(canvas: &web::HtmlCanvasElement) -> anyhow::Result<web::CanvasRenderingContext2d> {
    let ctx = canvas
        .get_context("2d")
        .map_err(|e| anyhow::anyhow!("get_context(2d) failed: {:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("canvas has no 2d context"))?;
    ctx.dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|e| anyhow::anyhow!("not a 2d context: {:?}", e))
}
