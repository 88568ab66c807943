use glam::Vec2;
use web_sys as web;

/// Canvas layout size in CSS pixels and the device pixel ratio its backing
/// store is scaled by. The engine only ever sees `css`; `dpr` is applied to
/// the backing store and the draw transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasScale {
    pub css: Vec2,
    pub dpr: f64,
}

impl Default for CanvasScale {
    fn default() -> Self {
        Self {
            css: Vec2::ZERO,
            dpr: 1.0,
        }
    }
}

impl CanvasScale {
    /// A box without layout gets a zero extent so the engine treats it as not ready.
    pub fn new(css_width: f64, css_height: f64, dpr: f64, max_dpr: f64) -> Self {
        let extent = |css: f64| {
            if css.is_finite() && css > 0.0 {
                css as f32
            } else {
                0.0
            }
        };
        Self {
            css: Vec2::new(extent(css_width), extent(css_height)),
            dpr: clamp_dpr(dpr, max_dpr),
        }
    }

    /// Backing-store width/height attributes for this scale.
    pub fn backing(&self, min_px: u32) -> (u32, u32) {
        backing_size(self.css.x as f64, self.css.y as f64, self.dpr, min_px, self.dpr)
    }
}

#[inline]
pub fn clamp_dpr(dpr: f64, max_dpr: f64) -> f64 {
    if dpr.is_finite() && dpr > 0.0 {
        dpr.min(max_dpr)
    } else {
        1.0
    }
}

/// Map a CSS client position onto a canvas of `logical` size.
///
/// `rect_origin`/`rect_size` are the canvas bounding rect in CSS pixels.
/// Returns `None` while the canvas has no layout box (detached or display:none).
#[inline]
pub fn client_to_canvas(client: Vec2, rect_origin: Vec2, rect_size: Vec2, logical: Vec2) -> Option<Vec2> {
    if !rect_size.cmpgt(Vec2::ZERO).all() {
        return None;
    }
    let local = client - rect_origin;
    let p = local / rect_size * logical;
    p.is_finite().then_some(p)
}

/// Pointer position in the CSS pixel space the engine simulates in.
#[inline]
pub fn pointer_canvas_css(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement, logical: Vec2) -> Option<Vec2> {
    if !canvas.is_connected() {
        return None;
    }
    let rect = canvas.get_bounding_client_rect();
    client_to_canvas(
        Vec2::new(ev.client_x() as f32, ev.client_y() as f32),
        Vec2::new(rect.left() as f32, rect.top() as f32),
        Vec2::new(rect.width() as f32, rect.height() as f32),
        logical,
    )
}

/// Backing-store size for a CSS box at the given device pixel ratio.
/// A box without layout maps to 0.
#[inline]
pub fn backing_size(css_width: f64, css_height: f64, dpr: f64, min_px: u32, max_dpr: f64) -> (u32, u32) {
    let dpr = clamp_dpr(dpr, max_dpr);
    let px = |css: f64| {
        if css.is_finite() && css > 0.0 {
            ((css * dpr).round() as u32).max(min_px)
        } else {
            0
        }
    };
    (px(css_width), px(css_height))
}
