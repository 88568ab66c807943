use crate::constants::*;
use crate::images::ImageStore;
use bubble_core::{Bubble, BubbleEngine, BubbleLayout, BubbleStyle};
use chrono::{DateTime, Utc};
use web_sys as web;

/// Clear the whole backing store, whatever transform is current.
pub fn clear(ctx: &web::CanvasRenderingContext2d, backing: (f64, f64)) {
    _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
    ctx.clear_rect(0.0, 0.0, backing.0, backing.1);
}

/// Draw every live bubble. Bubble geometry is in CSS pixels, so the context
/// is scaled by `dpr` onto the backing store. Styles are recomputed from the
/// whole set first, since token coloring depends on the current population.
pub fn draw_frame(
    ctx: &web::CanvasRenderingContext2d,
    backing: (f64, f64),
    dpr: f64,
    engine: &BubbleEngine,
    images: &ImageStore,
    now: DateTime<Utc>,
) {
    clear(ctx, backing);
    if ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0).is_err() {
        return;
    }
    let styles = engine.styles();
    let layouts = engine.layouts(now);
    let variant = engine.variant();
    for ((bubble, style), layout) in engine.bubbles().iter().zip(&styles).zip(&layouts) {
        let icon = variant
            .image_key(&bubble.entity)
            .and_then(|url| images.get(url));
        draw_bubble(ctx, bubble, style, layout, icon.as_ref());
    }
}

fn draw_bubble(
    ctx: &web::CanvasRenderingContext2d,
    bubble: &Bubble,
    style: &BubbleStyle,
    layout: &BubbleLayout,
    icon: Option<&web::HtmlImageElement>,
) {
    let (x, y, r) = (
        bubble.pos.x as f64,
        bubble.pos.y as f64,
        bubble.radius as f64,
    );

    ctx.begin_path();
    if ctx.arc(x, y, r, 0.0, FULL_TURN).is_err() {
        return;
    }
    ctx.set_fill_style_str(&style.fill.to_string());
    ctx.fill();

    let glow = style.glow.to_string();
    ctx.set_shadow_blur(style.shadow_blur as f64);
    ctx.set_shadow_color(&glow);
    ctx.set_stroke_style_str(&glow);
    ctx.set_line_width(style.line_width as f64);
    ctx.stroke();
    reset_shadow(ctx);

    if let Some(img) = icon {
        let rect = layout.icon;
        _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
            img,
            x + rect.top_left.x as f64,
            y + rect.top_left.y as f64,
            rect.size as f64,
            rect.size as f64,
        );
    }

    ctx.set_text_align(TEXT_ALIGN);
    ctx.set_text_baseline(TEXT_BASELINE);
    ctx.set_shadow_color(TEXT_SHADOW_COLOR);
    ctx.set_shadow_blur(TEXT_SHADOW_BLUR);
    ctx.set_shadow_offset_x(TEXT_SHADOW_OFFSET);
    ctx.set_shadow_offset_y(TEXT_SHADOW_OFFSET);
    for line in &layout.lines {
        ctx.set_font(&line.font());
        ctx.set_fill_style_str(&line.color.to_string());
        _ = ctx.fill_text(&line.text, x, y + line.offset_y as f64);
    }
    reset_shadow(ctx);
}

/// Shadow state is sticky on the context; clear it so it never bleeds into
/// the next bubble.
fn reset_shadow(ctx: &web::CanvasRenderingContext2d) {
    ctx.set_shadow_blur(0.0);
    ctx.set_shadow_color(NO_SHADOW_COLOR);
    ctx.set_shadow_offset_x(0.0);
    ctx.set_shadow_offset_y(0.0);
}
