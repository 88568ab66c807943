// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use bubble_core::{BubbleEngine, CanvasMetrics, Entity, Timeframe, Variant};
use glam::Vec2;
use input::*;

#[test]
fn client_point_maps_onto_logical_size() {
    // 400x300 CSS box at (10, 20) mapped onto an 800x600 surface
    let p = client_to_canvas(
        Vec2::new(110.0, 70.0),
        Vec2::new(10.0, 20.0),
        Vec2::new(400.0, 300.0),
        Vec2::new(800.0, 600.0),
    );
    assert_eq!(p, Some(Vec2::new(200.0, 100.0)));
}

#[test]
fn client_point_outside_the_box_is_not_clamped() {
    let p = client_to_canvas(
        Vec2::new(0.0, 0.0),
        Vec2::new(10.0, 20.0),
        Vec2::new(100.0, 100.0),
        Vec2::new(100.0, 100.0),
    )
    .unwrap();
    assert_eq!(p, Vec2::new(-10.0, -20.0));
}

#[test]
fn detached_canvas_yields_no_point() {
    let none = client_to_canvas(Vec2::ONE, Vec2::ZERO, Vec2::new(0.0, 300.0), Vec2::ONE);
    assert!(none.is_none());
    let nan = client_to_canvas(Vec2::ONE, Vec2::ZERO, Vec2::new(f32::NAN, 1.0), Vec2::ONE);
    assert!(nan.is_none());
}

#[test]
fn backing_size_scales_by_device_pixel_ratio() {
    assert_eq!(backing_size(400.0, 300.0, 2.0, 1, 3.0), (800, 600));
    assert_eq!(backing_size(400.5, 300.0, 1.0, 1, 3.0), (401, 300));
}

#[test]
fn backing_size_caps_ratio_and_rejects_bad_input() {
    assert_eq!(backing_size(100.0, 100.0, 4.0, 1, 3.0), (300, 300));
    assert_eq!(backing_size(100.0, 100.0, f64::NAN, 1, 3.0), (100, 100));
    assert_eq!(backing_size(0.2, 100.0, 1.0, 1, 3.0), (1, 100));
}

#[test]
fn unlaid_out_canvas_reports_zero_size() {
    assert_eq!(backing_size(0.0, 0.0, 2.0, 1, 3.0), (0, 0));
    assert_eq!(backing_size(-5.0, f64::INFINITY, 2.0, 1, 3.0), (0, 0));
}

#[test]
fn canvas_scale_keeps_css_size_and_caps_ratio() {
    let scale = CanvasScale::new(400.0, 300.0, 2.0, 3.0);
    assert_eq!(scale.css, Vec2::new(400.0, 300.0));
    assert_eq!(scale.backing(1), (800, 600));

    let dense = CanvasScale::new(400.0, 300.0, 4.0, 3.0);
    assert_eq!(dense.css, Vec2::new(400.0, 300.0));
    assert_eq!(dense.dpr, 3.0);
    assert_eq!(dense.backing(1), (1200, 900));

    let hidden = CanvasScale::new(0.0, f64::NAN, 2.0, 3.0);
    assert_eq!(hidden.css, Vec2::ZERO);
    assert_eq!(hidden.backing(1), (0, 0));
    assert_eq!(CanvasScale::new(10.0, 10.0, f64::NAN, 3.0).dpr, 1.0);
}

fn mobile_engine_at(dpr: f64) -> BubbleEngine {
    let scale = CanvasScale::new(800.0, 600.0, dpr, 3.0);
    let mut engine = BubbleEngine::with_seed(Variant::tokens(Timeframe::H24), 5);
    engine.resize(CanvasMetrics::new(scale.css.x, scale.css.y, true));
    let token: Entity = serde_json::from_value(serde_json::json!({
        "id": "a", "symbol": "AAA", "price_change": { "h24": 0.0 }
    }))
    .unwrap();
    engine.ingest(vec![token]);
    engine
}

#[test]
fn simulation_constants_hold_at_any_pixel_ratio() {
    for dpr in [1.0, 2.0, 3.0] {
        let mut engine = mobile_engine_at(dpr);
        let scale = CanvasScale::new(800.0, 600.0, dpr, 3.0);
        let (pos, vel, radius) = {
            let b = &engine.bubbles()[0];
            (b.pos, b.vel, b.radius)
        };

        // 30 * sqrt(800 * 600) / 1000 plus the flat mobile boost
        assert!((radius - (30.0 * 480_000f32.sqrt() / 1000.0 + 10.0)).abs() < 1e-3, "dpr {}", dpr);

        // Click 100 CSS px to the side, through the same mapping the pointer uses.
        let dx = if pos.x > 400.0 { -100.0 } else { 100.0 };
        let origin = Vec2::new(30.0, 40.0);
        let client = origin + pos + Vec2::new(dx, 0.0);
        let point = client_to_canvas(client, origin, scale.css, scale.css).unwrap();
        assert!((point - (pos + Vec2::new(dx, 0.0))).length() < 1e-3);

        assert!(engine.click(point).is_none());
        let kick = engine.bubbles()[0].vel - vel;
        assert!((kick.length() - 2.0).abs() < 1e-3, "dpr {}: {}", dpr, kick.length());
    }
}
