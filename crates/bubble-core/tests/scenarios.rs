// Concrete refresh, collision and click scenarios.

use bubble_core::constants::REPULSION_STRENGTH;
use bubble_core::interaction::{click, ClickOutcome};
use bubble_core::physics::{step, PhysicsParams};
use bubble_core::reconcile::reconcile;
use bubble_core::{Bubble, BubbleEngine, CanvasMetrics, Entity, Timeframe, Variant};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

fn token(id: &str, change: f64) -> Entity {
    serde_json::from_value(json!({ "id": id, "symbol": id, "price_change": { "h24": change } }))
        .unwrap()
}

fn at(id: &str, x: f32, y: f32, r: f32) -> Bubble {
    Bubble::new(Vec2::new(x, y), Vec2::ZERO, r, token(id, 1.0))
}

#[test]
fn refresh_cycle_keeps_a_drops_b_adds_c() {
    let canvas = CanvasMetrics::new(1000.0, 1000.0, false);
    let mut rng = StdRng::seed_from_u64(21);
    let mut a = at("A", 10.0, 10.0, 30.0);
    a.vel = Vec2::new(0.2, -0.1);
    let mut bubbles = vec![a, at("B", 50.0, 50.0, 30.0)];

    let variant = Variant::tokens(Timeframe::H24);
    let incoming = vec![token("A", 55.0), token("C", -3.0)];
    let radii = variant.radii(incoming.iter(), &canvas);
    let report = reconcile(&mut bubbles, incoming, &radii, &canvas, &mut rng);

    assert_eq!((report.created, report.updated, report.removed), (1, 1, 1));
    assert_eq!(bubbles.len(), 2);

    let a = &bubbles[0];
    assert_eq!(a.id(), "A");
    assert_eq!(a.pos, Vec2::new(10.0, 10.0));
    assert_eq!(a.vel, Vec2::new(0.2, -0.1));
    assert_eq!(a.radius, radii[0]);
    assert_eq!(a.entity.as_token().unwrap().change(Timeframe::H24), 55.0);

    let c = &bubbles[1];
    assert_eq!(c.id(), "C");
    let margin = c.radius * 1.2;
    assert!(c.pos.x >= margin && c.pos.x <= 1000.0 - margin);
    assert!(c.pos.y >= margin && c.pos.y <= 1000.0 - margin);
    assert!(bubbles.iter().all(|b| b.id() != "B"));
}

#[test]
fn overlapping_pair_separates_without_blowing_up() {
    let bounds = Vec2::new(400.0, 400.0);
    let params = PhysicsParams::default().without_jitter();
    let mut rng = StdRng::seed_from_u64(0);
    let mut bubbles = vec![at("a", 100.0, 100.0, 20.0), at("b", 110.0, 100.0, 20.0)];
    let start = bubbles[0].pos.distance(bubbles[1].pos);

    step(&mut bubbles, bounds, &params, &mut rng);
    let after_one = bubbles[0].pos.distance(bubbles[1].pos);
    assert!(after_one > start);

    for _ in 0..200 {
        step(&mut bubbles, bounds, &params, &mut rng);
        for b in &bubbles {
            assert!(b.vel.length() < 50.0, "runaway velocity {:?}", b.vel);
            assert!(b.pos.x >= b.radius && b.pos.x <= bounds.x - b.radius);
            assert!(b.pos.y >= b.radius && b.pos.y <= bounds.y - b.radius);
        }
    }
}

#[test]
fn click_inside_a_bubble_selects_it_and_moves_nothing() {
    let mut bubbles = vec![at("hit", 100.0, 100.0, 30.0), at("other", 300.0, 300.0, 30.0)];
    let outcome = click(&mut bubbles, Vec2::new(110.0, 105.0), REPULSION_STRENGTH);
    assert_eq!(outcome, ClickOutcome::Selected(0));
    assert!(bubbles.iter().all(|b| b.vel == Vec2::ZERO));
}

#[test]
fn first_hit_wins_on_overlap() {
    let mut bubbles = vec![at("first", 100.0, 100.0, 30.0), at("second", 105.0, 100.0, 30.0)];
    let outcome = click(&mut bubbles, Vec2::new(103.0, 100.0), REPULSION_STRENGTH);
    assert_eq!(outcome, ClickOutcome::Selected(0));
}

#[test]
fn click_on_empty_space_pushes_everything_outward() {
    let origin = Vec2::new(0.0, 100.0);
    let mut bubbles = vec![
        at("near", 50.0, 100.0, 10.0),
        at("mid", 100.0, 100.0, 10.0),
        at("far", 200.0, 100.0, 10.0),
    ];
    let outcome = click(&mut bubbles, origin, REPULSION_STRENGTH);
    assert_eq!(outcome, ClickOutcome::Repelled);

    let speeds: Vec<f32> = bubbles.iter().map(|b| b.vel.length()).collect();
    assert!(speeds.iter().all(|s| *s > 0.0));
    assert!(speeds[0] > speeds[1] && speeds[1] > speeds[2]);
    assert!((speeds[0] - 4.0).abs() < 1e-4);
    for b in &bubbles {
        assert!(b.vel.dot(b.pos - origin) > 0.0, "{} pulled inward", b.id());
    }
}

#[test]
fn engine_click_returns_selected_entity() {
    let mut engine = BubbleEngine::with_seed(Variant::tokens(Timeframe::H24), 8);
    engine.resize(CanvasMetrics::new(600.0, 600.0, false));
    engine.ingest(vec![token("only", 40.0)]);
    let center = engine.bubble("only").unwrap().pos;

    let selected = engine.click(center + Vec2::new(1.0, 1.0)).map(|e| e.id().to_string());
    assert_eq!(selected.as_deref(), Some("only"));

    let far = if center.x > 300.0 {
        Vec2::new(1.0, 1.0)
    } else {
        Vec2::new(599.0, 599.0)
    };
    assert!(engine.click(far).is_none());
    assert!(engine.bubble("only").unwrap().vel.length() > 0.0);
}

#[test]
fn selection_payload_round_trips_to_json() {
    let mut engine = BubbleEngine::with_seed(Variant::Trades, 2);
    engine.resize(CanvasMetrics::new(500.0, 500.0, false));
    let trade: Entity = serde_json::from_value(json!({
        "id": "0xfeed-3", "type": "buy", "amount_usd": 2500.0, "amount_token": 12.5,
        "timestamp": "2024-05-01T12:00:00Z", "tx_hash": "0xfeed",
        "wallet_address": "0xw", "tokenImage": "https://img/ron.png"
    }))
    .unwrap();
    engine.ingest(vec![trade.clone()]);
    let pos = engine.bubbles()[0].pos;
    let picked = engine.click(pos).cloned().unwrap();
    assert_eq!(picked, trade);
    let json = serde_json::to_value(&picked).unwrap();
    assert_eq!(json["type"], "buy");
    assert_eq!(json["wallet_address"], "0xw");
}
