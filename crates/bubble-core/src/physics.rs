//! Per-frame bubble stepper.
//!
//! Deliberately soft: overlaps are resolved by small velocity nudges spread
//! over several frames, which gives the bubbles their jelly-like motion.

use crate::bubble::Bubble;
use crate::constants::*;
use crate::error::ConfigError;
use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhysicsParams {
    pub friction: f32,
    pub restitution: f32,
    pub jitter_probability: f64,
    pub jitter_amplitude: f32,
    pub collision_factor: f32,
    pub repulsion_strength: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            friction: FRICTION,
            restitution: RESTITUTION,
            jitter_probability: JITTER_PROBABILITY,
            jitter_amplitude: JITTER_AMPLITUDE,
            collision_factor: COLLISION_FACTOR,
            repulsion_strength: REPULSION_STRENGTH,
        }
    }
}

impl PhysicsParams {
    /// Same parameters without the random perturbation; used for reproducible runs.
    pub fn without_jitter(self) -> Self {
        Self {
            jitter_probability: 0.0,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.friction.is_nan() || self.friction <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "friction",
                value: self.friction as f64,
            });
        }
        if self.repulsion_strength.is_nan() || self.repulsion_strength <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "repulsion_strength",
                value: self.repulsion_strength as f64,
            });
        }
        Ok(())
    }
}

/// Advance every bubble by one frame inside a `bounds` sized canvas.
///
/// Each bubble is integrated, contained, damped and jittered before it is
/// tested against the bubbles after it, so later bubbles feel this frame's
/// collision impulses when their own turn comes.
pub fn step<R: Rng + ?Sized>(
    bubbles: &mut [Bubble],
    bounds: Vec2,
    params: &PhysicsParams,
    rng: &mut R,
) {
    for i in 0..bubbles.len() {
        let (head, tail) = bubbles.split_at_mut(i + 1);
        let bubble = &mut head[i];

        bubble.pos += bubble.vel;
        resolve_bounds(bubble, bounds, params.restitution);
        bubble.vel *= params.friction;
        jitter(bubble, params, rng);

        for other in tail.iter_mut() {
            collide(bubble, other, params.collision_factor);
        }
    }
}

/// Reflect and clamp a bubble that crossed a wall.
#[inline]
pub fn resolve_bounds(bubble: &mut Bubble, bounds: Vec2, restitution: f32) {
    let r = bubble.radius;
    if bubble.pos.x - r < 0.0 || bubble.pos.x + r > bounds.x {
        bubble.vel.x *= -restitution;
        bubble.pos.x = bubble.pos.x.max(r).min(bounds.x - r);
    }
    if bubble.pos.y - r < 0.0 || bubble.pos.y + r > bounds.y {
        bubble.vel.y *= -restitution;
        bubble.pos.y = bubble.pos.y.max(r).min(bounds.y - r);
    }
}

#[inline]
fn jitter<R: Rng + ?Sized>(bubble: &mut Bubble, params: &PhysicsParams, rng: &mut R) {
    let p = params.jitter_probability.clamp(0.0, 1.0);
    if p > 0.0 && rng.gen_bool(p) {
        let a = params.jitter_amplitude.abs();
        bubble.vel += Vec2::new(rng.gen_range(-a..=a), rng.gen_range(-a..=a));
    }
}

/// Nudge an overlapping pair apart. Returns whether they overlapped.
pub fn collide(a: &mut Bubble, b: &mut Bubble, factor: f32) -> bool {
    let delta = b.pos - a.pos;
    let distance = delta.length();
    let min_distance = a.radius + b.radius;
    if distance >= min_distance {
        return false;
    }
    let angle = delta.y.atan2(delta.x);
    let target = a.pos + Vec2::new(angle.cos(), angle.sin()) * min_distance;
    let impulse = (target - b.pos) * factor;
    a.vel -= impulse;
    b.vel += impulse;
    true
}

/// One collision pass over every unordered pair; returns the overlap count.
pub fn resolve_collisions(bubbles: &mut [Bubble], factor: f32) -> usize {
    let mut overlaps = 0;
    for i in 0..bubbles.len() {
        let (head, tail) = bubbles.split_at_mut(i + 1);
        for other in tail.iter_mut() {
            if collide(&mut head[i], other, factor) {
                overlaps += 1;
            }
        }
    }
    overlaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, Token};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bubble(id: &str, x: f32, y: f32, r: f32) -> Bubble {
        let token: Token =
            serde_json::from_value(serde_json::json!({ "id": id, "symbol": id })).unwrap();
        Bubble::new(Vec2::new(x, y), Vec2::ZERO, r, Entity::Token(token))
    }

    #[test]
    fn wall_hit_reflects_and_clamps() {
        let mut b = bubble("a", 5.0, 50.0, 10.0);
        b.vel = Vec2::new(-2.0, 0.0);
        resolve_bounds(&mut b, Vec2::new(100.0, 100.0), RESTITUTION);
        assert_eq!(b.pos.x, 10.0);
        assert!((b.vel.x - 1.6).abs() < 1e-6);
    }

    #[test]
    fn friction_decays_velocity_without_jitter() {
        let mut bubbles = vec![bubble("a", 50.0, 50.0, 10.0)];
        bubbles[0].vel = Vec2::new(1.0, 0.0);
        let params = PhysicsParams::default().without_jitter();
        let mut rng = StdRng::seed_from_u64(1);
        step(&mut bubbles, Vec2::new(200.0, 200.0), &params, &mut rng);
        assert_eq!(bubbles[0].pos, Vec2::new(51.0, 50.0));
        assert!((bubbles[0].vel.x - FRICTION).abs() < 1e-6);
    }

    #[test]
    fn overlapping_pair_gets_opposite_impulses() {
        let mut a = bubble("a", 100.0, 100.0, 20.0);
        let mut b = bubble("b", 110.0, 100.0, 20.0);
        assert!(collide(&mut a, &mut b, COLLISION_FACTOR));
        assert!(a.vel.x < 0.0 && b.vel.x > 0.0);
        assert!((a.vel + b.vel).length() < 1e-6);
        assert!((b.vel.x - 1.5).abs() < 1e-5);
    }

    #[test]
    fn separated_pair_is_untouched() {
        let mut bubbles = vec![bubble("a", 0.0, 0.0, 5.0), bubble("b", 20.0, 0.0, 5.0)];
        assert_eq!(resolve_collisions(&mut bubbles, COLLISION_FACTOR), 0);
        assert_eq!(bubbles[0].vel, Vec2::ZERO);
    }

    #[test]
    fn jitter_stays_within_amplitude() {
        let params = PhysicsParams {
            jitter_probability: 1.0,
            friction: 1.0,
            ..PhysicsParams::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        let mut b = bubble("a", 50.0, 50.0, 5.0);
        for _ in 0..100 {
            b.vel = Vec2::ZERO;
            jitter(&mut b, &params, &mut rng);
            assert!(b.vel.x.abs() <= JITTER_AMPLITUDE && b.vel.y.abs() <= JITTER_AMPLITUDE);
        }
    }

    #[test]
    fn jitter_fires_at_configured_rate() {
        let frames = 20_000;
        let count_kicks = |params: &PhysicsParams, seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut b = bubble("a", 50.0, 50.0, 5.0);
            let mut kicked = 0;
            for _ in 0..frames {
                b.vel = Vec2::ZERO;
                jitter(&mut b, params, &mut rng);
                if b.vel != Vec2::ZERO {
                    kicked += 1;
                }
            }
            kicked
        };

        let defaults = PhysicsParams::default();
        let share = count_kicks(&defaults, 11) as f64 / frames as f64;
        assert!(
            (share - JITTER_PROBABILITY).abs() < 0.01,
            "jitter share {} far from {}",
            share,
            JITTER_PROBABILITY
        );
        assert_eq!(count_kicks(&defaults.without_jitter(), 11), 0);
    }

    #[test]
    fn params_reject_non_positive_friction() {
        let params = PhysicsParams {
            friction: 0.0,
            ..PhysicsParams::default()
        };
        assert!(params.validate().is_err());
        assert!(PhysicsParams::default().validate().is_ok());
    }
}
