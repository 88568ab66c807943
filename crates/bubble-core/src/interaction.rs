use crate::bubble::Bubble;
use crate::constants::REPULSION_MIN_DISTANCE;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClickOutcome {
    /// Index of the first bubble under the pointer.
    Selected(usize),
    /// Nothing was hit; every bubble got pushed away from the pointer.
    Repelled,
    /// No bubbles to hit or push.
    Ignored,
}

/// First bubble (in working-set order) whose disc contains `point`.
pub fn hit_test(bubbles: &[Bubble], point: Vec2) -> Option<usize> {
    bubbles.iter().position(|b| b.contains(point))
}

/// Velocity delta pushing a bubble at `pos` away from `origin`.
#[inline]
pub fn repulsion_impulse(pos: Vec2, origin: Vec2, strength: f32) -> Vec2 {
    let delta = pos - origin;
    let force = strength / delta.length().max(REPULSION_MIN_DISTANCE);
    let angle = delta.y.atan2(delta.x);
    Vec2::new(angle.cos(), angle.sin()) * force
}

pub fn repel(bubbles: &mut [Bubble], origin: Vec2, strength: f32) {
    for bubble in bubbles.iter_mut() {
        bubble.vel += repulsion_impulse(bubble.pos, origin, strength);
    }
}

/// Select on a hit, otherwise repel everything from the click point.
pub fn click(bubbles: &mut [Bubble], point: Vec2, strength: f32) -> ClickOutcome {
    if bubbles.is_empty() || !point.is_finite() {
        return ClickOutcome::Ignored;
    }
    match hit_test(bubbles, point) {
        Some(i) => ClickOutcome::Selected(i),
        None => {
            repel(bubbles, point, strength);
            ClickOutcome::Repelled
        }
    }
}
