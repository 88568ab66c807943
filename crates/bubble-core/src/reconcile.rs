//! Merge a refreshed entity list into the live bubble set by id.

use crate::bubble::Bubble;
use crate::constants::{SPAWN_MARGIN_FACTOR, SPAWN_MAX_SPEED};
use crate::entity::Entity;
use crate::size::CanvasMetrics;
use fnv::FnvHashMap;
use glam::Vec2;
use rand::Rng;

/// What one ingestion did to the working set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
    pub rejected: usize,
}

impl IngestReport {
    pub fn changed_membership(&self) -> bool {
        self.created > 0 || self.removed > 0
    }
}

/// Uniform position inside the canvas inset by `radius * 1.2` on every side.
/// Falls back to the center on an axis too small for the margin.
pub fn spawn_position<R: Rng + ?Sized>(radius: f32, canvas: &CanvasMetrics, rng: &mut R) -> Vec2 {
    let margin = radius * SPAWN_MARGIN_FACTOR;
    let mut axis = |extent: f32| {
        let span = extent - 2.0 * margin;
        if span > 0.0 {
            margin + rng.gen::<f32>() * span
        } else {
            extent.max(0.0) / 2.0
        }
    };
    let x = axis(canvas.width);
    let y = axis(canvas.height);
    Vec2::new(x, y)
}

pub fn spawn_velocity<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    Vec2::new(
        rng.gen_range(-SPAWN_MAX_SPEED..=SPAWN_MAX_SPEED),
        rng.gen_range(-SPAWN_MAX_SPEED..=SPAWN_MAX_SPEED),
    )
}

pub fn spawn<R: Rng + ?Sized>(
    entity: Entity,
    radius: f32,
    canvas: &CanvasMetrics,
    rng: &mut R,
) -> Bubble {
    let pos = spawn_position(radius, canvas, rng);
    Bubble::new(pos, spawn_velocity(rng), radius, entity)
}

/// Reconcile `bubbles` against `entities` (unique ids, index-aligned with
/// `radii`).
///
/// Retained bubbles keep their slot, position and velocity and only take the
/// new payload and radius. New ids are appended in list order with a random
/// spawn. Ids missing from `entities` are dropped.
pub fn reconcile<R: Rng + ?Sized>(
    bubbles: &mut Vec<Bubble>,
    entities: Vec<Entity>,
    radii: &[f32],
    canvas: &CanvasMetrics,
    rng: &mut R,
) -> IngestReport {
    debug_assert_eq!(entities.len(), radii.len());
    let mut report = IngestReport::default();

    let index: FnvHashMap<String, usize> = entities
        .iter()
        .enumerate()
        .map(|(i, e)| (e.id().to_string(), i))
        .collect();
    let mut incoming: Vec<Option<(Entity, f32)>> = entities
        .into_iter()
        .zip(radii.iter().copied())
        .map(Some)
        .collect();

    bubbles.retain_mut(|bubble| {
        match index.get(bubble.id()).and_then(|&i| incoming[i].take()) {
            Some((entity, radius)) => {
                bubble.entity = entity;
                bubble.radius = radius;
                report.updated += 1;
                true
            }
            None => {
                report.removed += 1;
                false
            }
        }
    });

    for (entity, radius) in incoming.into_iter().flatten() {
        bubbles.push(spawn(entity, radius, canvas, rng));
        report.created += 1;
    }
    report
}

/// Give every bubble a fresh random position and velocity.
pub fn respawn_all<R: Rng + ?Sized>(bubbles: &mut [Bubble], canvas: &CanvasMetrics, rng: &mut R) {
    for bubble in bubbles.iter_mut() {
        bubble.pos = spawn_position(bubble.radius, canvas, rng);
        bubble.vel = spawn_velocity(rng);
    }
}

/// Pull every bubble back inside `[r, extent - r]` on both axes.
pub fn clamp_into(bubbles: &mut [Bubble], canvas: &CanvasMetrics) {
    for bubble in bubbles.iter_mut() {
        let r = bubble.radius;
        bubble.pos.x = bubble.pos.x.max(r).min(canvas.width - r);
        bubble.pos.y = bubble.pos.y.max(r).min(canvas.height - r);
    }
}
