//! One bubble view: the live working set plus everything needed to advance
//! and present it frame by frame.

use crate::bubble::Bubble;
use crate::color::BubbleStyle;
use crate::config::EngineParams;
use crate::entity::{Entity, Timeframe};
use crate::error::EntityError;
use crate::interaction::{self, ClickOutcome};
use crate::label::BubbleLayout;
use crate::physics::{self, PhysicsParams};
use crate::reconcile::{clamp_into, reconcile, respawn_all, IngestReport};
use crate::size::CanvasMetrics;
use crate::variant::Variant;
use chrono::{DateTime, Utc};
use fnv::FnvHashSet;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// No entities: nothing is stepped or drawn.
    Empty,
    Active,
}

pub struct BubbleEngine {
    variant: Variant,
    physics: PhysicsParams,
    canvas: CanvasMetrics,
    bubbles: Vec<Bubble>,
    rng: StdRng,
    state: EngineState,
    clear_pending: bool,
}

impl BubbleEngine {
    pub fn new(variant: Variant, params: EngineParams) -> Self {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            variant,
            physics: params.physics,
            canvas: CanvasMetrics::default(),
            bubbles: Vec::new(),
            rng,
            state: EngineState::Empty,
            clear_pending: false,
        }
    }

    /// Deterministic engine with default physics.
    pub fn with_seed(variant: Variant, seed: u64) -> Self {
        Self::new(
            variant,
            EngineParams {
                physics: PhysicsParams::default(),
                seed: Some(seed),
            },
        )
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == EngineState::Active
    }

    pub fn canvas(&self) -> CanvasMetrics {
        self.canvas
    }

    pub fn physics(&self) -> &PhysicsParams {
        &self.physics
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    pub fn bubble(&self, id: &str) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.id() == id)
    }

    /// Replace the dataset. Invalid, foreign and duplicate records are
    /// skipped with a warning; the first record wins for a repeated id.
    pub fn ingest(&mut self, entities: Vec<Entity>) -> IngestReport {
        let mut rejected = 0;
        let mut seen = FnvHashSet::default();
        let mut accepted = Vec::with_capacity(entities.len());
        for entity in entities {
            let checked = entity
                .validate()
                .and_then(|_| self.variant.check_kind(&entity))
                .and_then(|_| {
                    if seen.insert(entity.id().to_string()) {
                        Ok(())
                    } else {
                        Err(EntityError::Duplicate(entity.id().to_string()))
                    }
                });
            match checked {
                Ok(()) => accepted.push(entity),
                Err(err) => {
                    log::warn!("skipping {} record: {}", self.variant.kind_name(), err);
                    rejected += 1;
                }
            }
        }

        let radii = self.variant.radii(accepted.iter(), &self.canvas);
        let mut report = reconcile(
            &mut self.bubbles,
            accepted,
            &radii,
            &self.canvas,
            &mut self.rng,
        );
        report.rejected = rejected;
        log::debug!("{} ingest: {:?}", self.variant.kind_name(), report);
        self.sync_state();
        report
    }

    /// Adopt new canvas metrics. The first usable size respawns every bubble;
    /// later changes only resize and clamp.
    pub fn resize(&mut self, canvas: CanvasMetrics) {
        if canvas == self.canvas {
            return;
        }
        let was_usable = self.canvas.is_usable();
        self.canvas = canvas;
        self.recompute_radii();
        if !canvas.is_usable() {
            return;
        }
        if was_usable {
            clamp_into(&mut self.bubbles, &canvas);
        } else {
            log::info!(
                "{} canvas ready at {}x{}",
                self.variant.kind_name(),
                canvas.width,
                canvas.height
            );
            respawn_all(&mut self.bubbles, &canvas, &mut self.rng);
        }
    }

    /// Switch the token timeframe and resize in place. No-op for trades.
    pub fn set_timeframe(&mut self, timeframe: Timeframe) -> bool {
        match self.variant {
            Variant::Tokens { timeframe: current } if current != timeframe => {
                self.variant = Variant::Tokens { timeframe };
                self.recompute_radii();
                true
            }
            _ => false,
        }
    }

    pub fn step(&mut self) {
        if self.state == EngineState::Empty || !self.canvas.is_usable() {
            return;
        }
        let bounds = Vec2::new(self.canvas.width, self.canvas.height);
        physics::step(&mut self.bubbles, bounds, &self.physics, &mut self.rng);
    }

    /// Per-bubble styles for this frame, index-aligned with `bubbles()`.
    pub fn styles(&self) -> Vec<BubbleStyle> {
        self.variant.styles(&self.bubbles)
    }

    pub fn layouts(&self, now: DateTime<Utc>) -> Vec<BubbleLayout> {
        self.bubbles
            .iter()
            .map(|b| self.variant.layout(b, self.canvas.mobile, now))
            .collect()
    }

    /// Icon URLs referenced by the live set.
    pub fn image_urls(&self) -> impl Iterator<Item = &str> + '_ {
        self.bubbles
            .iter()
            .filter_map(move |b| self.variant.image_key(&b.entity))
    }

    /// Resolve a click in canvas pixels. Returns the selected entity, or
    /// `None` after repelling the bubbles from an empty spot.
    pub fn click(&mut self, point: Vec2) -> Option<&Entity> {
        if !self.canvas.is_usable() {
            return None;
        }
        let strength = self.physics.repulsion_strength;
        match interaction::click(&mut self.bubbles, point, strength) {
            ClickOutcome::Selected(i) => self.bubbles.get(i).map(|b| &b.entity),
            ClickOutcome::Repelled | ClickOutcome::Ignored => None,
        }
    }

    /// True exactly once after the view went from active to empty.
    pub fn take_clear_request(&mut self) -> bool {
        std::mem::take(&mut self.clear_pending)
    }

    fn recompute_radii(&mut self) {
        let radii = self
            .variant
            .radii(self.bubbles.iter().map(|b| &b.entity), &self.canvas);
        for (bubble, radius) in self.bubbles.iter_mut().zip(radii) {
            bubble.radius = radius;
        }
    }

    fn sync_state(&mut self) {
        let next = if self.bubbles.is_empty() {
            EngineState::Empty
        } else {
            EngineState::Active
        };
        if next == self.state {
            return;
        }
        if next == EngineState::Empty {
            self.clear_pending = true;
        }
        log::info!(
            "{} view {:?} -> {:?}",
            self.variant.kind_name(),
            self.state,
            next
        );
        self.state = next;
    }
}
