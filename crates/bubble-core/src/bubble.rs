use crate::entity::Entity;
use glam::Vec2;

/// Long-lived simulation record for one entity.
///
/// The engine keeps the same `Bubble` across data refreshes and only swaps
/// `entity` and `radius`; `pos` and `vel` belong to the physics stepper.
#[derive(Clone, Debug)]
pub struct Bubble {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub entity: Entity,
}

impl Bubble {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, entity: Entity) -> Self {
        Self {
            pos,
            vel,
            radius,
            entity,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        self.entity.id()
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        self.pos.distance(point) < self.radius
    }
}
