//! The per-variant seam of the shared pipeline: which metric sizes a
//! bubble, how the live set is colored, and how a bubble is labelled.

use crate::bubble::Bubble;
use crate::color::{token_styles, trade_style, BubbleStyle};
use crate::constants::PERCENT_CHANGE_CAP;
use crate::entity::{Entity, Timeframe, Token, Trade};
use crate::error::EntityError;
use crate::label::{token_layout, trade_layout, BubbleLayout};
use crate::size::{compute_radii, CanvasMetrics, SizeScale};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    Tokens { timeframe: Timeframe },
    Trades,
}

impl Variant {
    pub fn tokens(timeframe: Timeframe) -> Self {
        Variant::Tokens { timeframe }
    }

    /// Entity kind this variant displays.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Variant::Tokens { .. } => "token",
            Variant::Trades => "trade",
        }
    }

    pub fn timeframe(&self) -> Option<Timeframe> {
        match self {
            Variant::Tokens { timeframe } => Some(*timeframe),
            Variant::Trades => None,
        }
    }

    pub fn check_kind(&self, entity: &Entity) -> Result<(), EntityError> {
        if entity.kind_name() == self.kind_name() {
            Ok(())
        } else {
            Err(EntityError::KindMismatch {
                id: entity.id().to_string(),
                expected: self.kind_name(),
                found: entity.kind_name(),
            })
        }
    }

    /// Decode one record as this variant's kind, so field errors name the
    /// record type instead of failing every untagged shape.
    pub fn decode<'de, D: Deserializer<'de>>(&self, record: D) -> Result<Entity, D::Error> {
        match self {
            Variant::Tokens { .. } => Token::deserialize(record).map(Entity::Token),
            Variant::Trades => Trade::deserialize(record).map(Entity::Trade),
        }
    }

    /// Sizing metric: percent change for tokens, USD amount for trades.
    pub fn metric(&self, entity: &Entity) -> f64 {
        match (self, entity) {
            (Variant::Tokens { timeframe }, Entity::Token(t)) => t.change(*timeframe),
            (Variant::Trades, Entity::Trade(t)) => t.amount_usd,
            _ => 0.0,
        }
    }

    pub fn size_scale(&self) -> SizeScale {
        match self {
            Variant::Tokens { .. } => SizeScale::Capped {
                cap: PERCENT_CHANGE_CAP,
            },
            Variant::Trades => SizeScale::FrameRange,
        }
    }

    /// Radii for `entities`, normalized against each other.
    pub fn radii<'a, I>(&self, entities: I, canvas: &CanvasMetrics) -> Vec<f32>
    where
        I: IntoIterator<Item = &'a Entity>,
    {
        let metrics: Vec<f64> = entities.into_iter().map(|e| self.metric(e)).collect();
        compute_radii(&metrics, self.size_scale(), canvas)
    }

    /// Styles for the whole live set, index-aligned with `bubbles`.
    pub fn styles(&self, bubbles: &[Bubble]) -> Vec<BubbleStyle> {
        match self {
            Variant::Tokens { .. } => {
                let changes: Vec<f64> = bubbles.iter().map(|b| self.metric(&b.entity)).collect();
                token_styles(&changes)
            }
            Variant::Trades => {
                let max_radius = bubbles.iter().map(|b| b.radius).fold(0.0_f32, f32::max);
                bubbles
                    .iter()
                    .map(|b| {
                        let is_buy = b.entity.as_trade().map_or(false, |t| t.is_buy());
                        trade_style(is_buy, b.radius, max_radius)
                    })
                    .collect()
            }
        }
    }

    pub fn layout(&self, bubble: &Bubble, mobile: bool, now: DateTime<Utc>) -> BubbleLayout {
        match &bubble.entity {
            Entity::Token(t) => {
                let timeframe = self.timeframe().unwrap_or_default();
                token_layout(t, t.change(timeframe), bubble.radius, mobile)
            }
            Entity::Trade(t) => trade_layout(t, bubble.radius, mobile, now),
        }
    }

    /// Key the icon is cached under.
    pub fn image_key<'a>(&self, entity: &'a Entity) -> Option<&'a str> {
        entity.image_url()
    }
}
