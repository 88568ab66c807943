//! Platform-independent core of the bubble views: entity model, sizing,
//! physics, coloring, label layout, reconciliation and image bookkeeping.
//! Nothing in here touches web APIs, so all of it runs in host tests.

pub mod bubble;
pub mod color;
pub mod config;
pub mod constants;
pub mod engine;
pub mod entity;
pub mod error;
pub mod images;
pub mod interaction;
pub mod label;
pub mod physics;
pub mod reconcile;
pub mod size;
pub mod variant;

pub use bubble::Bubble;
pub use color::{BubbleStyle, Rgba};
pub use config::{EngineParams, ViewConfig};
pub use engine::{BubbleEngine, EngineState};
pub use entity::{Entity, Timeframe, Token, Trade, TradeDirection};
pub use error::{ConfigError, EntityError};
pub use images::{AddressResolver, ImageCache, ImageSlot, Resolution};
pub use interaction::ClickOutcome;
pub use label::{BubbleLayout, IconRect, TextLine};
pub use physics::PhysicsParams;
pub use reconcile::IngestReport;
pub use size::CanvasMetrics;
pub use variant::Variant;
