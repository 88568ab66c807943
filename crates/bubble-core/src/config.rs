//! Mount-time configuration handed over from JS.

use crate::constants::*;
use crate::entity::Timeframe;
use crate::error::ConfigError;
use crate::physics::PhysicsParams;
use serde::{Deserialize, Serialize};

/// Tunables the engine runs with. Defaults come from `constants`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EngineParams {
    pub physics: PhysicsParams,
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewConfig {
    pub timeframe: Timeframe,
    pub placeholder_url: String,
    pub image_timeout_ms: f64,
    pub mobile_breakpoint_px: f64,
    pub seed: Option<u64>,
    pub physics: Option<PhysicsParams>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            timeframe: Timeframe::default(),
            placeholder_url: PLACEHOLDER_IMAGE_URL.to_string(),
            image_timeout_ms: IMAGE_LOAD_TIMEOUT_MS,
            mobile_breakpoint_px: MOBILE_BREAKPOINT_PX,
            seed: None,
            physics: None,
        }
    }
}

impl ViewConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_timeout_ms.is_nan() || self.image_timeout_ms <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "imageTimeoutMs",
                value: self.image_timeout_ms,
            });
        }
        if self.mobile_breakpoint_px.is_nan() || self.mobile_breakpoint_px <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "mobileBreakpointPx",
                value: self.mobile_breakpoint_px,
            });
        }
        if let Some(physics) = &self.physics {
            physics.validate()?;
        }
        Ok(())
    }

    pub fn is_mobile(&self, viewport_width_px: f64) -> bool {
        viewport_width_px < self.mobile_breakpoint_px
    }

    pub fn engine_params(&self) -> EngineParams {
        EngineParams {
            physics: self.physics.unwrap_or_default(),
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg: ViewConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, ViewConfig::default());
        assert!(cfg.validate().is_ok());
        assert!(cfg.is_mobile(500.0));
        assert!(!cfg.is_mobile(1024.0));
    }

    #[test]
    fn partial_physics_keeps_remaining_defaults() {
        let cfg: ViewConfig =
            serde_json::from_str(r#"{"timeframe":"h1","seed":7,"physics":{"friction":0.95}}"#)
                .unwrap();
        assert_eq!(cfg.timeframe, Timeframe::H1);
        let params = cfg.engine_params();
        assert_eq!(params.seed, Some(7));
        assert_eq!(params.physics.friction, 0.95);
        assert_eq!(params.physics.restitution, RESTITUTION);
    }

    #[test]
    fn bad_values_are_rejected() {
        let cfg = ViewConfig {
            image_timeout_ms: 0.0,
            ..ViewConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NotPositive { field: "imageTimeoutMs", .. })
        ));
        assert!(serde_json::from_str::<ViewConfig>(r#"{"timeframe":"1w"}"#).is_err());
    }
}
