// Shared physics, sizing and color tuning constants for both bubble variants.

// Physics stepper
pub const FRICTION: f32 = 0.99; // per-frame velocity decay
pub const RESTITUTION: f32 = 0.8; // speed kept after a wall bounce
pub const JITTER_PROBABILITY: f64 = 0.05; // chance per bubble per frame
pub const JITTER_AMPLITUDE: f32 = 0.1; // impulse drawn from [-a, a] per axis
pub const COLLISION_FACTOR: f32 = 0.05; // share of the positional correction applied as impulse

// Interaction
pub const REPULSION_STRENGTH: f32 = 200.0; // force = strength / max(1, distance)
pub const REPULSION_MIN_DISTANCE: f32 = 1.0;

// Spawning
pub const SPAWN_MARGIN_FACTOR: f32 = 1.2; // margin = radius * factor
pub const SPAWN_MAX_SPEED: f32 = 0.25; // per axis

// Size model
pub const REFERENCE_CANVAS_EDGE: f32 = 1000.0; // sqrt(area) of the reference canvas
pub const MIN_SIZE: f32 = 30.0;
pub const MAX_SIZE: f32 = 70.0;
pub const MOBILE_SIZE_BOOST: f32 = 10.0;
pub const DEFAULT_RADIUS: f32 = 40.0; // used while the canvas has no usable size
pub const PERCENT_CHANGE_CAP: f64 = 100.0;
pub const SQRT_WEIGHT: f32 = 0.7;
pub const LINEAR_WEIGHT: f32 = 0.3;

// Color / intensity model
pub const NEAR_ZERO_CHANGE: f64 = 0.5; // |change| below this renders white
pub const SATURATION_CHANGE: f64 = 10.0; // percent change mapped to full color
pub const CLOSE_VALUES_RATIO: f64 = 0.5; // range < avg * ratio => values are close
pub const GAP_SCAN_START_QUANTILE: f64 = 0.1;
pub const SIGNIFICANT_GAP_RATIO: f64 = 0.2; // gap > range * ratio => significant
pub const MAX_INTENSITY: f32 = 0.8;
pub const CHANGE_INTENSITY_WEIGHT: f32 = 0.6;
pub const OUTLIER_INTENSITY_WEIGHT: f32 = 0.4;
pub const LOW_BAND: f32 = 0.3;
pub const MID_BAND: f32 = 0.6;

// Glow and fill
pub const FILL_ALPHA_BASE: f32 = 0.1;
pub const FILL_ALPHA_SPAN: f32 = 0.2;
pub const NEUTRAL_FILL_ALPHA_SPAN: f32 = 0.1;
pub const GLOW_WIDTH_BASE: f32 = 1.5;
pub const GLOW_WIDTH_INTENSITY: f32 = 2.0;
pub const GLOW_WIDTH_OUTLIER: f32 = 3.0;
pub const GLOW_BLUR_BASE: f32 = 12.0;
pub const GLOW_BLUR_OUTLIER: f32 = 8.0;

// Image service
pub const IMAGE_LOAD_TIMEOUT_MS: f64 = 5000.0;
pub const PLACEHOLDER_IMAGE_URL: &str = "/token_logo.png";
pub const IMAGE_PROXY_PATH: &str = "/api/token-image?address=";

// Viewport
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;
