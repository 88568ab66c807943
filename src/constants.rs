/// Canvas 2D drawing constants.
///
/// Kept free of web APIs so host tests can include this file directly.
// Text contrast shadow
pub const TEXT_SHADOW_COLOR: &str = "rgba(0, 0, 0, 0.7)";
pub const TEXT_SHADOW_BLUR: f64 = 4.0;
pub const TEXT_SHADOW_OFFSET: f64 = 0.0;
pub const NO_SHADOW_COLOR: &str = "transparent";

// Text placement
pub const TEXT_ALIGN: &str = "center";
pub const TEXT_BASELINE: &str = "middle";

// Geometry
pub const FULL_TURN: f64 = std::f64::consts::PI * 2.0;

// Canvas backing store
pub const MIN_BACKING_PX: u32 = 1; // smallest backing size for a laid-out canvas
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 3.0; // cap on very dense screens
