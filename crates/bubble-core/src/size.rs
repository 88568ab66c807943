//! Metric -> radius mapping, normalized to the canvas area.

use crate::constants::*;

/// Pixel size of the drawing surface plus the device class it is shown on.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CanvasMetrics {
    pub width: f32,
    pub height: f32,
    pub mobile: bool,
}

impl CanvasMetrics {
    pub fn new(width: f32, height: f32, mobile: bool) -> Self {
        Self {
            width,
            height,
            mobile,
        }
    }

    /// False until the canvas is attached and laid out.
    #[inline]
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// sqrt(area) relative to the 1000x1000 reference canvas.
    #[inline]
    pub fn scale_factor(&self) -> f32 {
        (self.width * self.height).sqrt() / REFERENCE_CANVAS_EDGE
    }

    #[inline]
    pub fn min_size(&self) -> f32 {
        MIN_SIZE * self.scale_factor()
    }

    #[inline]
    pub fn max_size(&self) -> f32 {
        MAX_SIZE * self.scale_factor()
    }

    #[inline]
    pub fn boost(&self) -> f32 {
        if self.mobile {
            MOBILE_SIZE_BOOST
        } else {
            0.0
        }
    }
}

/// How a variant turns its metric into a 0..1 size ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SizeScale {
    /// |metric| capped at `cap`, divided by `cap`.
    Capped { cap: f64 },
    /// Linear between the smallest and largest metric of the current frame.
    FrameRange,
}

/// Concave blend that spreads out small ratios while keeping large ones big.
#[inline]
pub fn normalized_size(ratio: f32) -> f32 {
    let r = if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    };
    r.sqrt() * SQRT_WEIGHT + r * LINEAR_WEIGHT
}

#[inline]
pub fn radius_for_ratio(ratio: f32, canvas: &CanvasMetrics) -> f32 {
    if !canvas.is_usable() {
        return DEFAULT_RADIUS;
    }
    let (min, max) = (canvas.min_size(), canvas.max_size());
    min + normalized_size(ratio) * (max - min) + canvas.boost()
}

/// Radius used for every bubble when the frame's metrics carry no spread.
#[inline]
pub fn mid_radius(canvas: &CanvasMetrics) -> f32 {
    if !canvas.is_usable() {
        return DEFAULT_RADIUS;
    }
    (canvas.min_size() + canvas.max_size()) / 2.0 + canvas.boost()
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Radius of one bubble given every metric value present in the same frame.
pub fn compute_radius(metric: f64, frame: &[f64], scale: SizeScale, canvas: &CanvasMetrics) -> f32 {
    radius_in_range(metric, frame_range(frame), scale, canvas)
}

/// Radii for a whole frame, index-aligned with `metrics`. The frame range is
/// scanned once.
pub fn compute_radii(metrics: &[f64], scale: SizeScale, canvas: &CanvasMetrics) -> Vec<f32> {
    let range = frame_range(metrics);
    metrics
        .iter()
        .map(|m| radius_in_range(*m, range, scale, canvas))
        .collect()
}

fn radius_in_range(metric: f64, (min, max): (f64, f64), scale: SizeScale, canvas: &CanvasMetrics) -> f32 {
    let metric = finite_or_zero(metric);
    match scale {
        SizeScale::Capped { cap } => {
            let ratio = if cap > 0.0 {
                metric.abs().min(cap) / cap
            } else {
                0.0
            };
            radius_for_ratio(ratio as f32, canvas)
        }
        SizeScale::FrameRange => {
            if max <= min {
                return mid_radius(canvas);
            }
            radius_for_ratio(((metric - min) / (max - min)) as f32, canvas)
        }
    }
}

fn frame_range(frame: &[f64]) -> (f64, f64) {
    frame
        .iter()
        .copied()
        .map(finite_or_zero)
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .unwrap_or((0.0, 0.0))
}
